//! Recursive-descent parser for Zerg source code
//!
//! Consumes the lazy token stream produced by [`crate::lexer::tokenize`]
//! (noise already removed) and builds the [`Ast`] for one compilation
//! unit. The parser pulls tokens one at a time, deciding each grammar
//! branch on a single token of lookahead; a token read one step too far is
//! pushed back and re-read by whoever needs it next.
//!
//! # Grammar
//!
//! ```text
//! source    := block*
//! block     := NOP | fn_stmt
//! fn_stmt   := FN func_head scope
//! func_head := IDENT LPAREN [func_args] RPAREN [ARROW type_hint]
//! scope     := LBRACE source RBRACE
//! ```
//!
//! Parameter lists and return-type hints are recognized but not yet part
//! of the grammar; reaching either is a syntax error.
//!
//! # Error policy
//!
//! The first grammar violation aborts the parse with a [`ParseError`]
//! carrying the offending token. There is no recovery and no partial
//! tree: a malformed source yields no usable AST.

use std::fmt;

use tracing::{debug, trace};

use crate::ast::{Ast, NodeId};
use crate::lexer::{tokenize, Token, TokenKind};

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    /// The offending token; `None` when the source ended where the grammar
    /// required more.
    pub token: Option<Token>,
}

impl ParseError {
    fn unexpected(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            token: Some(token),
        }
    }

    fn end_of_input(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(
                f,
                "Parse error at line {}, column {}: {}, found '{}'",
                token.location.line, token.location.column, self.message, token
            ),
            None => {
                write!(f, "Parse error: {}, but the source ended", self.message)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one compilation unit into its syntax tree.
///
/// This is the crate's single entry point for collaborators: reading the
/// source from disk happens outside, and whatever walks the returned tree
/// (a code generator, a pretty printer) is none of the parser's business.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    Parser::new(tokenize(source)).parse()
}

/// Recursive descent parser for the Zerg grammar.
///
/// Owns a live pull handle on the token stream, the pushback stack for
/// tokens a rule read one step too far, and the [`Ast`] arena under
/// construction. Each parse call builds its own parser, so independent
/// sources can be parsed concurrently with no shared state.
pub struct Parser<I> {
    tokens: I,
    pushback: Vec<Token>,
    ast: Ast,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            pushback: Vec::new(),
            ast: Ast::new(),
        }
    }

    /// Consume the token stream and build the syntax tree.
    pub fn parse(mut self) -> Result<Ast, ParseError> {
        debug!("parsing compilation unit");
        self.parse_source()?;
        Ok(self.ast)
    }

    // ===== Token cursor =====

    /// Pull the next token, draining the pushback stack first.
    fn bump(&mut self) -> Option<Token> {
        let token = self.pushback.pop().or_else(|| self.tokens.next());
        if let Some(token) = &token {
            trace!(token = %token, "next token");
        }
        token
    }

    /// Treat `token` as unread; the next [`Parser::bump`] returns it again.
    fn unread(&mut self, token: Token) {
        trace!(token = %token, "unread token");
        self.pushback.push(token);
    }

    /// Pull the next token where the grammar requires one to exist.
    fn expect_next(&mut self, message: &str) -> Result<Token, ParseError> {
        self.bump()
            .ok_or_else(|| ParseError::end_of_input(format!("expected {message}")))
    }

    /// Pull the next token and require it to be of `kind`.
    fn expect(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<Token, ParseError> {
        let token = self.expect_next(message)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected(format!("expected {message}"), token))
        }
    }

    // ===== Grammar rules =====

    /// `source := block*` — the body of a compilation unit or scope.
    ///
    /// A `}` belongs to the enclosing scope: it is unread to signal the
    /// caller and leaves the freshly made root childless, as does running
    /// out of input.
    fn parse_source(&mut self) -> Result<NodeId, ParseError> {
        let root = self.ast.add_root();

        // TODO: loop here once the grammar grows beyond one statement per scope
        let Some(token) = self.bump() else {
            return Ok(root);
        };

        match token.kind {
            TokenKind::RBrace => self.unread(token),
            _ => {
                let block = self.parse_block(token)?;
                self.ast.attach(root, block);
            }
        }

        Ok(root)
    }

    /// `block := NOP | fn_stmt` — dispatch on the lookahead token.
    fn parse_block(&mut self, token: Token) -> Result<NodeId, ParseError> {
        match token.kind {
            TokenKind::Nop => Ok(self.ast.add(token)),
            TokenKind::Fn => self.parse_func_stmt(token),
            _ => Err(ParseError::unexpected("expected a statement", token)),
        }
    }

    /// `fn_stmt := FN func_head scope`
    fn parse_func_stmt(&mut self, token: Token) -> Result<NodeId, ParseError> {
        let node = self.ast.add(token);

        let head = self.parse_func_head()?;
        self.ast.attach(node, head);

        let body = self.parse_scope()?;
        self.ast.attach(node, body);

        Ok(node)
    }

    /// `func_head := IDENT LPAREN [func_args] RPAREN [ARROW type_hint]`
    fn parse_func_head(&mut self) -> Result<NodeId, ParseError> {
        let name = self.expect(TokenKind::Ident, "a function name after 'fn'")?;
        let node = self.ast.add(name);

        self.expect(TokenKind::LParen, "'(' after the function name")?;
        let token = self.expect_next("')' to close the parameter list")?;
        if token.kind != TokenKind::RParen {
            let args = self.parse_func_args(token)?;
            self.ast.attach(node, args);
        }

        // an arrow introduces a return type; anything else belongs to the
        // caller and goes back on the stream
        match self.bump() {
            Some(token) if token.kind == TokenKind::Arrow => {
                let hint = self.parse_type_hint(token)?;
                self.ast.attach(node, hint);
            }
            Some(token) => self.unread(token),
            None => {}
        }

        Ok(node)
    }

    /// `scope := LBRACE source RBRACE` — the scope's value is the inner
    /// source root; the braces themselves are discarded.
    fn parse_scope(&mut self) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::LBrace, "'{' to open the scope")?;
        let node = self.parse_source()?;
        self.expect(TokenKind::RBrace, "'}' to close the scope")?;
        Ok(node)
    }

    /// Parameter lists are not in the grammar yet; reaching one is a
    /// syntax error rather than a silent skip.
    fn parse_func_args(&mut self, token: Token) -> Result<NodeId, ParseError> {
        Err(ParseError::unexpected(
            "function parameters are not supported",
            token,
        ))
    }

    /// Return-type hints are not in the grammar yet.
    fn parse_type_hint(&mut self, token: Token) -> Result<NodeId, ParseError> {
        Err(ParseError::unexpected(
            "return type hints are not supported",
            token,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_source() {
        let ast = parse("").expect("Parsing failed");
        assert!(ast.children(ast.root()).is_empty());
        assert_eq!(ast.token(ast.root()).kind, TokenKind::Root);
    }

    #[test]
    fn test_parse_nop() {
        let ast = parse("nop").expect("Parsing failed");

        let children = ast.children(ast.root());
        assert_eq!(children.len(), 1);
        assert_eq!(ast.token(children[0]).kind, TokenKind::Nop);
        assert!(ast.children(children[0]).is_empty());
    }

    #[test]
    fn test_parse_empty_function() {
        let ast = parse("fn main() { }").expect("Parsing failed");

        let children = ast.children(ast.root());
        assert_eq!(children.len(), 1);

        let func = children[0];
        assert_eq!(ast.token(func).kind, TokenKind::Fn);

        let parts = ast.children(func);
        assert_eq!(parts.len(), 2);

        let head = parts[0];
        assert_eq!(ast.token(head).kind, TokenKind::Ident);
        assert_eq!(ast.token(head).raw, "main");
        assert!(ast.children(head).is_empty());

        let body = parts[1];
        assert_eq!(ast.token(body).kind, TokenKind::Root);
        assert!(ast.children(body).is_empty());
    }

    #[test]
    fn test_parse_function_with_body() {
        let ast = parse("fn main() { nop }").expect("Parsing failed");

        let func = ast.children(ast.root())[0];
        let body = ast.children(func)[1];
        let statements = ast.children(body);
        assert_eq!(statements.len(), 1);
        assert_eq!(ast.token(statements[0]).kind, TokenKind::Nop);
    }

    #[test]
    fn test_parse_stray_close_brace_is_unread() {
        let ast = parse("}").expect("Parsing failed");
        assert!(ast.children(ast.root()).is_empty());
    }

    #[test]
    fn test_parse_rejects_unexpected_statement() {
        let err = parse("print").expect_err("should not parse");
        let token = err.token.expect("error should carry the token");
        assert_eq!(token.kind, TokenKind::Print);
        assert_eq!(token.raw, "print");
    }

    #[test]
    fn test_parse_requires_function_name() {
        let err = parse("fn () { }").expect_err("should not parse");
        assert_eq!(err.token.expect("token").kind, TokenKind::LParen);
        assert!(err.message.contains("function name"));
    }

    #[test]
    fn test_parse_unterminated_head_is_an_error() {
        let err = parse("fn main(").expect_err("should not parse");
        assert!(err.token.is_none());
        assert!(err.to_string().contains("the source ended"));
    }

    #[test]
    fn test_parse_missing_body_is_an_error() {
        let err = parse("fn main()").expect_err("should not parse");
        assert!(err.token.is_none());
        assert!(err.message.contains('{'));
    }

    #[test]
    fn test_parse_rejects_parameters() {
        let err = parse("fn main(x) { }").expect_err("should not parse");
        assert!(err.message.contains("parameters"));
        assert_eq!(err.token.expect("token").raw, "x");
    }

    #[test]
    fn test_parse_rejects_type_hints() {
        let err = parse("fn main() -> u32 { }").expect_err("should not parse");
        assert!(err.message.contains("type hints"));
        assert_eq!(err.token.expect("token").kind, TokenKind::Arrow);
    }

    #[test]
    fn test_parse_error_display() {
        let err = parse("print").expect_err("should not parse");
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 1: expected a statement, found 'print'"
        );
    }
}
