//! Lexer (tokenizer) for Zerg source code
//!
//! Converts raw source text into a lazy stream of classified [`Token`]s
//! consumed on demand by the parser. Tokenization runs as four chained
//! refinement stages, each an iterator over the previous one:
//!
//! 1. Coarse segmentation — newlines, comments, whitespace runs, string
//!    literals, and unclassified runs of everything else ([`Lexer`]).
//! 2. Operator extraction — greedy longest-match splitting of operator
//!    characters out of unclassified runs ([`OperatorExtractor`]).
//! 3. Word identification — keyword versus identifier retagging
//!    ([`identify_word`]).
//! 4. Noise removal — whitespace, comments, and newlines are dropped, so
//!    the grammar downstream is layout-insensitive.
//!
//! The lexer never fails. Unterminated strings and comments simply run to
//! the end of input, and stray characters survive as best-effort tokens for
//! the parser to reject.

use std::collections::VecDeque;
use std::fmt;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::ast::SourceLocation;

/// Characters that stage 2 carves out of unclassified runs.
const OPERATORS: &str = "+-*/%<>&|!^~(){}[]";

/// All token kinds known to the lexer.
///
/// Literal-keyed kinds (operators and reserved words) are identified by
/// their exact spelling via [`TokenKind::from_spelling`]; the remaining
/// kinds are structural and carry no fixed spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Synthetic label for tree roots; never produced by the lexer.
    Root,
    /// Stage-1 output awaiting classification by the later stages.
    Unknown,
    Newline,
    Comment,
    /// Reserved for a future layout-sensitive mode; never produced.
    Indent,
    /// Reserved for a future layout-sensitive mode; never produced.
    Dedent,
    Space,
    /// A double-quoted literal, delimiters included, no escape processing.
    Str,
    /// An identifier: any word that is not a reserved keyword.
    Ident,

    // Operators (single and multi-character)
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Tilde,      // ~
    PlusPlus,   // ++
    MinusMinus, // --
    Lt,         // <
    Gt,         // >
    Amp,        // &
    Pipe,       // |
    Bang,       // !
    Caret,      // ^
    LtLt,       // <<
    GtGt,       // >>
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Arrow,      // ->

    // Reserved keywords
    Fn,
    Print,
    Nop,
}

/// Every literal-keyed kind paired with its exact spelling. No two kinds
/// share a spelling.
const LITERALS: &[(&str, TokenKind)] = &[
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("~", TokenKind::Tilde),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("!", TokenKind::Bang),
    ("^", TokenKind::Caret),
    ("<<", TokenKind::LtLt),
    (">>", TokenKind::GtGt),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("->", TokenKind::Arrow),
    ("fn", TokenKind::Fn),
    ("print", TokenKind::Print),
    ("nop", TokenKind::Nop),
];

static LITERAL_KINDS: Lazy<FxHashMap<&'static str, TokenKind>> =
    Lazy::new(|| LITERALS.iter().copied().collect());

impl TokenKind {
    /// Resolve an exact spelling to its literal-keyed kind.
    pub fn from_spelling(raw: &str) -> Option<TokenKind> {
        LITERAL_KINDS.get(raw).copied()
    }

    /// Whether stage 4 drops tokens of this kind from the stream.
    pub fn is_noise(self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Comment | TokenKind::Newline
        )
    }
}

/// A classified, verbatim substring of the source text.
///
/// `raw` preserves the source exactly, including whitespace runs and
/// comment or string delimiters; concatenating the raw text of the stage-1
/// stream reconstructs the original source. `location` is the 1-based line
/// and column of the token's first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub raw: String,
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        raw: impl Into<String>,
        kind: TokenKind,
        location: SourceLocation,
    ) -> Self {
        Self {
            raw: raw.into(),
            kind,
            location,
        }
    }

    /// The synthetic token labelling tree roots.
    pub fn root() -> Self {
        Self::new(".", TokenKind::Root, SourceLocation::new(0, 0))
    }
}

/// Display text: bracketed tags for the kinds with no natural spelling,
/// the raw text otherwise.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Space => write!(f, "[SPACE]"),
            TokenKind::Newline => write!(f, "[NEWLINE]"),
            _ => write!(f, "{}", self.raw),
        }
    }
}

/// Stage 1: coarse segmentation.
///
/// Scans the source left to right, character by character. Only newlines,
/// comments, whitespace runs, and string literals are recognized here;
/// every other maximal run of non-whitespace characters is emitted as one
/// [`TokenKind::Unknown`] token, mixing letters, digits, and operator
/// characters freely. Comment and string openers are only recognized at
/// the start of a token, so `a//b` and `a"b` are single unclassified runs.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume characters while `keep` holds, returning the consumed run.
    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut raw = String::new();
        while let Some(ch) = self.peek() {
            if !keep(ch) {
                break;
            }
            raw.push(ch);
            self.advance();
        }
        raw
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let location = self.current_location();
        let ch = self.advance()?;

        let token = match ch {
            '\n' => Token::new("\n", TokenKind::Newline, location),
            '/' if self.peek() == Some('/') => {
                // runs to the next newline, or to the end of input when the
                // final line has no terminator
                let mut raw = String::from(ch);
                raw.push_str(&self.take_while(|c| c != '\n'));
                Token::new(raw, TokenKind::Comment, location)
            }
            '/' => Token::new("/", TokenKind::Unknown, location),
            ' ' | '\t' => {
                let mut raw = String::from(ch);
                raw.push_str(&self.take_while(|c| c == ' ' || c == '\t'));
                Token::new(raw, TokenKind::Space, location)
            }
            '"' => {
                // an unterminated string silently swallows the rest of the
                // source; no escape sequences
                let mut raw = String::from(ch);
                raw.push_str(&self.take_while(|c| c != '"'));
                if let Some(quote) = self.advance() {
                    raw.push(quote);
                }
                Token::new(raw, TokenKind::Str, location)
            }
            _ => {
                let mut raw = String::from(ch);
                raw.push_str(&self.take_while(|c| !matches!(c, ' ' | '\t' | '\n')));
                Token::new(raw, TokenKind::Unknown, location)
            }
        };

        Some(token)
    }
}

/// Stage 2: operator extraction.
///
/// Re-scans every [`TokenKind::Unknown`] token from stage 1, partitioning
/// its text into maximal runs of operator characters versus everything
/// else. Operator runs resolve to literal-keyed kinds by greedy longest
/// match, so `++` stays one increment while `+-` splits into add and
/// subtract. Non-operator chunks are re-emitted unclassified for stage 3;
/// tokens of any other kind pass through untouched.
pub struct OperatorExtractor<I> {
    tokens: I,
    pending: VecDeque<Token>,
}

impl<I> OperatorExtractor<I> {
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            pending: VecDeque::new(),
        }
    }

    /// Carve one unclassified run into operator and non-operator chunks.
    ///
    /// Runs never contain whitespace, so every chunk stays on the token's
    /// line and chunk columns follow from the character offset.
    fn split(&mut self, token: Token) {
        let line = token.location.line;
        let mut column = token.location.column;
        let mut chunk_start = column;
        let mut chunk = String::new();
        let mut in_operators = false;

        for ch in token.raw.chars() {
            let is_operator = OPERATORS.contains(ch);
            if chunk.is_empty() {
                in_operators = is_operator;
                chunk_start = column;
            } else if is_operator != in_operators {
                self.emit_chunk(
                    std::mem::take(&mut chunk),
                    in_operators,
                    line,
                    chunk_start,
                );
                in_operators = is_operator;
                chunk_start = column;
            }
            chunk.push(ch);
            column += 1;
        }

        if !chunk.is_empty() {
            self.emit_chunk(chunk, in_operators, line, chunk_start);
        }
    }

    fn emit_chunk(
        &mut self,
        chunk: String,
        is_operators: bool,
        line: usize,
        column: usize,
    ) {
        if is_operators {
            self.match_literals(&chunk, line, column);
        } else {
            self.pending.push_back(Token::new(
                chunk,
                TokenKind::Unknown,
                SourceLocation::new(line, column),
            ));
        }
    }

    /// Greedy longest-match resolution of an operator run: try the whole
    /// remaining run against the spelling table, peeling one character off
    /// the front whenever nothing matches.
    fn match_literals(&mut self, run: &str, line: usize, mut column: usize) {
        let mut rest = run;
        while !rest.is_empty() {
            if let Some(kind) = TokenKind::from_spelling(rest) {
                self.pending.push_back(Token::new(
                    rest,
                    kind,
                    SourceLocation::new(line, column),
                ));
                return;
            }

            // operator characters are single-byte, so byte split is safe
            let (first, remainder) = rest.split_at(1);
            let kind = match TokenKind::from_spelling(first) {
                Some(kind) => kind,
                None => unreachable!(
                    "operator character {first:?} has no single-character kind"
                ),
            };
            self.pending.push_back(Token::new(
                first,
                kind,
                SourceLocation::new(line, column),
            ));
            rest = remainder;
            column += 1;
        }
    }
}

impl<I: Iterator<Item = Token>> Iterator for OperatorExtractor<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            let token = self.tokens.next()?;
            if token.kind != TokenKind::Unknown {
                return Some(token);
            }
            self.split(token);
        }
    }
}

/// Stage 3: word identification.
///
/// A surviving unclassified token is matched whole against the reserved
/// words; anything unreserved becomes an identifier. Digit-only text is an
/// identifier like any other: numeric literals are not recognized in this
/// front end.
pub fn identify_word(token: Token) -> Token {
    if token.kind != TokenKind::Unknown {
        return token;
    }

    let kind = TokenKind::from_spelling(&token.raw).unwrap_or(TokenKind::Ident);
    Token { kind, ..token }
}

/// Tokenize Zerg source into the noise-free token stream the parser
/// consumes.
///
/// The stream is lazy — tokens are produced one at a time as the caller
/// pulls them — and single-use. Re-tokenizing a source just means calling
/// this again; the pipeline keeps no state between invocations.
pub fn tokenize(source: &str) -> impl Iterator<Item = Token> {
    OperatorExtractor::new(Lexer::new(source))
        .map(identify_word)
        .filter(|token| !token.kind.is_noise())
}
