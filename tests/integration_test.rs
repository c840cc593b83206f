// Integration tests for the Zerg front end

use pretty_assertions::assert_eq;

use zerg::lexer::TokenKind;
use zerg::parser::parse;

#[test]
fn test_parse_canonical_program() {
    let source = r#"
// the canonical zerg program
fn main() {
    nop
}
"#;

    let ast = parse(source).expect("Parsing failed");

    let func = ast.children(ast.root())[0];
    assert_eq!(ast.token(func).kind, TokenKind::Fn);

    let head = ast.children(func)[0];
    assert_eq!(ast.token(head).raw, "main");
    assert_eq!(ast.token(head).location.line, 3);

    let body = ast.children(func)[1];
    assert_eq!(ast.token(body).kind, TokenKind::Root);
    assert_eq!(ast.children(body).len(), 1);
    assert_eq!(ast.token(ast.children(body)[0]).kind, TokenKind::Nop);
}

#[test]
fn test_render_canonical_program() {
    let source = "fn main() {\n    nop\n}";
    let ast = parse(source).expect("Parsing failed");

    let expected = "\
.
    └─  fn
        ├─  main
        └─  .
            └─  nop";
    assert_eq!(ast.to_string(), expected);
}

#[test]
fn test_parse_nested_function() {
    let source = r#"
fn outer() {
    fn inner() {
    }
}
"#;

    let ast = parse(source).expect("Parsing failed");

    let outer = ast.children(ast.root())[0];
    assert_eq!(ast.token(outer).kind, TokenKind::Fn);

    let outer_body = ast.children(outer)[1];
    let inner = ast.children(outer_body)[0];
    assert_eq!(ast.token(inner).kind, TokenKind::Fn);
    assert_eq!(ast.token(ast.children(inner)[0]).raw, "inner");

    let inner_body = ast.children(inner)[1];
    assert!(ast.children(inner_body).is_empty());
}

#[test]
fn test_render_nested_function() {
    let source = "fn outer() { fn inner() { nop } }";
    let ast = parse(source).expect("Parsing failed");

    let expected = "\
.
    └─  fn
        ├─  outer
        └─  .
            └─  fn
                ├─  inner
                └─  .
                    └─  nop";
    assert_eq!(ast.to_string(), expected);
}

#[test]
fn test_layout_is_insignificant() {
    // indentation, blank lines, and trailing comments never reach the parser
    let compact = parse("fn main(){nop}").expect("Parsing failed");
    let sprawling = parse("\n\n\tfn   main ( )   // entry point\n\n{\n\tnop\n}\n")
        .expect("Parsing failed");

    assert_eq!(compact.to_string(), sprawling.to_string());
}

#[test]
fn test_parent_links_point_upward() {
    let ast = parse("fn main() { nop }").expect("Parsing failed");

    let func = ast.children(ast.root())[0];
    let body = ast.children(func)[1];
    let nop = ast.children(body)[0];

    assert_eq!(ast.parent(nop), Some(body));
    assert_eq!(ast.parent(body), Some(func));
    assert_eq!(ast.parent(func), Some(ast.root()));
    assert_eq!(ast.parent(ast.root()), None);

    assert!(ast.is_child_of(body, nop));
    assert!(!ast.is_child_of(ast.root(), nop));
    assert!(ast.is_last_child(nop));
}

#[test]
fn test_syntax_errors_report_location() {
    let err = parse("fn main() {\n    print\n}").expect_err("should not parse");
    assert_eq!(
        err.to_string(),
        "Parse error at line 2, column 5: expected a statement, found 'print'"
    );
}

#[test]
fn test_unterminated_parameter_list_fails_fast() {
    let err = parse("fn main(").expect_err("should not parse");
    assert_eq!(
        err.to_string(),
        "Parse error: expected ')' to close the parameter list, but the source ended"
    );
}

#[test]
fn test_missing_close_brace_fails() {
    let err = parse("fn main() { nop").expect_err("should not parse");
    assert!(err.to_string().contains("'}'"));
}

#[test]
fn test_string_statement_is_rejected() {
    // strings lex fine but no statement accepts them yet
    let err = parse("\"hello\"").expect_err("should not parse");
    assert_eq!(err.token.expect("token").kind, TokenKind::Str);
}
