//! Implements grammar parsing of the token stream from the lexer.

mod dml;
mod expressions;
mod query;
mod table;

pub(crate) use expressions::parse_expr;

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Parses a whole input: a sequence of `;`-separated statements.
///
/// A syntax error never aborts the input. The statement that produced it is
/// abandoned and the parser resynchronizes at the next statement boundary,
/// so a batch reports as many errors as possible.
pub(crate) fn parse_program(p: &mut Parser) {
    while !p.at(TokenKind::Eof) {
        parse_stmt(p);
    }
}

fn parse_stmt(p: &mut Parser) {
    let errors_before = p.error_count();

    match p.current() {
        TokenKind::SelectKw => query::parse_query_stmt(p),
        TokenKind::CreateKw => table::parse_create_table(p),
        TokenKind::InsertKw => dml::parse_insert(p),
        TokenKind::DeleteKw => dml::parse_delete(p),
        TokenKind::SemiColon => p.bump(TokenKind::SemiColon),
        t => p.error(format!("expected a statement, found {t}")),
    }

    if p.error_count() > errors_before {
        p.recover_stmt();
    }
}

/// Parses a comma-separated list of plain identifiers.
fn parse_ident_list(p: &mut Parser) {
    p.expect(TokenKind::Ident);
    while p.eat(TokenKind::Comma) {
        p.expect(TokenKind::Ident);
    }
}

/// Parses a single (optionally negated) literal value into a
/// [`SyntaxKind::Value`] node, as used by VALUES lists and DEFAULT clauses.
fn parse_value(p: &mut Parser) {
    p.start(SyntaxKind::Value);
    p.eat(TokenKind::Minus);
    match p.current() {
        TokenKind::Integer
        | TokenKind::Double
        | TokenKind::QuotedLiteral
        | TokenKind::NullKw => p.bump_any(),
        t => p.error(format!("expected a literal value, found {t}")),
    }
    p.finish();
}

#[cfg(test)]
mod tests {
    use crate::parser::{Parse, Parser};
    use expect_test::{expect, Expect};

    use super::*;

    /// Helper function to compare the built syntax tree with the expected
    /// output.
    pub(crate) fn check(parse: Parse, expected_tree: Expect) {
        expected_tree.assert_eq(parse.tree().as_str())
    }

    /// A helper to allow calling the different parse functions.
    pub(crate) fn parse<F>(input: &str, f: F) -> Parse
    where
        F: Fn(&mut Parser),
    {
        let mut parser = Parser::new(input);
        f(&mut parser);
        parser.build()
    }

    #[test]
    fn test_parse_statement_list() {
        let result = parse("DELETE FROM t; DELETE FROM u;", parse_program);
        assert!(result.ok(), "{:?}", result.errors);
        assert_eq!(
            result
                .syntax()
                .children()
                .filter(|n| n.kind() == crate::syntax::SyntaxKind::DeleteStmt)
                .count(),
            2
        );
    }

    #[test]
    fn test_error_recovery_at_statement_boundary() {
        // The first statement is broken; the second one must still parse.
        let result = parse("SELECT FROM; DELETE FROM t;", parse_program);
        assert!(!result.ok());
        assert!(result
            .syntax()
            .children()
            .any(|n| n.kind() == crate::syntax::SyntaxKind::DeleteStmt));
    }

    #[test]
    fn test_recovery_without_semicolon() {
        // No `;` after the broken statement: resynchronize at the next
        // statement-start keyword.
        let result = parse("SELECT + FROM t DELETE FROM u;", parse_program);
        assert!(!result.ok());
        assert!(result
            .syntax()
            .children()
            .any(|n| n.kind() == crate::syntax::SyntaxKind::DeleteStmt));
    }

    #[test]
    fn test_parse_value() {
        check(
            parse("-3", parse_value),
            expect![[r#"
Root@0..2
  Value@0..2
    Minus@0..1 "-"
    Integer@1..2 "3"
"#]],
        );
    }
}
