//! Implements parsing of CREATE TABLE statements.

use super::parse_expr;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn parse_create_table(p: &mut Parser) {
    p.start(SyntaxKind::CreateTableStmt);
    p.expect(TokenKind::CreateKw);
    p.expect(TokenKind::TableKw);
    p.expect(TokenKind::Ident);

    p.expect(TokenKind::LParen);
    p.start(SyntaxKind::ColumnList);
    parse_table_element(p);
    while p.eat(TokenKind::Comma) {
        parse_table_element(p);
    }
    p.finish();
    p.expect(TokenKind::RParen);

    p.eat(TokenKind::SemiColon);
    p.finish();
}

/// Column declarations and table-level key declarations share the same
/// comma list; keys are recognized by their leading keyword.
fn parse_table_element(p: &mut Parser) {
    match p.current() {
        TokenKind::PrimaryKw | TokenKind::ForeignKw | TokenKind::UniqueKw => parse_table_key(p),
        _ => parse_column_def(p),
    }
}

fn parse_column_def(p: &mut Parser) {
    p.start(SyntaxKind::ColumnDef);
    p.expect(TokenKind::Ident);
    parse_datatype(p);

    loop {
        match p.current() {
            TokenKind::NotKw
            | TokenKind::UniqueKw
            | TokenKind::PrimaryKw
            | TokenKind::ForeignKw
            | TokenKind::ReferencesKw
            | TokenKind::DefaultKw
            | TokenKind::AutoKw
            | TokenKind::CheckKw => parse_column_constraint(p),
            _ => break,
        }
    }

    p.finish();
}

fn parse_datatype(p: &mut Parser) {
    p.start(SyntaxKind::Datatype);
    p.expect(TokenKind::Ident);
    if p.eat(TokenKind::LParen) {
        p.expect(TokenKind::Integer);
        p.expect(TokenKind::RParen);
    }
    p.finish();
}

fn parse_column_constraint(p: &mut Parser) {
    p.start(SyntaxKind::ColumnConstraint);

    match p.current() {
        TokenKind::NotKw => {
            p.bump(TokenKind::NotKw);
            p.expect(TokenKind::NullKw);
        }
        TokenKind::UniqueKw => p.bump(TokenKind::UniqueKw),
        TokenKind::PrimaryKw => {
            p.bump(TokenKind::PrimaryKw);
            p.expect(TokenKind::KeyKw);
        }
        TokenKind::ForeignKw => {
            p.bump(TokenKind::ForeignKw);
            p.expect(TokenKind::KeyKw);
            p.expect(TokenKind::ReferencesKw);
            parse_reference_target(p);
        }
        TokenKind::ReferencesKw => {
            p.bump(TokenKind::ReferencesKw);
            parse_reference_target(p);
        }
        TokenKind::DefaultKw => {
            p.bump(TokenKind::DefaultKw);
            super::parse_value(p);
        }
        TokenKind::AutoKw => {
            p.bump(TokenKind::AutoKw);
            p.expect(TokenKind::IncrementKw);
        }
        TokenKind::CheckKw => {
            p.bump(TokenKind::CheckKw);
            p.expect(TokenKind::LParen);
            parse_expr(p);
            p.expect(TokenKind::RParen);
        }
        t => p.error(format!("expected a column constraint, found {t}")),
    }

    p.finish();
}

fn parse_reference_target(p: &mut Parser) {
    p.expect(TokenKind::Ident);
    if p.eat(TokenKind::LParen) {
        p.expect(TokenKind::Ident);
        p.expect(TokenKind::RParen);
    }
}

fn parse_table_key(p: &mut Parser) {
    p.start(SyntaxKind::TableKey);

    match p.current() {
        TokenKind::PrimaryKw => {
            p.bump(TokenKind::PrimaryKw);
            p.expect(TokenKind::KeyKw);
            p.expect(TokenKind::LParen);
            super::parse_ident_list(p);
            p.expect(TokenKind::RParen);
        }
        TokenKind::UniqueKw => {
            p.bump(TokenKind::UniqueKw);
            p.expect(TokenKind::LParen);
            super::parse_ident_list(p);
            p.expect(TokenKind::RParen);
        }
        TokenKind::ForeignKw => {
            p.bump(TokenKind::ForeignKw);
            p.expect(TokenKind::KeyKw);
            p.expect(TokenKind::LParen);
            super::parse_ident_list(p);
            p.expect(TokenKind::RParen);
            p.expect(TokenKind::ReferencesKw);
            p.expect(TokenKind::Ident);
            if p.eat(TokenKind::LParen) {
                super::parse_ident_list(p);
                p.expect(TokenKind::RParen);
            }
        }
        t => p.error(format!("expected a key declaration, found {t}")),
    }

    p.finish();
}

#[cfg(test)]
mod tests {
    use super::super::tests::{check, parse};
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_table_with_primary_key_column() {
        check(
            parse("CREATE TABLE users (id INT PRIMARY KEY)", parse_create_table),
            expect![[r#"
Root@0..39
  CreateTableStmt@0..39
    Keyword@0..6 "CREATE"
    Whitespace@6..7 " "
    Keyword@7..12 "TABLE"
    Whitespace@12..13 " "
    Ident@13..18 "users"
    Whitespace@18..19 " "
    LParen@19..20 "("
    ColumnList@20..38
      ColumnDef@20..38
        Ident@20..22 "id"
        Whitespace@22..23 " "
        Datatype@23..26
          Ident@23..26 "INT"
        Whitespace@26..27 " "
        ColumnConstraint@27..38
          Keyword@27..34 "PRIMARY"
          Whitespace@34..35 " "
          Keyword@35..38 "KEY"
    RParen@38..39 ")"
"#]],
        );
    }

    #[test]
    fn test_sized_datatype_with_not_null() {
        check(
            parse("CREATE TABLE t (name VARCHAR(64) NOT NULL)", parse_create_table),
            expect![[r#"
Root@0..42
  CreateTableStmt@0..42
    Keyword@0..6 "CREATE"
    Whitespace@6..7 " "
    Keyword@7..12 "TABLE"
    Whitespace@12..13 " "
    Ident@13..14 "t"
    Whitespace@14..15 " "
    LParen@15..16 "("
    ColumnList@16..41
      ColumnDef@16..41
        Ident@16..20 "name"
        Whitespace@20..21 " "
        Datatype@21..32
          Ident@21..28 "VARCHAR"
          LParen@28..29 "("
          Integer@29..31 "64"
          RParen@31..32 ")"
        Whitespace@32..33 " "
        ColumnConstraint@33..41
          Keyword@33..36 "NOT"
          Whitespace@36..37 " "
          Keyword@37..41 "NULL"
    RParen@41..42 ")"
"#]],
        );
    }

    #[test]
    fn test_all_column_constraints_accepted() {
        let result = parse(
            "CREATE TABLE t (\
             a INT NOT NULL UNIQUE DEFAULT 0, \
             b INT AUTO INCREMENT, \
             c INT REFERENCES u(x), \
             d INT FOREIGN KEY REFERENCES u, \
             e INT CHECK (e > 0));",
            parse_create_table,
        );
        assert!(result.ok(), "{:?}", result.errors);
    }

    #[test]
    fn test_table_level_keys() {
        let result = parse(
            "CREATE TABLE t (a INT, b INT, PRIMARY KEY (a, b), \
             UNIQUE (b), FOREIGN KEY (a) REFERENCES u(x));",
            parse_create_table,
        );
        assert!(result.ok(), "{:?}", result.errors);
        let tree = result.tree();
        assert_eq!(tree.matches("TableKey").count(), 3);
    }
}
