//! Implements parsing of queries: SELECT bodies, join chains, set
//! operations and the trailing clauses.

use super::expressions::{parse_expr, parse_name};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Parses a full query statement: one or more SELECT bodies combined by set
/// operators, terminated by an optional `;`.
pub(crate) fn parse_query_stmt(p: &mut Parser) {
    p.start(SyntaxKind::QueryStmt);
    parse_query_body(p);
    p.eat(TokenKind::SemiColon);
    p.finish();
}

/// Parses the body of a query without the statement terminator. Set
/// operations are left-associative; the flat keyword/body sequence in the
/// tree is folded by the lowering step.
pub(crate) fn parse_query_body(p: &mut Parser) {
    parse_select_body(p);
    while matches!(
        p.current(),
        TokenKind::UnionKw | TokenKind::IntersectKw | TokenKind::ExceptKw
    ) {
        p.bump_any();
        parse_select_body(p);
    }
}

fn parse_select_body(p: &mut Parser) {
    p.start(SyntaxKind::SelectStmt);
    p.expect(TokenKind::SelectKw);
    p.eat(TokenKind::DistinctKw);
    parse_select_clause(p);
    p.expect(TokenKind::FromKw);
    parse_from_clause(p);

    if p.at(TokenKind::WhereKw) {
        parse_where_clause(p);
    }
    if p.at(TokenKind::GroupKw) {
        parse_group_by_clause(p);
    }
    if p.at(TokenKind::HavingKw) {
        parse_having_clause(p);
    }
    if p.at(TokenKind::OrderKw) {
        parse_order_by_clause(p);
    }
    if p.at(TokenKind::LimitKw) {
        parse_limit_clause(p);
    }

    p.finish();
}

fn parse_select_clause(p: &mut Parser) {
    p.start(SyntaxKind::SelectClause);
    parse_select_item(p);
    while p.eat(TokenKind::Comma) {
        parse_select_item(p);
    }
    p.finish();
}

fn parse_select_item(p: &mut Parser) {
    p.start(SyntaxKind::SelectItem);

    if p.eat(TokenKind::Asterisk) {
        p.finish();
        return;
    }

    parse_expr(p);

    // Both `expr AS alias` and the bare `expr alias` form are accepted.
    if p.eat(TokenKind::AsKw) {
        p.start(SyntaxKind::Alias);
        p.expect(TokenKind::Ident);
        p.finish();
    } else if p.at(TokenKind::Ident) {
        p.start(SyntaxKind::Alias);
        p.bump(TokenKind::Ident);
        p.finish();
    }

    p.finish();
}

fn parse_from_clause(p: &mut Parser) {
    p.start(SyntaxKind::FromClause);
    parse_table_ref(p);

    loop {
        match p.current() {
            // Comma-separated tables chain like condition-less joins.
            TokenKind::Comma => {
                p.bump(TokenKind::Comma);
                parse_table_ref(p);
            }
            TokenKind::JoinKw
            | TokenKind::InnerKw
            | TokenKind::CrossKw
            | TokenKind::NaturalKw
            | TokenKind::LeftKw
            | TokenKind::RightKw
            | TokenKind::FullKw => parse_join_clause(p),
            _ => break,
        }
    }

    p.finish();
}

fn parse_table_ref(p: &mut Parser) {
    p.start(SyntaxKind::TableRef);
    p.expect(TokenKind::Ident);

    if p.eat(TokenKind::AsKw) {
        p.start(SyntaxKind::Alias);
        p.expect(TokenKind::Ident);
        p.finish();
    } else if p.at(TokenKind::Ident) {
        p.start(SyntaxKind::Alias);
        p.bump(TokenKind::Ident);
        p.finish();
    }

    p.finish();
}

fn parse_join_clause(p: &mut Parser) {
    p.start(SyntaxKind::JoinClause);

    p.eat(TokenKind::NaturalKw);
    match p.current() {
        TokenKind::InnerKw | TokenKind::CrossKw => p.bump_any(),
        TokenKind::LeftKw | TokenKind::RightKw | TokenKind::FullKw => {
            p.bump_any();
            p.eat(TokenKind::OuterKw);
        }
        _ => {}
    }
    p.expect(TokenKind::JoinKw);

    parse_table_ref(p);

    if p.at(TokenKind::OnKw) {
        p.start(SyntaxKind::OnClause);
        p.bump(TokenKind::OnKw);
        parse_expr(p);
        p.finish();
    } else if p.at(TokenKind::UsingKw) {
        p.start(SyntaxKind::UsingClause);
        p.bump(TokenKind::UsingKw);
        p.expect(TokenKind::LParen);
        super::parse_ident_list(p);
        p.expect(TokenKind::RParen);
        p.finish();
    }

    p.finish();
}

pub(crate) fn parse_where_clause(p: &mut Parser) {
    p.start(SyntaxKind::WhereClause);
    p.expect(TokenKind::WhereKw);
    parse_expr(p);
    p.finish();
}

fn parse_group_by_clause(p: &mut Parser) {
    p.start(SyntaxKind::GroupByClause);
    p.bump(TokenKind::GroupKw);
    p.expect(TokenKind::ByKw);
    parse_expr(p);
    while p.eat(TokenKind::Comma) {
        parse_expr(p);
    }
    p.finish();
}

fn parse_having_clause(p: &mut Parser) {
    p.start(SyntaxKind::HavingClause);
    p.bump(TokenKind::HavingKw);
    parse_expr(p);
    p.finish();
}

fn parse_order_by_clause(p: &mut Parser) {
    p.start(SyntaxKind::OrderByClause);
    p.bump(TokenKind::OrderKw);
    p.expect(TokenKind::ByKw);
    parse_order_item(p);
    while p.eat(TokenKind::Comma) {
        parse_order_item(p);
    }
    p.finish();
}

fn parse_limit_clause(p: &mut Parser) {
    p.start(SyntaxKind::LimitClause);
    p.bump(TokenKind::LimitKw);
    p.expect(TokenKind::Integer);
    p.finish();
}

fn parse_order_item(p: &mut Parser) {
    p.start(SyntaxKind::OrderItem);
    if p.at(TokenKind::Ident) {
        parse_name(p);
    } else {
        p.error(format!("expected an ordering column, found {}", p.current()));
    }
    if matches!(p.current(), TokenKind::AscKw | TokenKind::DescKw) {
        p.bump_any();
    }
    p.finish();
}

#[cfg(test)]
mod tests {
    use super::super::tests::{check, parse};
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_parse_simple_select() {
        check(
            parse("SELECT * FROM t;", parse_query_stmt),
            expect![[r#"
Root@0..16
  QueryStmt@0..16
    SelectStmt@0..15
      Keyword@0..6 "SELECT"
      Whitespace@6..7 " "
      SelectClause@7..8
        SelectItem@7..8
          Asterisk@7..8 "*"
      Whitespace@8..9 " "
      Keyword@9..13 "FROM"
      Whitespace@13..14 " "
      FromClause@14..15
        TableRef@14..15
          Ident@14..15 "t"
    SemiColon@15..16 ";"
"#]],
        );
    }

    #[test]
    fn test_parse_select_with_where() {
        check(
            parse("SELECT a, b FROM t WHERE a > 1", parse_query_stmt),
            expect![[r#"
Root@0..30
  QueryStmt@0..30
    SelectStmt@0..30
      Keyword@0..6 "SELECT"
      Whitespace@6..7 " "
      SelectClause@7..11
        SelectItem@7..8
          Ident@7..8 "a"
        Comma@8..9 ","
        Whitespace@9..10 " "
        SelectItem@10..11
          Ident@10..11 "b"
      Whitespace@11..12 " "
      Keyword@12..16 "FROM"
      Whitespace@16..17 " "
      FromClause@17..18
        TableRef@17..18
          Ident@17..18 "t"
      Whitespace@18..19 " "
      WhereClause@19..30
        Keyword@19..24 "WHERE"
        Whitespace@24..25 " "
        Expression@25..30
          Ident@25..26 "a"
          Whitespace@26..27 " "
          ComparisonOp@27..28 ">"
          Whitespace@28..29 " "
          Integer@29..30 "1"
"#]],
        );
    }

    #[test]
    fn test_parse_inner_join_with_on() {
        check(
            parse("SELECT * FROM a JOIN b ON a.x = b.x", parse_query_stmt),
            expect![[r#"
Root@0..35
  QueryStmt@0..35
    SelectStmt@0..35
      Keyword@0..6 "SELECT"
      Whitespace@6..7 " "
      SelectClause@7..8
        SelectItem@7..8
          Asterisk@7..8 "*"
      Whitespace@8..9 " "
      Keyword@9..13 "FROM"
      Whitespace@13..14 " "
      FromClause@14..35
        TableRef@14..15
          Ident@14..15 "a"
        Whitespace@15..16 " "
        JoinClause@16..35
          Keyword@16..20 "JOIN"
          Whitespace@20..21 " "
          TableRef@21..22
            Ident@21..22 "b"
          Whitespace@22..23 " "
          OnClause@23..35
            Keyword@23..25 "ON"
            Whitespace@25..26 " "
            Expression@26..35
              QualifiedIdent@26..29
                Ident@26..27 "a"
                Dot@27..28 "."
                Ident@28..29 "x"
              Whitespace@29..30 " "
              ComparisonOp@30..31 "="
              Whitespace@31..32 " "
              QualifiedIdent@32..35
                Ident@32..33 "b"
                Dot@33..34 "."
                Ident@34..35 "x"
"#]],
        );
    }

    #[test]
    fn test_parse_aliased_projection_and_table() {
        check(
            parse("SELECT f.a AS Col1 FROM Foo f", parse_query_stmt),
            expect![[r#"
Root@0..29
  QueryStmt@0..29
    SelectStmt@0..29
      Keyword@0..6 "SELECT"
      Whitespace@6..7 " "
      SelectClause@7..18
        SelectItem@7..18
          QualifiedIdent@7..10
            Ident@7..8 "f"
            Dot@8..9 "."
            Ident@9..10 "a"
          Whitespace@10..11 " "
          Keyword@11..13 "AS"
          Whitespace@13..14 " "
          Alias@14..18
            Ident@14..18 "Col1"
      Whitespace@18..19 " "
      Keyword@19..23 "FROM"
      Whitespace@23..24 " "
      FromClause@24..29
        TableRef@24..29
          Ident@24..27 "Foo"
          Whitespace@27..28 " "
          Alias@28..29
            Ident@28..29 "f"
"#]],
        );
    }

    #[test]
    fn test_parse_set_operations_flat() {
        let result = parse(
            "SELECT a FROM t1 UNION SELECT a FROM t2 INTERSECT SELECT a FROM t3;",
            parse_query_stmt,
        );
        assert!(result.ok(), "{:?}", result.errors);
        let query = result.syntax().first_child().unwrap();
        assert_eq!(query.kind(), crate::syntax::SyntaxKind::QueryStmt);
        assert_eq!(
            query
                .children()
                .filter(|n| n.kind() == crate::syntax::SyntaxKind::SelectStmt)
                .count(),
            3
        );
    }

    #[test]
    fn test_parse_join_kinds() {
        for input in [
            "SELECT * FROM a CROSS JOIN b",
            "SELECT * FROM a NATURAL JOIN b",
            "SELECT * FROM a INNER JOIN b ON a.x = b.x",
            "SELECT * FROM a LEFT JOIN b ON a.x = b.x",
            "SELECT * FROM a LEFT OUTER JOIN b ON a.x = b.x",
            "SELECT * FROM a RIGHT OUTER JOIN b ON a.x = b.x",
            "SELECT * FROM a FULL OUTER JOIN b ON a.x = b.x",
            "SELECT * FROM a JOIN b USING (x, y)",
        ] {
            let result = parse(input, parse_query_stmt);
            assert!(result.ok(), "{input}: {:?}", result.errors);
        }
    }

    #[test]
    fn test_parse_trailing_clauses() {
        let result = parse(
            "SELECT a FROM t GROUP BY a HAVING count(a) > 1 ORDER BY a DESC, b LIMIT 10",
            parse_query_stmt,
        );
        assert!(result.ok(), "{:?}", result.errors);
        let tree = result.tree();
        assert!(tree.contains("GroupByClause"));
        assert!(tree.contains("HavingClause"));
        assert!(tree.contains("OrderByClause"));
        assert!(tree.contains("LimitClause"));
    }

    #[test]
    fn test_parse_in_subquery() {
        let result = parse(
            "SELECT a FROM t WHERE a IN (SELECT b FROM u)",
            parse_query_stmt,
        );
        assert!(result.ok(), "{:?}", result.errors);
        assert!(result.tree().contains("SubqueryExpr"));
    }
}
