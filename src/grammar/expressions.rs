//! Implements the logic/arithmetic SQL expression parser.

//  Heavily inspired by
//    https://matklad.github.io/2020/04/13/simple-but-powerful-pratt-parsing.html
//    https://arzg.github.io/lang/10/

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Right binding power of unary minus, tighter than any binary operator.
const NEG_BP: u8 = 13;
/// Right binding power of `NOT`, tighter than `AND` but looser than any
/// comparison.
const NOT_BP: u8 = 5;

pub(crate) fn parse_expr(p: &mut Parser) {
    expr_bp(p, 0);
}

fn expr_bp(p: &mut Parser, min_bp: u8) {
    let checkpoint = p.checkpoint();

    match p.current() {
        TokenKind::Ident => parse_name(p),
        TokenKind::Integer
        | TokenKind::Double
        | TokenKind::QuotedLiteral
        | TokenKind::NullKw => p.bump_any(),
        TokenKind::LParen => {
            p.bump(TokenKind::LParen);
            expr_bp(p, 0);
            if !p.expect(TokenKind::RParen) {
                p.error("unbalanced parentheses in expression");
            }
        }
        TokenKind::Minus => {
            p.bump(TokenKind::Minus);
            p.start_node_at(checkpoint, SyntaxKind::Expression);
            expr_bp(p, NEG_BP);
            p.finish();
        }
        TokenKind::NotKw => {
            p.bump(TokenKind::NotKw);
            p.start_node_at(checkpoint, SyntaxKind::Expression);
            expr_bp(p, NOT_BP);
            p.finish();
        }
        t => {
            p.error(format!("expected an expression, found {t}"));
            return;
        }
    }

    // Comparisons are non-associative: a second comparison operator at the
    // same binding level is a syntax error, not a left fold.
    let mut seen_comparison = false;

    loop {
        let op = p.current();
        let Some((l_bp, r_bp)) = infix_bp(op) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }

        if is_comparison(op) {
            if seen_comparison {
                p.error("comparison operators cannot be chained");
                break;
            }
            seen_comparison = true;
        }

        p.bump_any();
        p.start_node_at(checkpoint, SyntaxKind::Expression);
        if op == TokenKind::InKw {
            parse_subquery(p);
        } else {
            expr_bp(p, r_bp);
        }
        p.finish();
    }
}

/// Parses an identifier-led atom: a plain or dot-qualified reference
/// (including `t.*`), or an aggregate/function invocation.
pub(crate) fn parse_name(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    p.bump(TokenKind::Ident);

    if p.at(TokenKind::Dot) {
        p.start_node_at(checkpoint, SyntaxKind::QualifiedIdent);
        p.bump(TokenKind::Dot);
        if !p.eat(TokenKind::Asterisk) {
            p.expect(TokenKind::Ident);
        }
        p.finish();
    } else if p.at(TokenKind::LParen) {
        p.start_node_at(checkpoint, SyntaxKind::FunctionInvocation);
        p.bump(TokenKind::LParen);
        if !p.eat(TokenKind::Asterisk) && !p.at(TokenKind::RParen) {
            expr_bp(p, 0);
            while p.eat(TokenKind::Comma) {
                expr_bp(p, 0);
            }
        }
        p.expect(TokenKind::RParen);
        p.finish();
    }
}

/// Parses the parenthesized query operand of `IN`.
fn parse_subquery(p: &mut Parser) {
    p.start(SyntaxKind::SubqueryExpr);
    if p.expect(TokenKind::LParen) {
        p.start(SyntaxKind::QueryStmt);
        super::query::parse_query_body(p);
        p.finish();
        p.expect(TokenKind::RParen);
    }
    p.finish();
}

fn is_comparison(op: TokenKind) -> bool {
    matches!(
        op,
        TokenKind::Equals | TokenKind::ComparisonOp | TokenKind::InKw
    )
}

fn infix_bp(op: TokenKind) -> Option<(u8, u8)> {
    match op {
        TokenKind::OrKw => Some((1, 2)),
        TokenKind::AndKw => Some((3, 4)),
        TokenKind::Equals | TokenKind::ComparisonOp | TokenKind::InKw => Some((7, 8)),
        TokenKind::Plus | TokenKind::Minus => Some((9, 10)),
        TokenKind::Asterisk | TokenKind::Slash => Some((11, 12)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{check, parse};
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_parse_literal() {
        check(
            parse("1", parse_expr),
            expect![[r#"
Root@0..1
  Integer@0..1 "1"
"#]],
        );
    }

    #[test]
    fn test_parse_prefix_expr() {
        check(
            parse("-a", parse_expr),
            expect![[r#"
Root@0..2
  Expression@0..2
    Minus@0..1 "-"
    Ident@1..2 "a"
"#]],
        );
    }

    #[test]
    fn test_parse_simple_expr() {
        check(
            parse("1 + a", parse_expr),
            expect![[r#"
Root@0..5
  Expression@0..5
    Integer@0..1 "1"
    Whitespace@1..2 " "
    Plus@2..3 "+"
    Whitespace@3..4 " "
    Ident@4..5 "a"
"#]],
        );
    }

    #[test]
    fn test_parse_op_precedence() {
        check(
            parse("1 + a * 2", parse_expr),
            expect![[r#"
Root@0..9
  Expression@0..9
    Integer@0..1 "1"
    Whitespace@1..2 " "
    Plus@2..3 "+"
    Whitespace@3..4 " "
    Expression@4..9
      Ident@4..5 "a"
      Whitespace@5..6 " "
      Asterisk@6..7 "*"
      Whitespace@7..8 " "
      Integer@8..9 "2"
"#]],
        );
    }

    #[test]
    fn test_parse_simple_paren_expr() {
        check(
            parse("(1 + a)", parse_expr),
            expect![[r#"
Root@0..7
  LParen@0..1 "("
  Expression@1..6
    Integer@1..2 "1"
    Whitespace@2..3 " "
    Plus@3..4 "+"
    Whitespace@4..5 " "
    Ident@5..6 "a"
  RParen@6..7 ")"
"#]],
        );
    }

    #[test]
    fn test_logical_precedence() {
        check(
            parse("a AND b OR c", parse_expr),
            expect![[r#"
Root@0..12
  Expression@0..12
    Expression@0..7
      Ident@0..1 "a"
      Whitespace@1..2 " "
      Keyword@2..5 "AND"
      Whitespace@5..6 " "
      Ident@6..7 "b"
    Whitespace@7..8 " "
    Keyword@8..10 "OR"
    Whitespace@10..11 " "
    Ident@11..12 "c"
"#]],
        );
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        check(
            parse("NOT a AND b", parse_expr),
            expect![[r#"
Root@0..11
  Expression@0..11
    Expression@0..5
      Keyword@0..3 "NOT"
      Whitespace@3..4 " "
      Ident@4..5 "a"
    Whitespace@5..6 " "
    Keyword@6..9 "AND"
    Whitespace@9..10 " "
    Ident@10..11 "b"
"#]],
        );
    }

    #[test]
    fn test_parse_qualified_ident() {
        check(
            parse("t.a", parse_expr),
            expect![[r#"
Root@0..3
  QualifiedIdent@0..3
    Ident@0..1 "t"
    Dot@1..2 "."
    Ident@2..3 "a"
"#]],
        );
    }

    #[test]
    fn test_parse_qualified_wildcard() {
        check(
            parse("t.*", parse_expr),
            expect![[r#"
Root@0..3
  QualifiedIdent@0..3
    Ident@0..1 "t"
    Dot@1..2 "."
    Asterisk@2..3 "*"
"#]],
        );
    }

    #[test]
    fn test_parse_aggregate_invocation() {
        check(
            parse("count(*)", parse_expr),
            expect![[r#"
Root@0..8
  FunctionInvocation@0..8
    Ident@0..5 "count"
    LParen@5..6 "("
    Asterisk@6..7 "*"
    RParen@7..8 ")"
"#]],
        );
    }

    #[test]
    fn test_chained_comparison_is_error() {
        let result = parse("a < b < c", parse_expr);
        assert!(!result.ok());
        assert!(result.errors[0].message.contains("chained"));
    }

    #[test]
    fn test_unbalanced_parens_is_error() {
        let result = parse("(1 + 2", parse_expr);
        assert!(!result.ok());
    }

    #[test]
    fn test_comparison_inside_logic_is_fine() {
        let result = parse("a < b AND c < d", parse_expr);
        assert!(result.ok(), "{:?}", result.errors);
    }
}
