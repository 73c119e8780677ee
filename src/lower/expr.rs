//! Expression lowering: syntax elements to [`Expr`] trees.

use rowan::ast::AstNode;

use crate::ast;
use crate::ir::{AggregateFunc, BinaryOp, ColumnRef, Expr, Literal, UnaryOp};
use crate::lower::{query::lower_query, LowerError};
use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Lowers one expression element: either an atom token or one of the
/// expression node kinds the grammar produces.
pub(crate) fn lower_expr(element: &SyntaxElement) -> Result<Expr, LowerError> {
    match element {
        SyntaxElement::Token(token) => lower_atom(token),
        SyntaxElement::Node(node) => match node.kind() {
            SyntaxKind::Expression => lower_compound(node),
            SyntaxKind::QualifiedIdent => Ok(Expr::Column(lower_qualified(node)?)),
            SyntaxKind::FunctionInvocation => lower_invocation(node),
            _ => Err(LowerError::UnexpectedSyntax("expected an expression")),
        },
    }
}

fn lower_atom(token: &SyntaxToken) -> Result<Expr, LowerError> {
    match token.kind() {
        SyntaxKind::Integer => token
            .text()
            .parse()
            .map(|value| Expr::Literal(Literal::Int(value)))
            .map_err(|_| LowerError::MalformedLiteral(token.text().to_string())),
        SyntaxKind::Double => token
            .text()
            .parse()
            .map(|value| Expr::Literal(Literal::Double(value)))
            .map_err(|_| LowerError::MalformedLiteral(token.text().to_string())),
        SyntaxKind::QuotedLiteral => {
            let text = token.text();
            Ok(Expr::Literal(Literal::Str(
                text[1..text.len() - 1].to_string(),
            )))
        }
        SyntaxKind::Keyword if token.text().eq_ignore_ascii_case("null") => {
            Ok(Expr::Literal(Literal::Null))
        }
        SyntaxKind::Ident => Ok(Expr::Column(ColumnRef::new(token.text()))),
        SyntaxKind::Asterisk => Ok(Expr::Column(ColumnRef::wildcard())),
        _ => Err(LowerError::UnexpectedSyntax("unexpected token in expression")),
    }
}

/// Lowers an `Expression` node: `[operand]`, `[prefix, operand]` or
/// `[lhs, op, rhs]`, with grouping parentheses skipped.
fn lower_compound(node: &SyntaxNode) -> Result<Expr, LowerError> {
    let elements: Vec<SyntaxElement> = ast::non_trivia_elements(node)
        .filter(|element| !matches!(element.kind(), SyntaxKind::LParen | SyntaxKind::RParen))
        .collect();

    match elements.as_slice() {
        [only] => lower_expr(only),
        [prefix, operand] => {
            let op = match prefix.kind() {
                SyntaxKind::Minus => UnaryOp::Neg,
                SyntaxKind::Keyword
                    if prefix
                        .as_token()
                        .is_some_and(|t| t.text().eq_ignore_ascii_case("not")) =>
                {
                    UnaryOp::Not
                }
                _ => return Err(LowerError::UnexpectedSyntax("bad prefix operator")),
            };
            Ok(Expr::unary(op, lower_expr(operand)?))
        }
        [lhs, op, rhs] => lower_binary(lhs, op, rhs),
        _ => Err(LowerError::UnexpectedSyntax("bad expression arity")),
    }
}

fn lower_binary(
    lhs: &SyntaxElement,
    op: &SyntaxElement,
    rhs: &SyntaxElement,
) -> Result<Expr, LowerError> {
    let op_token = op
        .as_token()
        .ok_or(LowerError::UnexpectedSyntax("operator must be a token"))?;

    let op = match op_token.kind() {
        SyntaxKind::Plus => BinaryOp::Add,
        SyntaxKind::Minus => BinaryOp::Sub,
        SyntaxKind::Asterisk => BinaryOp::Mul,
        SyntaxKind::Slash => BinaryOp::Div,
        SyntaxKind::ComparisonOp => match op_token.text() {
            "=" => BinaryOp::Eq,
            "<>" | "!=" => BinaryOp::Neq,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Leq,
            ">=" => BinaryOp::Geq,
            _ => return Err(LowerError::UnexpectedSyntax("unknown comparison operator")),
        },
        SyntaxKind::Keyword => match op_token.text().to_lowercase().as_str() {
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            "in" => {
                let subquery = rhs
                    .as_node()
                    .and_then(|node| ast::SubqueryExpr::cast(node.clone()))
                    .and_then(|subquery| subquery.query())
                    .ok_or(LowerError::UnexpectedSyntax("IN without a subquery"))?;
                return Ok(Expr::InQuery(
                    Box::new(lower_expr(lhs)?),
                    Box::new(lower_query(&subquery)?),
                ));
            }
            _ => return Err(LowerError::UnexpectedSyntax("unknown keyword operator")),
        },
        _ => return Err(LowerError::UnexpectedSyntax("unknown operator")),
    };

    Ok(Expr::binary(op, lower_expr(lhs)?, lower_expr(rhs)?))
}

fn lower_qualified(node: &SyntaxNode) -> Result<ColumnRef, LowerError> {
    let mut idents = node
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|token| {
            matches!(token.kind(), SyntaxKind::Ident | SyntaxKind::Asterisk)
        });

    let qualifier = idents
        .next()
        .ok_or(LowerError::UnexpectedSyntax("qualified name without qualifier"))?;
    let name = idents
        .next()
        .ok_or(LowerError::UnexpectedSyntax("qualified name without member"))?;

    Ok(ColumnRef::new(name.text()).with_qualifier(qualifier.text()))
}

fn lower_invocation(node: &SyntaxNode) -> Result<Expr, LowerError> {
    let mut name = None;
    let mut args = Vec::new();

    for element in ast::non_trivia_elements(node) {
        match &element {
            SyntaxElement::Token(token) if token.kind() == SyntaxKind::Ident && name.is_none() => {
                name = Some(token.text().to_string());
            }
            SyntaxElement::Token(token)
                if matches!(
                    token.kind(),
                    SyntaxKind::LParen | SyntaxKind::RParen | SyntaxKind::Comma
                ) => {}
            _ => args.push(element.clone()),
        }
    }

    let name = name.ok_or(LowerError::UnexpectedSyntax("invocation without a name"))?;
    let func = AggregateFunc::from_name(&name).ok_or(LowerError::UnknownFunction(name.clone()))?;

    let [arg] = args.as_slice() else {
        return Err(LowerError::AggregateArity(name));
    };
    let arg = lower_expr(arg)?;
    if arg.contains_aggregate() {
        return Err(LowerError::NestedAggregate);
    }

    Ok(Expr::aggregate(func, arg))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::grammar::parse_expr;
    use crate::parser::Parser;

    fn lower_str(input: &str) -> Result<Expr, LowerError> {
        let mut parser = Parser::new(input);
        parse_expr(&mut parser);
        let parse = parser.build();
        assert!(parse.ok(), "{:?}", parse.errors);
        let root = parse.syntax();
        let element = crate::ast::non_trivia_elements(&root)
            .find(|element| {
                !matches!(element.kind(), SyntaxKind::LParen | SyntaxKind::RParen)
            })
            .unwrap();
        lower_expr(&element)
    }

    #[test]
    fn lower_arithmetic_precedence() {
        assert_eq!(
            lower_str("1 + a * 2").unwrap().to_string(),
            "Add(1, Mul(a, 2))"
        );
    }

    #[test]
    fn lower_redundant_parens_vanish() {
        assert_eq!(lower_str("(((x)))").unwrap().to_string(), "x");
        assert_eq!(
            lower_str("a * (1 + 2)").unwrap().to_string(),
            "Mul(a, Add(1, 2))"
        );
    }

    #[test]
    fn lower_comparisons_and_logic() {
        assert_eq!(
            lower_str("a <= 1 OR NOT b = 2").unwrap().to_string(),
            "Or(Leq(a, 1), Not(Eq(b, 2)))"
        );
    }

    #[test]
    fn lower_unary_minus() {
        assert_eq!(lower_str("-x + 1").unwrap().to_string(), "Add(Neg(x), 1)");
    }

    #[test]
    fn lower_literals() {
        assert_eq!(lower_str("1.5").unwrap().to_string(), "1.5");
        assert_eq!(lower_str("'hi'").unwrap().to_string(), "'hi'");
        assert_eq!(lower_str("NULL").unwrap().to_string(), "NULL");
    }

    #[test]
    fn lower_aggregates() {
        assert_eq!(lower_str("count(*)").unwrap().to_string(), "Count(*)");
        assert_eq!(
            lower_str("sum(x + y)").unwrap().to_string(),
            "Sum(Add(x, y))"
        );
    }

    #[test]
    fn lower_aggregate_arity_error() {
        assert_eq!(
            lower_str("count(a, b)"),
            Err(LowerError::AggregateArity("count".into()))
        );
    }
}
