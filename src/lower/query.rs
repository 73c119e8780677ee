//! Query lowering: syntax trees to sugared algebra.

use rowan::ast::AstNode;

use crate::ast;
use crate::ir::{
    ColumnRef, Expr, JoinCondition, JoinKind, ProjectItem, SetOpKind, SortDirection, Sra,
};
use crate::lower::{lower_expr, LowerError};
use crate::syntax::{SyntaxElement, SyntaxKind};

/// Lowers a query: the SELECT bodies are folded over their set operators
/// left-associatively.
pub(crate) fn lower_query(query: &ast::QueryStmt) -> Result<Sra, LowerError> {
    let mut bodies = query.select_bodies();
    let first = bodies
        .next()
        .ok_or(LowerError::UnexpectedSyntax("query without a SELECT body"))?;

    let mut sra = lower_select(&first)?;
    let mut operators = query.set_op_tokens();

    for body in bodies {
        let operator = operators
            .next()
            .ok_or(LowerError::UnexpectedSyntax("set operand without operator"))?;
        let kind = match operator.text().to_lowercase().as_str() {
            "union" => SetOpKind::Union,
            "intersect" => SetOpKind::Intersect,
            _ => SetOpKind::Except,
        };
        sra = Sra::SetOp {
            kind,
            left: Box::new(sra),
            right: Box::new(lower_select(&body)?),
        };
    }

    Ok(sra)
}

fn lower_select(select: &ast::SelectStmt) -> Result<Sra, LowerError> {
    let from = select
        .from_clause()
        .ok_or(LowerError::UnexpectedSyntax("SELECT without FROM"))?;
    let mut sra = lower_from(&from)?;

    if let Some(where_clause) = select.where_clause() {
        let element = where_clause
            .expression()
            .ok_or(LowerError::UnexpectedSyntax("WHERE without an expression"))?;
        sra = Sra::Select {
            predicate: lower_expr(&element)?,
            child: Box::new(sra),
        };
    }

    let clause = select
        .select_clause()
        .ok_or(LowerError::UnexpectedSyntax("SELECT without a projection"))?;
    let mut items = Vec::new();
    for item in clause.items() {
        items.push(lower_select_item(&item)?);
    }
    if items.is_empty() {
        return Err(LowerError::UnexpectedSyntax("empty projection list"));
    }

    let group_by = match select.group_by_clause() {
        Some(clause) => clause
            .expressions()
            .iter()
            .map(lower_expr)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let having = match select.having_clause() {
        Some(clause) => {
            let element = clause
                .expression()
                .ok_or(LowerError::UnexpectedSyntax("HAVING without an expression"))?;
            Some(lower_expr(&element)?)
        }
        None => None,
    };

    sra = Sra::Project {
        distinct: select.is_distinct(),
        items,
        group_by,
        having,
        limit: select.limit_clause().and_then(|clause| clause.value()),
        child: Box::new(sra),
    };

    // Ordering wraps the projection; the first key ends up outermost and is
    // the primary ordering.
    if let Some(order_by) = select.order_by_clause() {
        let mut keys = Vec::new();
        for item in order_by.items() {
            keys.push(lower_order_item(&item)?);
        }
        for (column, direction) in keys.into_iter().rev() {
            sra = Sra::OrderBy {
                column,
                direction,
                child: Box::new(sra),
            };
        }
    }

    Ok(sra)
}

fn lower_select_item(item: &ast::SelectItem) -> Result<ProjectItem, LowerError> {
    if item.is_wildcard() {
        return Ok(ProjectItem::Wildcard);
    }

    let element = item
        .expression()
        .ok_or(LowerError::UnexpectedSyntax("projection item without an expression"))?;

    match lower_expr(&element)? {
        Expr::Column(column) if column.is_wildcard() => match column.qualifier {
            Some(qualifier) => Ok(ProjectItem::QualifiedWildcard(qualifier)),
            None => Ok(ProjectItem::Wildcard),
        },
        expr => Ok(ProjectItem::Expr {
            expr,
            alias: item.alias(),
        }),
    }
}

fn lower_order_item(item: &ast::OrderItem) -> Result<(ColumnRef, SortDirection), LowerError> {
    let element = item
        .column()
        .ok_or(LowerError::UnexpectedSyntax("ordering key without a column"))?;
    let column = match lower_expr(&element)? {
        Expr::Column(column) if !column.is_wildcard() => column,
        _ => return Err(LowerError::UnexpectedSyntax("ordering key must be a column")),
    };
    let direction = match item.direction().as_deref() {
        Some("desc") => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    Ok((column, direction))
}

/// Folds the flat FROM element sequence into a left-associative join tree.
fn lower_from(from: &ast::FromClause) -> Result<Sra, LowerError> {
    let mut sra: Option<Sra> = None;

    for element in from.elements() {
        match &element {
            SyntaxElement::Token(token) if token.kind() == SyntaxKind::Comma => {}
            SyntaxElement::Node(node) if node.kind() == SyntaxKind::TableRef => {
                let table = lower_table_ref(
                    &ast::TableRef::cast(node.clone())
                        .ok_or(LowerError::UnexpectedSyntax("expected a table reference"))?,
                )?;
                sra = Some(match sra {
                    None => table,
                    // Comma-separated tables join like condition-less
                    // cross joins.
                    Some(left) => Sra::Join {
                        kind: JoinKind::Cross,
                        condition: JoinCondition::None,
                        left: Box::new(left),
                        right: Box::new(table),
                    },
                });
            }
            SyntaxElement::Node(node) if node.kind() == SyntaxKind::JoinClause => {
                let join = ast::JoinClause::cast(node.clone())
                    .ok_or(LowerError::UnexpectedSyntax("expected a join clause"))?;
                let left = sra.ok_or(LowerError::UnexpectedSyntax("join without a left operand"))?;
                sra = Some(lower_join(left, &join)?);
            }
            _ => return Err(LowerError::UnexpectedSyntax("unexpected FROM element")),
        }
    }

    sra.ok_or(LowerError::UnexpectedSyntax("empty FROM clause"))
}

fn lower_table_ref(table: &ast::TableRef) -> Result<Sra, LowerError> {
    let name = table
        .name()
        .ok_or(LowerError::UnexpectedSyntax("table reference without a name"))?;
    Ok(Sra::Table {
        name,
        alias: table.alias(),
    })
}

fn lower_join(left: Sra, join: &ast::JoinClause) -> Result<Sra, LowerError> {
    let keywords = join.keywords();
    let has = |kw: &str| keywords.iter().any(|k| k == kw);

    let kind = if has("natural") {
        JoinKind::Natural
    } else if has("cross") {
        JoinKind::Cross
    } else if has("left") {
        JoinKind::LeftOuter
    } else if has("right") {
        JoinKind::RightOuter
    } else if has("full") {
        JoinKind::FullOuter
    } else {
        JoinKind::Inner
    };

    let right = lower_table_ref(
        &join
            .table_ref()
            .ok_or(LowerError::UnexpectedSyntax("join without a right operand"))?,
    )?;

    let condition = if let Some(on) = join.on_clause() {
        let element = on
            .expression()
            .ok_or(LowerError::UnexpectedSyntax("ON without an expression"))?;
        JoinCondition::On(lower_expr(&element)?)
    } else if let Some(using) = join.using_clause() {
        JoinCondition::Using(using.columns())
    } else {
        JoinCondition::None
    };

    Ok(Sra::Join {
        kind,
        condition,
        left: Box::new(left),
        right: Box::new(right),
    })
}
