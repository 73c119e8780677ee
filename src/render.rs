//! Renders statements and parser-shaped query trees back to SQL text.
//!
//! Together with the parser this gives the round-trip law: lowering the
//! rendered text yields a tree structurally equal to the original. The
//! renderer is total over all trees, but only parser-shaped queries (a
//! projection over an optional selection over a join tree) are guaranteed
//! to re-parse.

use crate::ir::{
    ColumnConstraint, Datatype, Expr, JoinCondition, JoinKind, ProjectItem, SetOpKind,
    SortDirection, Sra, Statement, TableKey, UnaryOp,
};

/// Renders one statement, terminated by `;`.
pub fn statement_to_sql(statement: &Statement) -> String {
    match statement {
        Statement::Query(query) => format!("{};", query_to_sql(query)),
        Statement::CreateTable(stmt) => {
            let mut elements: Vec<String> = stmt
                .columns
                .iter()
                .map(|column| {
                    let mut sql = format!("{} {}", column.name, datatype_to_sql(&column.datatype));
                    for constraint in &column.constraints {
                        sql.push(' ');
                        sql.push_str(&constraint_to_sql(constraint));
                    }
                    sql
                })
                .collect();
            elements.extend(stmt.keys.iter().map(key_to_sql));
            format!("CREATE TABLE {} ({});", stmt.name, elements.join(", "))
        }
        Statement::Insert(stmt) => {
            let columns = match &stmt.columns {
                Some(columns) => format!(" ({})", columns.join(", ")),
                None => String::new(),
            };
            let values: Vec<String> = stmt.values.iter().map(ToString::to_string).collect();
            format!(
                "INSERT INTO {}{} VALUES ({});",
                stmt.table,
                columns,
                values.join(", ")
            )
        }
        Statement::Delete(stmt) => match &stmt.predicate {
            Some(predicate) => {
                format!("DELETE FROM {} WHERE {};", stmt.table, expr_to_sql(predicate))
            }
            None => format!("DELETE FROM {};", stmt.table),
        },
    }
}

/// Renders a query without the statement terminator.
pub fn query_to_sql(query: &Sra) -> String {
    // Ordering decorations wrap the query; outermost is the primary key.
    let mut keys = Vec::new();
    let mut node = query;
    while let Sra::OrderBy {
        column,
        direction,
        child,
    } = node
    {
        keys.push((column, direction));
        node = child;
    }

    let mut sql = body_to_sql(node);
    if !keys.is_empty() {
        let keys: Vec<String> = keys
            .iter()
            .map(|(column, direction)| {
                format!(
                    "{column} {}",
                    match direction {
                        SortDirection::Asc => "ASC",
                        SortDirection::Desc => "DESC",
                    }
                )
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }
    // LIMIT is recorded on the projection but written after ORDER BY.
    if let Sra::Project {
        limit: Some(limit), ..
    } = node
    {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    sql
}

fn body_to_sql(node: &Sra) -> String {
    match node {
        Sra::SetOp { kind, left, right } => {
            let operator = match kind {
                SetOpKind::Union => "UNION",
                SetOpKind::Intersect => "INTERSECT",
                SetOpKind::Except => "EXCEPT",
            };
            format!(
                "{} {operator} {}",
                query_to_sql(left),
                query_to_sql(right)
            )
        }
        _ => select_core_to_sql(node),
    }
}

fn select_core_to_sql(node: &Sra) -> String {
    let (distinct, items, group_by, having, node) = match node {
        Sra::Project {
            distinct,
            items,
            group_by,
            having,
            child,
            ..
        } => (
            *distinct,
            Some(items),
            group_by.as_slice(),
            having.as_ref(),
            child.as_ref(),
        ),
        other => (false, None, &[] as &[Expr], None, other),
    };

    let (predicate, from) = match node {
        Sra::Select { predicate, child } => (Some(predicate), child.as_ref()),
        other => (None, other),
    };

    let mut sql = String::from("SELECT ");
    if distinct {
        sql.push_str("DISTINCT ");
    }
    match items {
        Some(items) => {
            let items: Vec<String> = items.iter().map(item_to_sql).collect();
            sql.push_str(&items.join(", "));
        }
        None => sql.push('*'),
    }

    sql.push_str(" FROM ");
    sql.push_str(&from_to_sql(from));

    if let Some(predicate) = predicate {
        sql.push_str(" WHERE ");
        sql.push_str(&expr_to_sql(predicate));
    }
    if !group_by.is_empty() {
        let exprs: Vec<String> = group_by.iter().map(expr_to_sql).collect();
        sql.push_str(" GROUP BY ");
        sql.push_str(&exprs.join(", "));
    }
    if let Some(having) = having {
        sql.push_str(" HAVING ");
        sql.push_str(&expr_to_sql(having));
    }

    sql
}

fn item_to_sql(item: &ProjectItem) -> String {
    match item {
        ProjectItem::Wildcard => "*".to_string(),
        ProjectItem::QualifiedWildcard(relation) => format!("{relation}.*"),
        ProjectItem::Expr { expr, alias: None } => expr_to_sql(expr),
        ProjectItem::Expr {
            expr,
            alias: Some(alias),
        } => format!("{} AS {alias}", expr_to_sql(expr)),
    }
}

fn from_to_sql(node: &Sra) -> String {
    match node {
        Sra::Table { name, alias: None } => name.clone(),
        Sra::Table {
            name,
            alias: Some(alias),
        } => format!("{name} AS {alias}"),
        Sra::Join {
            kind,
            condition,
            left,
            right,
        } => {
            let joiner = match kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Cross => "CROSS JOIN",
                JoinKind::Natural => "NATURAL JOIN",
                JoinKind::LeftOuter => "LEFT OUTER JOIN",
                JoinKind::RightOuter => "RIGHT OUTER JOIN",
                JoinKind::FullOuter => "FULL OUTER JOIN",
            };
            let mut sql = format!("{} {joiner} {}", from_to_sql(left), from_to_sql(right));
            match condition {
                JoinCondition::On(on) => {
                    sql.push_str(" ON ");
                    sql.push_str(&expr_to_sql(on));
                }
                JoinCondition::Using(columns) => {
                    sql.push_str(" USING (");
                    sql.push_str(&columns.join(", "));
                    sql.push(')');
                }
                JoinCondition::None => {}
            }
            sql
        }
        // Not expressible in the FROM grammar; emitted for totality only.
        other => format!("({})", query_to_sql(other)),
    }
}

pub(crate) fn expr_to_sql(expr: &Expr) -> String {
    match expr {
        Expr::Literal(literal) => literal.to_string(),
        Expr::Column(column) => column.to_string(),
        Expr::Binary { op, lhs, rhs } => {
            use crate::ir::BinaryOp::*;
            let symbol = match op {
                Add => "+",
                Sub => "-",
                Mul => "*",
                Div => "/",
                Eq => "=",
                Neq => "<>",
                Lt => "<",
                Gt => ">",
                Leq => "<=",
                Geq => ">=",
                And => "AND",
                Or => "OR",
            };
            format!("({} {symbol} {})", expr_to_sql(lhs), expr_to_sql(rhs))
        }
        Expr::Unary {
            op: UnaryOp::Neg,
            expr,
        } => format!("(-{})", expr_to_sql(expr)),
        Expr::Unary {
            op: UnaryOp::Not,
            expr,
        } => format!("(NOT {})", expr_to_sql(expr)),
        Expr::InQuery(needle, subquery) => {
            format!("({} IN ({}))", expr_to_sql(needle), query_to_sql(subquery))
        }
        // Lowered subqueries have no SQL surface; printed for totality.
        Expr::InRelation(needle, relation) => {
            format!("({} IN ({relation}))", expr_to_sql(needle))
        }
        Expr::Aggregate { func, arg } => {
            format!("{}({})", func.name().to_uppercase(), expr_to_sql(arg))
        }
    }
}

fn datatype_to_sql(datatype: &Datatype) -> String {
    match datatype.size {
        Some(size) => format!("{}({size})", datatype.name.to_uppercase()),
        None => datatype.name.to_uppercase(),
    }
}

fn constraint_to_sql(constraint: &ColumnConstraint) -> String {
    match constraint {
        ColumnConstraint::NotNull => "NOT NULL".to_string(),
        ColumnConstraint::Unique => "UNIQUE".to_string(),
        ColumnConstraint::PrimaryKey => "PRIMARY KEY".to_string(),
        ColumnConstraint::ForeignKey {
            table,
            column: None,
        } => format!("REFERENCES {table}"),
        ColumnConstraint::ForeignKey {
            table,
            column: Some(column),
        } => format!("REFERENCES {table}({column})"),
        ColumnConstraint::Default(literal) => format!("DEFAULT {literal}"),
        ColumnConstraint::AutoIncrement => "AUTO INCREMENT".to_string(),
        ColumnConstraint::Check(expr) => format!("CHECK ({})", expr_to_sql(expr)),
    }
}

fn key_to_sql(key: &TableKey) -> String {
    match key {
        TableKey::Primary(columns) => format!("PRIMARY KEY ({})", columns.join(", ")),
        TableKey::Unique(columns) => format!("UNIQUE ({})", columns.join(", ")),
        TableKey::Foreign {
            columns,
            table,
            references,
        } => {
            let mut sql = format!("FOREIGN KEY ({}) REFERENCES {table}", columns.join(", "));
            if !references.is_empty() {
                sql.push_str(&format!("({})", references.join(", ")));
            }
            sql
        }
    }
}
