//! The sugared relational algebra: the query tree as SQL surface forms
//! describe it, with multi-kind joins, aliases and wildcards intact.

use std::fmt;

use crate::ir::{comma, ColumnRef, Expr};

/// A sugared query tree. Desugaring rewrites it into [`crate::ir::Ra`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sra {
    /// A base table, optionally given a query-local alias.
    Table {
        name: String,
        alias: Option<String>,
    },
    /// Projection. Item order determines output column order and is
    /// observable. `group_by`/`having`/`limit` are carried as annotations
    /// only; no lowering exists for them yet.
    Project {
        distinct: bool,
        items: Vec<ProjectItem>,
        group_by: Vec<Expr>,
        having: Option<Expr>,
        limit: Option<u64>,
        child: Box<Sra>,
    },
    /// Relational selection (WHERE).
    Select {
        predicate: Expr,
        child: Box<Sra>,
    },
    /// A join of any surface kind. Operand order is meaningful for the
    /// outer kinds.
    Join {
        kind: JoinKind,
        condition: JoinCondition,
        left: Box<Sra>,
        right: Box<Sra>,
    },
    /// A single ordering key. Multiple keys chain, outermost = primary.
    OrderBy {
        column: ColumnRef,
        direction: SortDirection,
        child: Box<Sra>,
    },
    SetOp {
        kind: SetOpKind,
        left: Box<Sra>,
        right: Box<Sra>,
    },
}

impl Sra {
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased_table(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::Table {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// A plain projection without DISTINCT or annotations.
    pub fn project(items: Vec<ProjectItem>, child: Sra) -> Self {
        Self::Project {
            distinct: false,
            items,
            group_by: Vec::new(),
            having: None,
            limit: None,
            child: Box::new(child),
        }
    }

    pub fn select(predicate: Expr, child: Sra) -> Self {
        Self::Select {
            predicate,
            child: Box::new(child),
        }
    }
}

/// One item of a projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectItem {
    /// The bare `*`.
    Wildcard,
    /// A `t.*` wildcard, restricted to one relation.
    QualifiedWildcard(String),
    /// An expression, optionally renamed with `AS`.
    Expr {
        expr: Expr,
        alias: Option<String>,
    },
}

impl ProjectItem {
    pub fn expr(expr: Expr) -> Self {
        Self::Expr { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }
}

impl fmt::Display for ProjectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::QualifiedWildcard(qualifier) => write!(f, "{qualifier}.*"),
            Self::Expr { expr, alias: None } => write!(f, "{expr}"),
            Self::Expr {
                expr,
                alias: Some(alias),
            } => write!(f, "({expr}, {alias})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Cross,
    LeftOuter,
    RightOuter,
    FullOuter,
    Natural,
}

impl JoinKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Cross => "cross",
            Self::LeftOuter => "left_outer",
            Self::RightOuter => "right_outer",
            Self::FullOuter => "full_outer",
            Self::Natural => "natural",
        }
    }
}

/// The condition attached to a join, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<String>),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn name(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl SetOpKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Union => "Union",
            Self::Intersect => "Intersect",
            Self::Except => "Except",
        }
    }
}

impl fmt::Display for Sra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { name, alias: None } => write!(f, "Table({name})"),
            Self::Table {
                name,
                alias: Some(alias),
            } => write!(f, "Table({name}, {alias})"),
            Self::Project {
                distinct,
                items,
                group_by,
                having,
                limit,
                child,
            } => {
                write!(f, "Project(")?;
                if *distinct {
                    write!(f, "distinct, ")?;
                }
                write!(f, "[{}]", comma(items))?;
                if !group_by.is_empty() {
                    write!(f, ", groupby=[{}]", comma(group_by))?;
                }
                if let Some(having) = having {
                    write!(f, ", having={having}")?;
                }
                if let Some(limit) = limit {
                    write!(f, ", limit={limit}")?;
                }
                write!(f, ", {child})")
            }
            Self::Select { predicate, child } => write!(f, "Select({predicate}, {child})"),
            Self::Join {
                kind,
                condition,
                left,
                right,
            } => {
                write!(f, "Join({}, {left}, {right}", kind.name())?;
                match condition {
                    JoinCondition::On(expr) => write!(f, ", {expr}")?,
                    JoinCondition::Using(columns) => write!(f, ", using({})", columns.join(", "))?,
                    JoinCondition::None => {}
                }
                write!(f, ")")
            }
            Self::OrderBy {
                column,
                direction,
                child,
            } => write!(f, "OrderBy({column}, {}, {child})", direction.name()),
            Self::SetOp { kind, left, right } => {
                write!(f, "{}({left}, {right})", kind.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOp;

    #[test]
    fn display_matches_prefix_form() {
        let sra = Sra::project(
            vec![
                ProjectItem::Wildcard,
                ProjectItem::aliased(
                    Expr::binary(BinaryOp::Add, Expr::column("x"), Expr::column("y")),
                    "z",
                ),
            ],
            Sra::table("t"),
        );
        assert_eq!(
            sra.to_string(),
            "Project([*, (Add(x, y), z)], Table(t))"
        );
    }

    #[test]
    fn display_join_with_condition() {
        let sra = Sra::Join {
            kind: JoinKind::Inner,
            condition: JoinCondition::On(Expr::binary(
                BinaryOp::Eq,
                Expr::qualified("a", "x"),
                Expr::qualified("b", "x"),
            )),
            left: Box::new(Sra::table("a")),
            right: Box::new(Sra::table("b")),
        };
        assert_eq!(
            sra.to_string(),
            "Join(inner, Table(a), Table(b), Eq(a.x, b.x))"
        );
    }

    #[test]
    fn display_aliased_table_and_order() {
        let sra = Sra::OrderBy {
            column: ColumnRef::new("a"),
            direction: SortDirection::Desc,
            child: Box::new(Sra::aliased_table("Foo", "f")),
        };
        assert_eq!(sra.to_string(), "OrderBy(a, desc, Table(Foo, f))");
    }
}
