//! The minimal relational algebra that desugaring targets.

use std::fmt;

use crate::ir::{comma, ColumnRef, Expr, SetOpKind, SortDirection};

/// A core algebra tree.
///
/// `Pi` attribute lists hold plain (possibly qualified) names only: a
/// computed column enters the tree through a `Rho` that renames its printed
/// form, never as an expression inside a `Pi`.
#[derive(Debug, Clone, PartialEq)]
pub enum Ra {
    Table(String),
    Pi {
        distinct: bool,
        attributes: Vec<ColumnRef>,
        child: Box<Ra>,
    },
    Sigma {
        predicate: Expr,
        child: Box<Ra>,
    },
    Cross(Box<Ra>, Box<Ra>),
    /// Renames one computed expression to a target attribute name.
    Rho {
        expr: Expr,
        name: String,
        child: Box<Ra>,
    },
    /// Renames the relation as a whole.
    RhoTable {
        alias: String,
        child: Box<Ra>,
    },
    SetOp {
        kind: SetOpKind,
        left: Box<Ra>,
        right: Box<Ra>,
    },
    /// Ordering decoration; the core algebra has no native operator for it.
    OrderBy {
        column: ColumnRef,
        direction: SortDirection,
        child: Box<Ra>,
    },
    /// Null-padding join, kept as a marked construct because the five core
    /// operators cannot express it.
    OuterJoin {
        kind: OuterJoinKind,
        condition: Expr,
        left: Box<Ra>,
        right: Box<Ra>,
    },
}

impl Ra {
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(name.into())
    }

    /// A plain projection over the passed attributes.
    pub fn pi(attributes: Vec<ColumnRef>, child: Ra) -> Self {
        Self::Pi {
            distinct: false,
            attributes,
            child: Box::new(child),
        }
    }

    pub fn sigma(predicate: Expr, child: Ra) -> Self {
        Self::Sigma {
            predicate,
            child: Box::new(child),
        }
    }

    pub fn cross(left: Ra, right: Ra) -> Self {
        Self::Cross(Box::new(left), Box::new(right))
    }

    pub fn rho(expr: Expr, name: impl Into<String>, child: Ra) -> Self {
        Self::Rho {
            expr,
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn rho_table(alias: impl Into<String>, child: Ra) -> Self {
        Self::RhoTable {
            alias: alias.into(),
            child: Box::new(child),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OuterJoinKind {
    Left,
    Right,
    Full,
}

impl OuterJoinKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for Ra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(name) => write!(f, "Table({name})"),
            Self::Pi {
                distinct,
                attributes,
                child,
            } => {
                write!(f, "Pi(")?;
                if *distinct {
                    write!(f, "distinct, ")?;
                }
                write!(f, "[{}], {child})", comma(attributes))
            }
            Self::Sigma { predicate, child } => write!(f, "Sigma({predicate}, {child})"),
            Self::Cross(left, right) => write!(f, "Cross({left}, {right})"),
            Self::Rho { expr, name, child } => write!(f, "Rho({expr}, {name}, {child})"),
            Self::RhoTable { alias, child } => write!(f, "RhoTable({alias}, {child})"),
            Self::SetOp { kind, left, right } => {
                write!(f, "{}({left}, {right})", kind.name())
            }
            Self::OrderBy {
                column,
                direction,
                child,
            } => write!(f, "OrderBy({column}, {}, {child})", direction.name()),
            Self::OuterJoin {
                kind,
                condition,
                left,
                right,
            } => write!(f, "OuterJoin({}, {condition}, {left}, {right})", kind.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOp;

    #[test]
    fn display_readme_shape() {
        // Pi over Rho over a materializing Pi, as the printer is expected
        // to render a lowered computed projection.
        let add = Expr::binary(BinaryOp::Add, Expr::column("x"), Expr::column("y"));
        let ra = Ra::pi(
            vec![
                ColumnRef::new("w"),
                ColumnRef::new("x"),
                ColumnRef::new("y"),
                ColumnRef::new("z"),
            ],
            Ra::rho(
                add.clone(),
                "z",
                Ra::pi(
                    vec![
                        ColumnRef::new("w"),
                        ColumnRef::new("x"),
                        ColumnRef::new("y"),
                        ColumnRef::new(add.to_string()),
                    ],
                    Ra::table("t"),
                ),
            ),
        );
        assert_eq!(
            ra.to_string(),
            "Pi([w, x, y, z], Rho(Add(x, y), z, Pi([w, x, y, Add(x, y)], Table(t))))"
        );
    }

    #[test]
    fn display_sigma_cross() {
        let ra = Ra::sigma(
            Expr::binary(
                BinaryOp::Eq,
                Expr::qualified("T", "a"),
                Expr::qualified("U", "a"),
            ),
            Ra::cross(Ra::table("T"), Ra::table("U")),
        );
        assert_eq!(
            ra.to_string(),
            "Sigma(Eq(T.a, U.a), Cross(Table(T), Table(U)))"
        );
    }
}
