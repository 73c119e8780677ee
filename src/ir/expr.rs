//! The expression sub-language shared by queries and non-query statements.

use std::collections::HashMap;
use std::fmt;

use crate::ir::{Ra, Sra};

/// A SQL expression.
///
/// Expressions form a tree; every node exclusively owns its children.
/// Structural equality is derived: two literals of different numeric kinds
/// are never equal, even for the same value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Column(ColumnRef),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    /// `expr IN (subquery)` with the subquery still in sugared form.
    InQuery(Box<Expr>, Box<Sra>),
    /// `expr IN (subquery)` after the subquery has been lowered.
    InRelation(Box<Expr>, Box<Ra>),
    Aggregate {
        func: AggregateFunc,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(literal: Literal) -> Self {
        Self::Literal(literal)
    }

    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }

    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(name))
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::new(name).with_qualifier(qualifier))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Self::Unary {
            op,
            expr: Box::new(expr),
        }
    }

    pub fn aggregate(func: AggregateFunc, arg: Expr) -> Self {
        Self::Aggregate {
            func,
            arg: Box::new(arg),
        }
    }

    /// Returns true if any [`Expr::Aggregate`] occurs in this tree.
    /// Subqueries are their own scope and are not searched.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Self::Aggregate { .. } => true,
            Self::Literal(_) | Self::Column(_) => false,
            Self::Binary { lhs, rhs, .. } => lhs.contains_aggregate() || rhs.contains_aggregate(),
            Self::Unary { expr, .. } => expr.contains_aggregate(),
            Self::InQuery(expr, _) | Self::InRelation(expr, _) => expr.contains_aggregate(),
        }
    }

    /// Returns true if a wildcard column reference occurs outside of an
    /// aggregate argument. Such references are only meaningful in a
    /// projection position.
    pub fn has_stray_wildcard(&self) -> bool {
        match self {
            Self::Column(column) => column.is_wildcard(),
            Self::Literal(_) => false,
            Self::Binary { lhs, rhs, .. } => lhs.has_stray_wildcard() || rhs.has_stray_wildcard(),
            Self::Unary { expr, .. } => expr.has_stray_wildcard(),
            Self::InQuery(expr, _) | Self::InRelation(expr, _) => expr.has_stray_wildcard(),
            // `count(*)` is legal; the wildcard belongs to the aggregate.
            Self::Aggregate { .. } => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Column(column) => write!(f, "{column}"),
            Self::Binary { op, lhs, rhs } => write!(f, "{}({lhs}, {rhs})", op.name()),
            Self::Unary { op, expr } => write!(f, "{}({expr})", op.name()),
            Self::InQuery(expr, query) => write!(f, "In({expr}, {query})"),
            Self::InRelation(expr, relation) => write!(f, "In({expr}, {relation})"),
            Self::Aggregate { func, arg } => write!(f, "{}({arg})", func.name()),
        }
    }
}

/// A possibly qualified column reference. The wildcard marker `*` is
/// represented as a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn wildcard() -> Self {
        Self::new(Self::WILDCARD)
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == Self::WILDCARD
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{qualifier}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A literal value. The numeric kind is part of the identity: `1` and `1.0`
/// are different literals.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Double(f64),
    Str(String),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            // `{:?}` keeps the decimal point so a double never prints like
            // an integer.
            Self::Double(value) => write!(f, "{value:?}"),
            Self::Str(value) => write!(f, "'{value}'"),
            Self::Null => write!(f, "NULL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,
    And,
    Or,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Eq => "Eq",
            Self::Neq => "Neq",
            Self::Lt => "Lt",
            Self::Gt => "Gt",
            Self::Leq => "Leq",
            Self::Geq => "Geq",
            Self::And => "And",
            Self::Or => "Or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Neg => "Neg",
            Self::Not => "Not",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

lazy_static::lazy_static! {
    static ref AGGREGATE_FUNCS: HashMap<&'static str, AggregateFunc> = HashMap::from([
        ("count", AggregateFunc::Count),
        ("sum", AggregateFunc::Sum),
        ("avg", AggregateFunc::Avg),
        ("min", AggregateFunc::Min),
        ("max", AggregateFunc::Max),
    ]);
}

impl AggregateFunc {
    /// Looks up an aggregate by its (case-insensitive) SQL name.
    pub fn from_name(name: &str) -> Option<Self> {
        AGGREGATE_FUNCS.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::Sum => "Sum",
            Self::Avg => "Avg",
            Self::Min => "Min",
            Self::Max => "Max",
        }
    }
}
