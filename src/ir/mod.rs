//! The owned intermediate representation produced by lowering.
//!
//! Three tree families share the expression sub-language: the sugared
//! algebra ([`Sra`]) mirroring SQL surface forms, the minimal algebra
//! ([`Ra`]) that desugaring targets, and the non-query statements.
//!
//! All trees are immutable after construction; rewrites build new trees.
//! `Display` is the canonical observable: deterministic, fully
//! parenthesized, injective up to formatting.

mod expr;
mod ra;
mod sra;
mod stmt;

pub use expr::{AggregateFunc, BinaryOp, ColumnRef, Expr, Literal, UnaryOp};
pub use ra::{OuterJoinKind, Ra};
pub use sra::{JoinCondition, JoinKind, ProjectItem, SetOpKind, SortDirection, Sra};
pub use stmt::{
    ColumnConstraint, ColumnDef, CreateTable, Datatype, Delete, Insert, Statement, TableKey,
};

/// Formats a slice of displayable items as a comma-separated list.
pub(crate) fn comma<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
