//! A SQL compiler front-end.
//!
//! SQL text is tokenized ([`lexer`]), parsed into a lossless syntax tree
//! (`parser` + `grammar`), lowered into owned IR trees ([`ir`]) and, for
//! queries, desugared against an injected schema oracle into a minimal
//! relational algebra:
//!
//! ```text
//! text -> tokens -> syntax tree -> (SRA | DDL/DML) -> desugar + schema -> RA
//! ```
//!
//! Parsing is schema-independent; the desugarer is the only component that
//! consults a [`SchemaOracle`].
//!
//! ```
//! use sqlfront::{desugar, lower_program, parse, Statement, StaticCatalog};
//! use sqlfront::ast::{AstNode, Root};
//!
//! let parsed = parse("SELECT *, x+y AS z FROM t;");
//! assert!(parsed.ok());
//!
//! let root = Root::cast(parsed.syntax()).unwrap();
//! let statement = lower_program(&root).remove(0).unwrap();
//!
//! let catalog = StaticCatalog::new().with_table("t", ["w", "x", "y"]);
//! let Statement::Query(query) = &statement else { unreachable!() };
//! let algebra = desugar(query, &catalog).unwrap();
//! assert_eq!(
//!     algebra.to_string(),
//!     "Pi([w, x, y, z], Rho(Add(x, y), z, Pi([w, x, y, Add(x, y)], Table(t))))",
//! );
//! ```

pub mod ast;
mod catalog;
mod desugar;
mod grammar;
pub mod ir;
mod lexer;
mod lower;
mod parser;
mod render;
mod syntax;
mod util;

pub use catalog::{SchemaOracle, StaticCatalog};
pub use desugar::{desugar, DesugarError};
pub use ir::{
    AggregateFunc, BinaryOp, ColumnConstraint, ColumnDef, ColumnRef, CreateTable, Datatype,
    Delete, Expr, Insert, JoinCondition, JoinKind, Literal, OuterJoinKind, ProjectItem, Ra,
    SetOpKind, SortDirection, Sra, Statement, TableKey, UnaryOp,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use lower::{lower_program, lower_statement, LowerError};
pub use parser::{Parse, SyntaxError};
pub use render::{query_to_sql, statement_to_sql};
pub use syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use util::LineIndex;

/// Parses an input into a lossless syntax tree with diagnostics. Errors
/// never abort the whole input; parsing resumes at the next statement
/// boundary.
pub fn parse(input: &str) -> Parse {
    tracing::debug!(len = input.len(), "parsing input");
    let mut parser = parser::Parser::new(input);
    grammar::parse_program(&mut parser);
    parser.build()
}
