//! Non-query statements and the top-level statement sum.

use std::fmt;

use crate::ir::{comma, Expr, Literal, Sra};

/// One parsed statement. A program is an ordered list of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Sra),
    CreateTable(CreateTable),
    Insert(Insert),
    Delete(Delete),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => write!(f, "{query}"),
            Self::CreateTable(stmt) => write!(f, "{stmt}"),
            Self::Insert(stmt) => write!(f, "{stmt}"),
            Self::Delete(stmt) => write!(f, "{stmt}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    /// Column declarations in source order.
    pub columns: Vec<ColumnDef>,
    /// Table-level key declarations, kept apart from per-column ones.
    pub keys: Vec<TableKey>,
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CreateTable({}, [{}]", self.name, comma(&self.columns))?;
        if !self.keys.is_empty() {
            write!(f, ", keys=[{}]", comma(&self.keys))?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub datatype: Datatype,
    /// Per-column constraints in source order.
    pub constraints: Vec<ColumnConstraint>,
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({}, {}", self.name, self.datatype)?;
        if !self.constraints.is_empty() {
            write!(f, ", [{}]", comma(&self.constraints))?;
        }
        write!(f, ")")
    }
}

/// A column datatype: a normalized (lowercase) type name plus an optional
/// size argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    pub name: String,
    pub size: Option<u32>,
}

impl Datatype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(f, "{}({size})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    NotNull,
    Unique,
    PrimaryKey,
    ForeignKey {
        table: String,
        column: Option<String>,
    },
    Default(Literal),
    AutoIncrement,
    Check(Expr),
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNull => write!(f, "NotNull"),
            Self::Unique => write!(f, "Unique"),
            Self::PrimaryKey => write!(f, "PrimaryKey"),
            Self::ForeignKey {
                table,
                column: None,
            } => write!(f, "ForeignKey({table})"),
            Self::ForeignKey {
                table,
                column: Some(column),
            } => write!(f, "ForeignKey({table}.{column})"),
            Self::Default(literal) => write!(f, "Default({literal})"),
            Self::AutoIncrement => write!(f, "AutoIncrement"),
            Self::Check(expr) => write!(f, "Check({expr})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableKey {
    Primary(Vec<String>),
    Unique(Vec<String>),
    Foreign {
        columns: Vec<String>,
        table: String,
        references: Vec<String>,
    },
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(columns) => write!(f, "PrimaryKey({})", columns.join(", ")),
            Self::Unique(columns) => write!(f, "Unique({})", columns.join(", ")),
            Self::Foreign {
                columns,
                table,
                references,
            } => {
                write!(f, "ForeignKey([{}], {table}", columns.join(", "))?;
                if !references.is_empty() {
                    write!(f, ", [{}]", references.join(", "))?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    /// The optional explicit target-column list. When absent, the table's
    /// declared column order applies at execution time; the front-end does
    /// not resolve this.
    pub columns: Option<Vec<String>>,
    pub values: Vec<Literal>,
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Insert({}", self.table)?;
        if let Some(columns) = &self.columns {
            write!(f, ", [{}]", columns.join(", "))?;
        }
        write!(f, ", [{}])", comma(&self.values))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    /// Absent predicate means delete all rows.
    pub predicate: Option<Expr>,
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            Some(predicate) => write!(f, "Delete({}, {predicate})", self.table),
            None => write!(f, "Delete({})", self.table),
        }
    }
}
