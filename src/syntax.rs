//! Implements a syntax-level representation of the input.

use crate::lexer::TokenKind;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

/// Represents all possible kinds of syntax items the parser can process.
///
/// Examples
/// * <https://blog.kiranshila.com/blog/easy_cst.md>
/// * <https://arzg.github.io/lang/10/>
/// * <https://github.com/rust-analyzer/rowan/blob/master/examples/s_expressions.rs>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, FromPrimitive, ToPrimitive)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Left paren
    LParen,
    /// Right paren
    RParen,
    /// A plus `+`
    Plus,
    /// A minus `-`
    Minus,
    /// An asterisk `*`
    Asterisk,
    /// Slash char `/`
    Slash,
    /// Inline comment starting with `--`
    Comment,
    /// Any whitespace character
    Whitespace,
    /// A SQL keyword, e.g. "SELECT"
    Keyword,
    /// An identifier, e.g. a table or column name
    Ident,
    /// A single dot
    Dot,
    /// A single comma
    Comma,
    /// A semi colon
    SemiColon,
    /// Any unsigned integer
    Integer,
    /// A floating point number
    Double,
    /// A single quoted literal
    QuotedLiteral,
    /// Represents a SQL comparison operator (=, <>, !=, <, >, <=, >=)
    ComparisonOp,
    /// An identifier qualified by a dot, e.g. `t.a` or `t.*`
    QualifiedIdent,
    /// Holds a generic SQL logic/arithmetic expression
    Expression,
    /// An invocation of an aggregate or function, identifier through closing paren
    FunctionInvocation,
    /// A parenthesized query used as the right operand of `IN`
    SubqueryExpr,
    /// An alias introduced with `AS` or by juxtaposition
    Alias,
    /// A full query: one or more SELECT bodies combined by set operators
    QueryStmt,
    /// A single SELECT body
    SelectStmt,
    /// The projection list of a SELECT
    SelectClause,
    /// A single item of the projection list
    SelectItem,
    /// The FROM clause with its join chain
    FromClause,
    /// A base table reference, optionally aliased
    TableRef,
    /// One join step: keywords, right table, and condition
    JoinClause,
    /// An `ON <expr>` join condition
    OnClause,
    /// A `USING (col, ...)` join condition
    UsingClause,
    /// Represents a complete `WHERE` clause expression
    WhereClause,
    /// A `GROUP BY` clause
    GroupByClause,
    /// A `HAVING` clause
    HavingClause,
    /// A `LIMIT` clause
    LimitClause,
    /// An `ORDER BY` clause
    OrderByClause,
    /// One ordering key with optional direction
    OrderItem,
    /// A node that marks a full INSERT statement
    InsertStmt,
    /// The parenthesized target-column list of an INSERT
    ColumnNameList,
    /// The parenthesized VALUES list of an INSERT
    ValueList,
    /// One literal value inside a VALUES list
    Value,
    /// A node that marks a full DELETE statement
    DeleteStmt,
    /// A node that marks a full CREATE TABLE statement
    CreateTableStmt,
    /// The parenthesized body of a CREATE TABLE
    ColumnList,
    /// A single column declaration
    ColumnDef,
    /// A column datatype with optional size
    Datatype,
    /// A single per-column constraint
    ColumnConstraint,
    /// A table-level key declaration
    TableKey,
    /// An error token or node with a cause
    Error,
    /// The root node element
    Root,
}

impl SyntaxKind {
    /// Returns true when the [`SyntaxKind`] is not syntactically important.
    pub(crate) fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind.to_u16().unwrap())
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Comment => SyntaxKind::Comment,
            TokenKind::SelectKw
            | TokenKind::DistinctKw
            | TokenKind::FromKw
            | TokenKind::WhereKw
            | TokenKind::AsKw
            | TokenKind::JoinKw
            | TokenKind::InnerKw
            | TokenKind::CrossKw
            | TokenKind::NaturalKw
            | TokenKind::LeftKw
            | TokenKind::RightKw
            | TokenKind::FullKw
            | TokenKind::OuterKw
            | TokenKind::OnKw
            | TokenKind::UsingKw
            | TokenKind::OrderKw
            | TokenKind::GroupKw
            | TokenKind::ByKw
            | TokenKind::AscKw
            | TokenKind::DescKw
            | TokenKind::HavingKw
            | TokenKind::LimitKw
            | TokenKind::UnionKw
            | TokenKind::IntersectKw
            | TokenKind::ExceptKw
            | TokenKind::AndKw
            | TokenKind::OrKw
            | TokenKind::NotKw
            | TokenKind::InKw
            | TokenKind::CreateKw
            | TokenKind::TableKw
            | TokenKind::PrimaryKw
            | TokenKind::ForeignKw
            | TokenKind::KeyKw
            | TokenKind::ReferencesKw
            | TokenKind::UniqueKw
            | TokenKind::NullKw
            | TokenKind::DefaultKw
            | TokenKind::AutoKw
            | TokenKind::IncrementKw
            | TokenKind::CheckKw
            | TokenKind::InsertKw
            | TokenKind::IntoKw
            | TokenKind::ValuesKw
            | TokenKind::DeleteKw => SyntaxKind::Keyword,
            TokenKind::Integer => SyntaxKind::Integer,
            TokenKind::Double => SyntaxKind::Double,
            TokenKind::Ident => SyntaxKind::Ident,
            TokenKind::QuotedLiteral => SyntaxKind::QuotedLiteral,
            TokenKind::Dot => SyntaxKind::Dot,
            TokenKind::Comma => SyntaxKind::Comma,
            TokenKind::SemiColon => SyntaxKind::SemiColon,
            TokenKind::LParen => SyntaxKind::LParen,
            TokenKind::RParen => SyntaxKind::RParen,
            TokenKind::Asterisk => SyntaxKind::Asterisk,
            TokenKind::Slash => SyntaxKind::Slash,
            TokenKind::Plus => SyntaxKind::Plus,
            TokenKind::Minus => SyntaxKind::Minus,
            TokenKind::Equals => SyntaxKind::ComparisonOp,
            TokenKind::ComparisonOp => SyntaxKind::ComparisonOp,
            TokenKind::Error => SyntaxKind::Error,
            TokenKind::Eof => unreachable!(),
        }
    }
}

/// Dummy type for our SQL language definition, for use with rowan.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum SqlLang {}

impl rowan::Language for SqlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        Self::Kind::from_u16(raw.0).unwrap()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.to_u16().unwrap())
    }
}

/// Typed [`SyntaxNode`] with our [`SqlLang`] language definition.
pub type SyntaxNode = rowan::SyntaxNode<SqlLang>;
/// Typed [`SyntaxToken`] with our [`SqlLang`] language definition.
pub type SyntaxToken = rowan::SyntaxToken<SqlLang>;
/// Typed [`SyntaxElement`] with our [`SqlLang`] language definition.
pub type SyntaxElement = rowan::SyntaxElement<SqlLang>;
