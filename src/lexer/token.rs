//! Token definition for the [`logos`] lexer.

use std::fmt;

/// Used to tokenize the input text.
///
/// Keywords are matched case-insensitively; identifiers keep their original
/// spelling and compare case-sensitively downstream.
#[derive(logos::Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    #[regex("[ \t\n\r]+")]
    Whitespace,

    #[regex("--[^\n]*")]
    Comment,

    #[token("select", ignore(case))]
    SelectKw,

    #[token("distinct", ignore(case))]
    DistinctKw,

    #[token("from", ignore(case))]
    FromKw,

    #[token("where", ignore(case))]
    WhereKw,

    #[token("as", ignore(case))]
    AsKw,

    #[token("join", ignore(case))]
    JoinKw,

    #[token("inner", ignore(case))]
    InnerKw,

    #[token("cross", ignore(case))]
    CrossKw,

    #[token("natural", ignore(case))]
    NaturalKw,

    #[token("left", ignore(case))]
    LeftKw,

    #[token("right", ignore(case))]
    RightKw,

    #[token("full", ignore(case))]
    FullKw,

    #[token("outer", ignore(case))]
    OuterKw,

    #[token("on", ignore(case))]
    OnKw,

    #[token("using", ignore(case))]
    UsingKw,

    #[token("order", ignore(case))]
    OrderKw,

    #[token("group", ignore(case))]
    GroupKw,

    #[token("by", ignore(case))]
    ByKw,

    #[token("asc", ignore(case))]
    AscKw,

    #[token("desc", ignore(case))]
    DescKw,

    #[token("having", ignore(case))]
    HavingKw,

    #[token("limit", ignore(case))]
    LimitKw,

    #[token("union", ignore(case))]
    UnionKw,

    #[token("intersect", ignore(case))]
    IntersectKw,

    #[token("except", ignore(case))]
    ExceptKw,

    #[token("and", ignore(case))]
    AndKw,

    #[token("or", ignore(case))]
    OrKw,

    #[token("not", ignore(case))]
    NotKw,

    #[token("in", ignore(case))]
    InKw,

    #[token("create", ignore(case))]
    CreateKw,

    #[token("table", ignore(case))]
    TableKw,

    #[token("primary", ignore(case))]
    PrimaryKw,

    #[token("foreign", ignore(case))]
    ForeignKw,

    #[token("key", ignore(case))]
    KeyKw,

    #[token("references", ignore(case))]
    ReferencesKw,

    #[token("unique", ignore(case))]
    UniqueKw,

    #[token("null", ignore(case))]
    NullKw,

    #[token("default", ignore(case))]
    DefaultKw,

    #[token("auto", ignore(case))]
    AutoKw,

    #[token("increment", ignore(case))]
    IncrementKw,

    #[token("check", ignore(case))]
    CheckKw,

    #[token("insert", ignore(case))]
    InsertKw,

    #[token("into", ignore(case))]
    IntoKw,

    #[token("values", ignore(case))]
    ValuesKw,

    #[token("delete", ignore(case))]
    DeleteKw,

    #[regex(r"\d+", priority = 2)]
    Integer,

    #[regex(r"\d+\.\d*|\.\d+", priority = 2)]
    Double,

    #[regex(r"(?i)[a-z_][a-z0-9_]*", priority = 1)]
    Ident,

    #[regex("'[^']*'")]
    QuotedLiteral,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    SemiColon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("*")]
    Asterisk,

    #[token("/")]
    Slash,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("=")]
    Equals,

    #[regex("<>|!=|<=|>=|<|>")]
    ComparisonOp,

    /// Produced for input the lexer cannot match, never by a pattern.
    Error,

    /// Marker token to indicate end of input, not used by the lexer directly.
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn check(input: &str, kind: TokenKind) {
        let mut lexer = Lexer::new(input);
        let token = lexer.next().unwrap();
        assert_eq!(token.kind, kind);
        assert_eq!(token.text, input);
    }

    #[test]
    fn lex_spaces_and_newlines() {
        check("  \n", TokenKind::Whitespace);
    }

    #[test]
    fn lex_comment() {
        check("-- hello", TokenKind::Comment);
    }

    #[test]
    fn lex_keyword_any_case() {
        check("SELECT", TokenKind::SelectKw);
        check("select", TokenKind::SelectKw);
        check("SeLeCt", TokenKind::SelectKw);
    }

    #[test]
    fn lex_ident() {
        check("hello", TokenKind::Ident);
        check("_foo42", TokenKind::Ident);
    }

    #[test]
    fn lex_keyword_prefix_is_ident() {
        check("selected", TokenKind::Ident);
        check("inner_circle", TokenKind::Ident);
    }

    #[test]
    fn lex_numbers() {
        check("42", TokenKind::Integer);
        check("3.25", TokenKind::Double);
        check(".5", TokenKind::Double);
    }

    #[test]
    fn lex_string() {
        check("'hi there'", TokenKind::QuotedLiteral);
    }

    #[test]
    fn lex_comparison() {
        check("<>", TokenKind::ComparisonOp);
        check("!=", TokenKind::ComparisonOp);
        check("<=", TokenKind::ComparisonOp);
        check("=", TokenKind::Equals);
    }

    #[test]
    fn lex_unknown_char() {
        let mut lexer = Lexer::new("?");
        let token = lexer.next().unwrap();
        assert_eq!(token.kind, TokenKind::Error);
    }
}
