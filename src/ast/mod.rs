//! Implements a typed AST over the syntax tree.
//!
//! The typed wrappers are thin views used by the lowering step; they borrow
//! the green tree and expose the handful of accessors lowering needs.

mod dml;
mod query;
mod table;

use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use dml::*;
pub use query::*;
pub use rowan::ast::AstNode;
pub use table::*;

macro_rules! typed_syntax {
    ($synty:ty, $astty:ty, $name:ident $(; { $( $additional:item )+ } )? ) => {
        #[derive(Debug, Clone, Eq, PartialEq)]
        pub struct $name {
            pub(crate) syntax: $synty,
        }

        impl $astty for $name {
            $( $( $additional )+ )?

            fn can_cast(kind: crate::syntax::SyntaxKind) -> bool {
                kind == crate::syntax::SyntaxKind::$name
            }

            fn cast(syntax: $synty) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &$synty {
                &self.syntax
            }
        }
    };
}

/// Automatically generates `struct`s and implementations of the [`AstNode`]
/// trait for [`SyntaxKind`] variants.
macro_rules! typed_syntax_node {
    ($( $name:ident ),+ $(,)?) => {
        $(
            crate::ast::typed_syntax!(crate::syntax::SyntaxNode, crate::ast::AstNode, $name; {
                type Language = crate::syntax::SqlLang;
            });
        )+
    };
}

/// Automatically generates `struct`s and implementations of the
/// [`AstToken`] trait for [`SyntaxKind`] variants.
macro_rules! typed_syntax_token {
    ($( $name:ident ),+ $(,)?) => {
        $( crate::ast::typed_syntax!(crate::syntax::SyntaxToken, crate::ast::AstToken, $name); )+
    };
}

pub(crate) use {typed_syntax, typed_syntax_node, typed_syntax_token};

/// Represents an interface for typed AST tokens, akin to [`AstNode`].
pub trait AstToken {
    /// Returns whether the passed [`SyntaxKind`] can be cast to this type
    /// of token or not.
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    /// Tries to cast the passed (generic) token to a typed token. Might
    /// fail if the syntax kind is not compatible.
    fn cast(token: SyntaxToken) -> Option<Self>
    where
        Self: Sized;

    /// Returns the [`SyntaxToken`] for this typed token.
    fn syntax(&self) -> &SyntaxToken;

    /// Returns the original representation of the token.
    fn text(&self) -> &str {
        self.syntax().text()
    }
}

typed_syntax_node!(Root, Alias);
typed_syntax_token!(Ident);

impl Root {
    /// Returns the top-level statement nodes in source order.
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax.children().filter(|node| {
            matches!(
                node.kind(),
                SyntaxKind::QueryStmt
                    | SyntaxKind::CreateTableStmt
                    | SyntaxKind::InsertStmt
                    | SyntaxKind::DeleteStmt
                    | SyntaxKind::Error
            )
        })
    }
}

impl Ident {
    /// Returns the identifier name itself.
    pub fn name(&self) -> String {
        self.syntax.text().to_string()
    }
}

impl Alias {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find_map(Ident::cast)
            .map(|ident| ident.name())
    }
}

/// Returns the direct non-trivia children elements of a node.
pub(crate) fn non_trivia_elements(node: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> {
    node.children_with_tokens()
        .filter(|element| !element.kind().is_trivia())
}

/// Returns the lowercased texts of the direct keyword token children.
pub(crate) fn keyword_texts(node: &SyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Keyword)
        .map(|token| token.text().to_lowercase())
        .collect()
}

/// Returns the texts of the direct identifier token children.
pub(crate) fn ident_texts(node: &SyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Ident)
        .map(|token| token.text().to_string())
        .collect()
}

/// Finds the single expression element of a clause node: direct children
/// minus trivia, clause keywords, aliases and grouping parentheses.
pub(crate) fn expression_element(node: &SyntaxNode) -> Option<SyntaxElement> {
    let mut elements = non_trivia_elements(node).filter(|element| {
        match element.kind() {
            SyntaxKind::LParen | SyntaxKind::RParen | SyntaxKind::Alias => false,
            // Clause keywords are syntax, not operands; `NULL` is the one
            // keyword that is itself an expression atom.
            SyntaxKind::Keyword => element
                .as_token()
                .is_some_and(|token| token.text().eq_ignore_ascii_case("null")),
            _ => true,
        }
    });
    let first = elements.next();
    // More than one candidate means the clause is malformed; the caller
    // treats `None` as an internal error.
    match elements.next() {
        Some(_) => None,
        None => first,
    }
}
