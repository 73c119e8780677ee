//! Typed AST nodes for INSERT and DELETE statements.

use crate::ast::{typed_syntax_node, AstNode, WhereClause};
use crate::syntax::{SyntaxKind, SyntaxToken};

typed_syntax_node!(InsertStmt, ColumnNameList, ValueList, Value, DeleteStmt);

impl InsertStmt {
    pub fn table_name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    /// The explicit target-column list, when one was written.
    pub fn column_names(&self) -> Option<Vec<String>> {
        self.syntax
            .children()
            .find_map(ColumnNameList::cast)
            .map(|list| crate::ast::ident_texts(&list.syntax))
    }

    pub fn values(&self) -> Vec<Value> {
        self.syntax
            .children()
            .find_map(ValueList::cast)
            .map(|list| list.syntax.children().filter_map(Value::cast).collect())
            .unwrap_or_default()
    }
}

impl Value {
    /// True when the literal is preceded by a unary minus.
    pub fn is_negated(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|token| token.kind() == SyntaxKind::Minus)
    }

    pub fn literal_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| {
                matches!(
                    token.kind(),
                    SyntaxKind::Integer
                        | SyntaxKind::Double
                        | SyntaxKind::QuotedLiteral
                        | SyntaxKind::Keyword
                )
            })
    }
}

impl DeleteStmt {
    pub fn table_name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.syntax.children().find_map(WhereClause::cast)
    }
}
