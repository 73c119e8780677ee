//! Typed AST nodes for CREATE TABLE statements.

use crate::ast::{typed_syntax_node, AstNode};
use crate::syntax::{SyntaxElement, SyntaxKind};

typed_syntax_node!(CreateTableStmt, ColumnList, ColumnDef, Datatype, ColumnConstraint, TableKey);

impl CreateTableStmt {
    pub fn table_name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    pub fn column_defs(&self) -> Vec<ColumnDef> {
        self.syntax
            .children()
            .find_map(ColumnList::cast)
            .map(|list| list.syntax.children().filter_map(ColumnDef::cast).collect())
            .unwrap_or_default()
    }

    pub fn table_keys(&self) -> Vec<TableKey> {
        self.syntax
            .children()
            .find_map(ColumnList::cast)
            .map(|list| list.syntax.children().filter_map(TableKey::cast).collect())
            .unwrap_or_default()
    }
}

impl ColumnDef {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    pub fn datatype(&self) -> Option<Datatype> {
        self.syntax.children().find_map(Datatype::cast)
    }

    pub fn constraints(&self) -> impl Iterator<Item = ColumnConstraint> {
        self.syntax.children().filter_map(ColumnConstraint::cast)
    }
}

impl Datatype {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    pub fn size(&self) -> Option<u32> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Integer)
            .and_then(|token| token.text().parse().ok())
    }
}

impl ColumnConstraint {
    /// The lowercased keywords of this constraint, e.g. `["not", "null"]`
    /// or `["foreign", "key", "references"]`.
    pub fn keywords(&self) -> Vec<String> {
        crate::ast::keyword_texts(&self.syntax)
    }

    /// The identifier tokens of the constraint: the referenced table and
    /// optionally its column for the key constraints.
    pub fn idents(&self) -> Vec<String> {
        crate::ast::ident_texts(&self.syntax)
    }

    /// The literal of a DEFAULT constraint.
    pub fn value(&self) -> Option<crate::ast::Value> {
        self.syntax.children().find_map(crate::ast::Value::cast)
    }

    /// The expression of a CHECK constraint.
    pub fn check_expression(&self) -> Option<SyntaxElement> {
        crate::ast::expression_element(&self.syntax)
    }
}

impl TableKey {
    pub fn keywords(&self) -> Vec<String> {
        crate::ast::keyword_texts(&self.syntax)
    }

    /// All identifier tokens of the declaration in source order, paired
    /// with whether they appear after the `REFERENCES` keyword.
    pub fn idents_with_reference_flag(&self) -> Vec<(String, bool)> {
        let mut after_references = false;
        let mut idents = Vec::new();

        for element in self.syntax.children_with_tokens() {
            let Some(token) = element.into_token() else {
                continue;
            };
            if token.kind() == SyntaxKind::Keyword
                && token.text().eq_ignore_ascii_case("references")
            {
                after_references = true;
            }
            if token.kind() == SyntaxKind::Ident {
                idents.push((token.text().to_string(), after_references));
            }
        }

        idents
    }
}
