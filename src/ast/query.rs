//! Typed AST nodes for queries.

use crate::ast::{typed_syntax_node, Alias, AstNode};
use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxToken};

typed_syntax_node!(
    QueryStmt,
    SelectStmt,
    SelectClause,
    SelectItem,
    FromClause,
    TableRef,
    JoinClause,
    OnClause,
    UsingClause,
    WhereClause,
    GroupByClause,
    HavingClause,
    LimitClause,
    OrderByClause,
    OrderItem,
    SubqueryExpr,
);

impl QueryStmt {
    /// The SELECT bodies in source order. More than one means they are
    /// combined by the set-operator tokens between them, left-associative.
    pub fn select_bodies(&self) -> impl Iterator<Item = SelectStmt> {
        self.syntax.children().filter_map(SelectStmt::cast)
    }

    /// The set-operator keyword tokens between the SELECT bodies.
    pub fn set_op_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|token| {
                token.kind() == SyntaxKind::Keyword
                    && matches!(
                        token.text().to_lowercase().as_str(),
                        "union" | "intersect" | "except"
                    )
            })
    }
}

impl SelectStmt {
    pub fn is_distinct(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|token| {
                token.kind() == SyntaxKind::Keyword
                    && token.text().eq_ignore_ascii_case("distinct")
            })
    }

    pub fn select_clause(&self) -> Option<SelectClause> {
        self.syntax.children().find_map(SelectClause::cast)
    }

    pub fn from_clause(&self) -> Option<FromClause> {
        self.syntax.children().find_map(FromClause::cast)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.syntax.children().find_map(WhereClause::cast)
    }

    pub fn group_by_clause(&self) -> Option<GroupByClause> {
        self.syntax.children().find_map(GroupByClause::cast)
    }

    pub fn having_clause(&self) -> Option<HavingClause> {
        self.syntax.children().find_map(HavingClause::cast)
    }

    pub fn order_by_clause(&self) -> Option<OrderByClause> {
        self.syntax.children().find_map(OrderByClause::cast)
    }

    pub fn limit_clause(&self) -> Option<LimitClause> {
        self.syntax.children().find_map(LimitClause::cast)
    }
}

impl SelectClause {
    pub fn items(&self) -> impl Iterator<Item = SelectItem> {
        self.syntax.children().filter_map(SelectItem::cast)
    }
}

impl SelectItem {
    /// True for the bare `*` item.
    pub fn is_wildcard(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|token| token.kind() == SyntaxKind::Asterisk)
    }

    pub fn alias(&self) -> Option<String> {
        self.syntax
            .children()
            .find_map(Alias::cast)
            .and_then(|alias| alias.name())
    }

    pub fn expression(&self) -> Option<SyntaxElement> {
        crate::ast::expression_element(&self.syntax)
    }
}

impl FromClause {
    /// The raw element sequence the lowering step folds left-associatively:
    /// a table reference followed by comma tokens, table references and
    /// join clauses.
    pub fn elements(&self) -> impl Iterator<Item = SyntaxElement> {
        crate::ast::non_trivia_elements(&self.syntax)
    }
}

impl TableRef {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Ident)
            .map(|token| token.text().to_string())
    }

    pub fn alias(&self) -> Option<String> {
        self.syntax
            .children()
            .find_map(Alias::cast)
            .and_then(|alias| alias.name())
    }
}

impl JoinClause {
    /// The lowercased join keywords preceding the right operand, e.g.
    /// `["left", "outer", "join"]`.
    pub fn keywords(&self) -> Vec<String> {
        crate::ast::keyword_texts(&self.syntax)
    }

    pub fn table_ref(&self) -> Option<TableRef> {
        self.syntax.children().find_map(TableRef::cast)
    }

    pub fn on_clause(&self) -> Option<OnClause> {
        self.syntax.children().find_map(OnClause::cast)
    }

    pub fn using_clause(&self) -> Option<UsingClause> {
        self.syntax.children().find_map(UsingClause::cast)
    }
}

impl OnClause {
    pub fn expression(&self) -> Option<SyntaxElement> {
        crate::ast::expression_element(&self.syntax)
    }
}

impl UsingClause {
    pub fn columns(&self) -> Vec<String> {
        crate::ast::ident_texts(&self.syntax)
    }
}

impl WhereClause {
    pub fn expression(&self) -> Option<SyntaxElement> {
        crate::ast::expression_element(&self.syntax)
    }
}

impl GroupByClause {
    /// The grouping expressions, one element per comma-separated entry.
    pub fn expressions(&self) -> Vec<SyntaxElement> {
        crate::ast::non_trivia_elements(&self.syntax)
            .filter(|element| {
                !matches!(
                    element.kind(),
                    SyntaxKind::Keyword
                        | SyntaxKind::Comma
                        | SyntaxKind::LParen
                        | SyntaxKind::RParen
                )
            })
            .collect()
    }
}

impl HavingClause {
    pub fn expression(&self) -> Option<SyntaxElement> {
        crate::ast::expression_element(&self.syntax)
    }
}

impl LimitClause {
    pub fn value(&self) -> Option<u64> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| token.kind() == SyntaxKind::Integer)
            .and_then(|token| token.text().parse().ok())
    }
}

impl OrderByClause {
    pub fn items(&self) -> impl Iterator<Item = OrderItem> {
        self.syntax.children().filter_map(OrderItem::cast)
    }
}

impl OrderItem {
    /// The ordering column: a plain identifier token or a qualified name
    /// node.
    pub fn column(&self) -> Option<SyntaxElement> {
        crate::ast::non_trivia_elements(&self.syntax)
            .find(|element| {
                matches!(
                    element.kind(),
                    SyntaxKind::Ident | SyntaxKind::QualifiedIdent
                )
            })
    }

    /// The lowercased explicit direction, when one was written.
    pub fn direction(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|token| {
                token.kind() == SyntaxKind::Keyword
                    && matches!(token.text().to_lowercase().as_str(), "asc" | "desc")
            })
            .map(|token| token.text().to_lowercase())
    }
}

impl SubqueryExpr {
    pub fn query(&self) -> Option<QueryStmt> {
        self.syntax.children().find_map(QueryStmt::cast)
    }
}
