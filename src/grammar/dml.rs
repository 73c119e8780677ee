//! Implements parsing of INSERT and DELETE statements.

use super::query::parse_where_clause;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn parse_insert(p: &mut Parser) {
    p.start(SyntaxKind::InsertStmt);
    p.expect(TokenKind::InsertKw);
    p.expect(TokenKind::IntoKw);
    p.expect(TokenKind::Ident);

    if p.at(TokenKind::LParen) {
        p.start(SyntaxKind::ColumnNameList);
        p.bump(TokenKind::LParen);
        super::parse_ident_list(p);
        p.expect(TokenKind::RParen);
        p.finish();
    }

    p.expect(TokenKind::ValuesKw);
    p.start(SyntaxKind::ValueList);
    p.expect(TokenKind::LParen);
    super::parse_value(p);
    while p.eat(TokenKind::Comma) {
        super::parse_value(p);
    }
    p.expect(TokenKind::RParen);
    p.finish();

    p.eat(TokenKind::SemiColon);
    p.finish();
}

pub(crate) fn parse_delete(p: &mut Parser) {
    p.start(SyntaxKind::DeleteStmt);
    p.expect(TokenKind::DeleteKw);
    p.expect(TokenKind::FromKw);
    p.expect(TokenKind::Ident);

    if p.at(TokenKind::WhereKw) {
        parse_where_clause(p);
    }

    p.eat(TokenKind::SemiColon);
    p.finish();
}
