//! Implements the event-based parser driving a [`rowan`] green tree.
//!
//! The grammar modules push node boundaries and tokens through this type;
//! trivia (whitespace, comments) is attached lazily so that it never starts
//! a node. Syntax errors do not abort parsing: the grammar records them and
//! resynchronizes at the next statement boundary.

use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

use crate::lexer::{Lexer, Token, TokenKind};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// A syntax or lexical diagnostic, located by byte range into the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

/// Statement-start keywords used to resynchronize after an error.
const STMT_START: [TokenKind; 4] = [
    TokenKind::SelectKw,
    TokenKind::CreateKw,
    TokenKind::InsertKw,
    TokenKind::DeleteKw,
];

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    input_len: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::Root.into());

        Self {
            tokens: Lexer::new(input).collect(),
            pos: 0,
            input_len: TextSize::of(input),
            builder,
            errors: Vec::new(),
        }
    }

    /// Returns the kind of the current (non-trivia) token without consuming
    /// anything.
    pub(crate) fn current(&self) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Returns the range of the current token, or an empty range at the end
    /// of the input.
    pub(crate) fn current_range(&self) -> TextRange {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map_or(TextRange::empty(self.input_len), |t| t.range)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    /// Consumes the current token, asserting it is of the passed kind.
    pub(crate) fn bump(&mut self, kind: TokenKind) {
        assert!(self.at(kind), "bump: expected {kind}, at {}", self.current());
        self.eat_trivia();
        self.push_token();
    }

    /// Consumes the current token, whatever it is. Does nothing at the end
    /// of the input.
    pub(crate) fn bump_any(&mut self) {
        if self.current() == TokenKind::Eof {
            return;
        }
        self.eat_trivia();
        self.push_token();
    }

    /// Consumes the current token if it is of the passed kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump(kind);
        true
    }

    /// Consumes the current token if it matches, records a syntax error with
    /// an expected-token hint otherwise.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {kind}, found {}", self.current()));
        false
    }

    /// Records a syntax error at the current position.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SyntaxError {
            message: message.into(),
            range: self.current_range(),
        });
    }

    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Starts a new node in the syntax tree. Pending trivia is attached to
    /// the enclosing node first, so nodes always begin at a real token.
    pub(crate) fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    /// Records a position the tree can later be wrapped from, see
    /// [`Parser::start_node_at`].
    pub(crate) fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    /// Retroactively wraps everything produced since `checkpoint` into a new
    /// node of the passed kind.
    pub(crate) fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    /// Finishes the current node.
    pub(crate) fn finish(&mut self) {
        self.builder.finish_node();
    }

    /// Skips ahead to the next statement boundary, wrapping everything
    /// skipped into an [`SyntaxKind::Error`] node. A `;` boundary is
    /// consumed; a statement-start keyword is left for the next statement.
    pub(crate) fn recover_stmt(&mut self) {
        let mut open = false;
        while !self.at(TokenKind::Eof)
            && !self.at(TokenKind::SemiColon)
            && !STMT_START.contains(&self.current())
        {
            if !open {
                self.start(SyntaxKind::Error);
                open = true;
            }
            self.bump_any();
        }
        if open {
            self.finish();
        }
        if self.at(TokenKind::SemiColon) {
            self.bump(TokenKind::SemiColon);
        }
    }

    /// Finishes parsing and hands back the green tree with all diagnostics.
    pub(crate) fn build(mut self) -> Parse {
        // Attach any remaining tokens (normally just trailing trivia) to the
        // root so the tree always covers the full input.
        while self.pos < self.tokens.len() {
            self.push_token();
        }
        self.builder.finish_node();

        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn eat_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.push_token();
        }
    }

    fn push_token(&mut self) {
        let token = &self.tokens[self.pos];
        if token.kind == TokenKind::Error {
            self.errors.push(SyntaxError {
                message: format!("unrecognized input `{}`", token.text),
                range: token.range,
            });
        }
        self.builder
            .token(SyntaxKind::from(token.kind).into(), token.text);
        self.pos += 1;
    }
}

/// The result of parsing: a lossless syntax tree plus all diagnostics
/// collected on the way.
#[derive(Debug)]
pub struct Parse {
    green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Returns a formatted dump of the syntax tree, mainly for tests.
    pub fn tree(&self) -> String {
        format!("{:#?}", self.syntax())
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_builds_empty_root() {
        let parse = Parser::new("").build();
        assert!(parse.ok());
        assert_eq!(parse.tree(), "Root@0..0\n");
    }

    #[test]
    fn trailing_trivia_attaches_to_root() {
        let parse = Parser::new("  -- nothing here\n").build();
        assert!(parse.ok());
        assert_eq!(parse.syntax().text().len(), TextSize::from(18));
    }

    #[test]
    fn unknown_characters_are_reported() {
        let mut parser = Parser::new("?");
        parser.bump_any();
        let parse = parser.build();
        assert_eq!(parse.errors.len(), 1);
        assert!(parse.errors[0].message.contains("unrecognized"));
    }
}
