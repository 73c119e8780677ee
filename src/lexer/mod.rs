//! Implements a lexer based on the [`logos`] crate.

mod token;

use std::ops;

use logos::Logos;
use rowan::{TextRange, TextSize};

pub use token::TokenKind;

/// Wrapper for the actual [`logos`] lexer.
#[derive(Debug)]
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer from an input.
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Unmatched input becomes an `Error` token so the parser can report
        // it as a lexical diagnostic instead of silently dropping text.
        let kind = match self.inner.next()? {
            Ok(kind) => kind,
            Err(()) => TokenKind::Error,
        };
        let text = self.inner.slice();

        let range = {
            let ops::Range { start, end } = self.inner.span();
            let start = TextSize::try_from(start).unwrap();
            let end = TextSize::try_from(end).unwrap();

            TextRange::new(start, end)
        };

        Some(Self::Item { kind, text, range })
    }
}

/// Represents a single token in the token stream.
#[derive(Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_statement_token_stream() {
        let kinds: Vec<TokenKind> = Lexer::new("SELECT a FROM t;").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::SelectKw,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::FromKw,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::SemiColon,
            ]
        );
    }

    #[test]
    fn token_ranges_cover_input() {
        let input = "a = 1";
        let tokens: Vec<_> = Lexer::new(input).collect();
        assert_eq!(tokens.first().unwrap().range.start(), TextSize::from(0));
        assert_eq!(
            tokens.last().unwrap().range.end(),
            TextSize::of(input)
        );
    }
}
