//! Recorded token streams with per-token resume states
//!
//! Every snapshot carries the composite state captured at its start, so any
//! token start is a valid point to restart lexing from.

use crate::tokens::token::TokenKind;
use crate::utils::Span;
use serde::Serialize;

/// One token as observed through the composite lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenSnapshot {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// Composite state at `start`
    pub state: u32,
}

impl TokenSnapshot {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Token text, or `None` if the snapshot does not fit `source`
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

/// Tokens covering one lexed range, in position order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenStream {
    tokens: Vec<TokenSnapshot>,
    range: Span,
    start_state: u32,
}

impl TokenStream {
    pub fn new(tokens: Vec<TokenSnapshot>, range: Span) -> Self {
        Self::with_start_state(tokens, range, 0)
    }

    /// Stream of a range whose lexing began in `start_state`
    pub fn with_start_state(tokens: Vec<TokenSnapshot>, range: Span, start_state: u32) -> Self {
        Self {
            tokens,
            range,
            start_state,
        }
    }

    pub fn tokens(&self) -> &[TokenSnapshot] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<TokenSnapshot> {
        self.tokens
    }

    pub fn range(&self) -> Span {
        self.range
    }

    /// State lexing of the range started in; kept even when the range
    /// produced no tokens
    pub fn start_state(&self) -> u32 {
        self.start_state
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TokenSnapshot> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenSnapshot> {
        self.tokens.iter()
    }

    /// Index of the token containing `offset`, or of the last token when
    /// `offset` is at or past the end of the range
    pub fn token_index_at(&self, offset: usize) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let index = self.tokens.partition_point(|token| token.start <= offset);
        Some(index.saturating_sub(1))
    }

    /// Token to restart from when the text at `offset` changes
    ///
    /// Backs off `context` tokens from the token containing `offset`, since a
    /// change at a token's first byte can also alter the token before it.
    pub fn restart_point(&self, offset: usize, context: usize) -> Option<&TokenSnapshot> {
        let index = self.token_index_at(offset)?;
        self.tokens.get(index.saturating_sub(context))
    }

    /// Token kinds only, convenient for assertions
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|token| token.kind).collect()
    }

    /// `(kind, text)` pairs for the tokens of `source`
    pub fn pairs<'a>(&self, source: &'a str) -> Vec<(TokenKind, &'a str)> {
        self.tokens
            .iter()
            .map(|token| (token.kind, token.text(source).unwrap_or("")))
            .collect()
    }

    /// Tokens are contiguous, non-empty and cover exactly the range
    pub fn is_flat(&self) -> bool {
        let mut cursor = self.range.start;
        for token in &self.tokens {
            if token.start != cursor || token.end <= token.start {
                return false;
            }
            cursor = token.end;
        }
        cursor == self.range.end
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a TokenSnapshot;
    type IntoIter = std::slice::Iter<'a, TokenSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
