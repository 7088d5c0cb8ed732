//! Lexer contracts shared by the host scanner, the secondary lexers and the
//! composite engine.
//!
//! Every lexer follows the same iterator-like shape: `start` positions it on
//! its first token, `advance` moves to the next one, and the getters describe
//! the current token. `token_type() == None` marks the end of the range.
//! `state()` is the resumable state captured at the *start* of the current
//! token; restarting at `token_start()` with it reproduces the same tokens.

pub mod chars;
pub mod rules;
pub mod state;

pub use rules::{RuleLexer, ScanRules, Scanned};
pub use state::{DecodedState, StateLayout};

use crate::embedding::EmbeddingContext;
use crate::tokens::TokenKind;
use std::sync::Arc;

/// Resumable lexer over a shared read-only buffer
pub trait Lexer: Send {
    /// Reset to scan `buffer[start..end]` from `state`
    fn start(&mut self, buffer: Arc<str>, start: usize, end: usize, state: u32);

    fn advance(&mut self);

    /// Current token kind, `None` once the range is exhausted
    fn token_type(&self) -> Option<TokenKind>;

    fn token_start(&self) -> usize;

    fn token_end(&self) -> usize;

    /// State at the start of the current token
    fn state(&self) -> u32;

    /// State to start from when embedded into a host token of `host_kind`
    fn embedded_initial_state(&self, _host_kind: TokenKind) -> u32 {
        0
    }

    /// Short language tag, e.g. `"css"`
    fn language(&self) -> &'static str;
}

/// Markup scanner that a composite lexer can embed other languages into
///
/// All predicates are pure functions of the host state, so the composite
/// engine never needs grammar-specific constants.
pub trait HostScanner: Lexer {
    /// Width in bits of every state this scanner produces
    fn state_bits(&self) -> u32;

    /// Embedding flags implied by the current token's start state
    fn context(&self) -> EmbeddingContext;

    /// `state` is a start- or end-tag name position
    fn is_tag_name_state(&self, state: u32) -> bool;

    /// `state` is inside a comment
    fn is_comment_state(&self, state: u32) -> bool;

    /// `state` is inside a body whose end is found by searching ahead for a
    /// closing tag
    ///
    /// Such a body's last token can change length when bytes of that closing
    /// tag change, so re-lexing after an edit there restarts at the body.
    fn is_raw_text_state(&self, _state: u32) -> bool {
        false
    }

    /// Offset one past the last byte of the embeddable region beginning at the
    /// current token
    ///
    /// Computed by lookahead; the scanner's own position is not changed.
    fn end_of_embedded_region(&self) -> usize;
}
