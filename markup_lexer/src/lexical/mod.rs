//! Lexical analysis over markup documents
//!
//! [`LexicalAnalyzer`] drives the composite highlighting lexer, records one
//! [`TokenSnapshot`](crate::tokens::TokenSnapshot) per token with its resume
//! state, and supports incremental re-lexing after edits.

pub mod analyzer;
pub mod error;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics, ResumeMismatch, TextEdit};
pub use error::LexerError;

use crate::config::compile_time::lexical::{
    MAX_TOKEN_COUNT, MAX_TOKEN_LENGTH_WARNING, RELEX_CONTEXT_TOKENS,
};
use crate::config::runtime::LexerPreferences;
use crate::document::Document;
use crate::tokens::TokenStream;
use serde::Serialize;

/// Tokenize a document with default preferences
pub fn tokenize_document(document: &Document) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(document)
}

pub fn tokenize_document_with_preferences(
    document: &Document,
    preferences: LexerPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(document)
}

/// Compile-time lexical limits, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexicalLimits {
    pub max_token_count: usize,
    pub max_token_length_warning: usize,
    pub relex_context_tokens: usize,
}

pub fn limits() -> LexicalLimits {
    LexicalLimits {
        max_token_count: MAX_TOKEN_COUNT,
        max_token_length_warning: MAX_TOKEN_LENGTH_WARNING,
        relex_context_tokens: RELEX_CONTEXT_TOKENS,
    }
}
