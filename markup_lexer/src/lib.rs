//! Resumable markup lexer with embedded sub-languages
//!
//! [`HighlightingLexer`] scans HTML with [`HtmlScanner`] and hands style,
//! script and `${}` expression regions to secondary lexers resolved through
//! [`LanguageProviders`]. Every token carries a single `u32` state from which
//! lexing can resume, which [`LexicalAnalyzer`] uses for incremental re-lexing.

#[macro_use]
pub mod logging;

pub mod config;
pub mod document;
pub mod embedding;
pub mod highlighting;
pub mod html;
pub mod languages;
pub mod lexer;
pub mod lexical;
pub mod tokens;
pub mod utils;

pub use config::runtime::LexerPreferences;
pub use config::RuntimeConfig;
pub use document::{Document, DocumentError, DocumentLoader};
pub use embedding::{EmbeddingCategory, EmbeddingContext, LanguageProviders, ProviderRegistry};
pub use highlighting::HighlightingLexer;
pub use html::HtmlScanner;
pub use lexer::{HostScanner, Lexer, StateLayout};
pub use lexical::{LexerError, LexicalAnalyzer, LexicalMetrics, TextEdit};
pub use tokens::{ForeignKind, TokenKind, TokenSnapshot, TokenStream};
