//! Embedded language support
//!
//! - [`context`]: flags describing what the host scanner is inside of
//! - [`registry`]: providers that know how to build secondary lexers
//! - [`selector`]: choosing a secondary lexer and caching it per category

pub mod context;
pub mod registry;
pub mod selector;

pub use context::{EmbeddingContext, ScriptType};
pub use registry::{LanguageProviders, LexerFactory, ProviderRegistry};
pub use selector::{select_secondary_lexer, EmbeddingCategory, LexerCache, LexerSource};
