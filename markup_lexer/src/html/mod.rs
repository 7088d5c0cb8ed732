//! HTML host scanner
//!
//! The scanner's state packs the grammar position together with the flags
//! that decide embedding, so the composite lexer can recover the embedding
//! context from any captured state.

pub mod rules;
pub mod scanner;
pub mod state;

pub use rules::HtmlRules;
pub use scanner::HtmlScanner;
pub use state::{Grammar, HtmlState, HOST_STATE_BITS};
