//! Built-in secondary lexers
//!
//! Each language is a set of [`ScanRules`](crate::lexer::ScanRules) driven by
//! a [`RuleLexer`](crate::lexer::RuleLexer). Token kinds are exported as
//! constants per language module.

pub mod css;
pub mod expression;
pub mod script;

pub use css::{CssLexer, CssRules};
pub use expression::{ExpressionLexer, ExpressionRules};
pub use script::{ScriptLexer, ScriptRules};
