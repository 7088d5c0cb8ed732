//! Token kinds and recorded token streams
//!
//! - [`TokenKind`] is the closed set of markup kinds plus [`ForeignKind`]
//!   for kinds owned by embedded lexers.
//! - [`TokenStream`] holds the tokens of one lexed range together with the
//!   composite state captured at each token start.

pub mod token;
pub mod token_stream;

pub use token::{ForeignKind, TokenClass, TokenKind};
pub use token_stream::{TokenSnapshot, TokenStream};
