//! Shared primitive types used across the lexer and its front ends

pub mod span;

pub use span::{LineIndex, Position, Span};
