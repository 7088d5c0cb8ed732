use crate::logging::codes;
use crate::utils::Span;

/// Lexing errors; recoverable by lexing a different range
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid range {start}..{end} for a buffer of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },

    #[error("Malformed token at {found}: expected a token starting at {expected}")]
    MalformedToken { expected: usize, found: Span },

    #[error("Tokens cover only up to {covered}, range ends at {end}")]
    IncompleteCoverage { covered: usize, end: usize },

    #[error("Too many tokens: {count} (max {limit})")]
    TooManyTokens { count: usize, limit: usize },

    #[error("Edit at {offset} removing {removed} bytes does not fit a stream ending at {end}")]
    InvalidEdit {
        offset: usize,
        removed: usize,
        end: usize,
    },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidRange { .. } | LexerError::InvalidEdit { .. } => {
                codes::lexical::INVALID_RANGE
            }
            LexerError::NotCharBoundary { .. } => codes::lexical::NOT_CHAR_BOUNDARY,
            LexerError::MalformedToken { .. } | LexerError::IncompleteCoverage { .. } => {
                codes::lexical::MALFORMED_TOKEN
            }
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let error = LexerError::TooManyTokens { count: 5, limit: 4 };
        assert_eq!(error.error_code(), codes::lexical::TOO_MANY_TOKENS);
        assert!(error.requires_halt());
        assert_eq!(error.to_string(), "Too many tokens: 5 (max 4)");

        let error = LexerError::MalformedToken {
            expected: 3,
            found: Span::new(4, 6),
        };
        assert_eq!(error.error_code().as_str(), "E022");
        assert!(error.to_string().contains("4..6"));
    }
}
