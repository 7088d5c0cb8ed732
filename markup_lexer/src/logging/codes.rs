//! Error and success codes with their classification metadata
//!
//! Every code emitted by the library is declared here together with the
//! metadata that drives severity filtering and recovery decisions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Document loading error codes
pub mod document {
    use super::Code;

    pub const DOCUMENT_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const DOCUMENT_TOO_LARGE: Code = Code::new("E007");
    pub const NOT_A_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_RANGE: Code = Code::new("E020");
    pub const NOT_CHAR_BOUNDARY: Code = Code::new("E021");
    pub const MALFORMED_TOKEN: Code = Code::new("E022");
    pub const OVERSIZED_TOKEN: Code = Code::new("W023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Embedded language codes
pub mod embedding {
    use super::Code;

    pub const PROVIDER_NOT_FOUND: Code = Code::new("W030");
    pub const INCONSISTENT_RESUME_STATE: Code = Code::new("E031");
    pub const STATE_CAPACITY_EXCEEDED: Code = Code::new("E032");
}

/// Configuration error codes
pub mod configuration {
    use super::Code;

    pub const INVALID_CONFIGURATION: Code = Code::new("E050");
    pub const CONFIGURATION_IO: Code = Code::new("E051");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    // Document loading
    pub const DOCUMENT_LOADED: Code = Code::new("I006");

    // Lexical
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const RELEX_COMPLETE: Code = Code::new("I021");
    pub const RESUME_VERIFIED: Code = Code::new("I022");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the input document",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or runtime initialization failed",
                "Check environment variables and configuration files",
            ),
            // Document loading
            ErrorMetadata::new(
                "E005",
                "Document",
                Severity::High,
                false,
                false,
                "Document not found",
                "Verify the path exists",
            ),
            ErrorMetadata::new(
                "E006",
                "Document",
                Severity::Medium,
                true,
                false,
                "Document extension is not a markup extension",
                "Use .html, .htm, .xhtml or disable the extension check",
            ),
            ErrorMetadata::new(
                "E007",
                "Document",
                Severity::High,
                false,
                false,
                "Document exceeds the configured size limit",
                "Split the document or raise max_document_size",
            ),
            ErrorMetadata::new(
                "E008",
                "Document",
                Severity::Medium,
                true,
                false,
                "Path does not refer to a regular file",
                "Pass a file or a directory to walk",
            ),
            ErrorMetadata::new(
                "E009",
                "Document",
                Severity::High,
                false,
                false,
                "Permission denied while reading document",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "Document",
                Severity::High,
                false,
                false,
                "Document is not valid UTF-8",
                "Re-encode the document as UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "Document",
                Severity::High,
                false,
                false,
                "I/O error while reading document",
                "Retry or check the underlying storage",
            ),
            ErrorMetadata::new(
                "E012",
                "Document",
                Severity::Medium,
                false,
                false,
                "Invalid document path",
                "Provide a non-empty path",
            ),
            // Lexical
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::High,
                false,
                false,
                "Lexing range lies outside the buffer",
                "Clamp start and end offsets to the buffer length",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::High,
                false,
                false,
                "Lexing range does not start or end on a character boundary",
                "Align offsets to UTF-8 character boundaries",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Lexer produced a token that breaks stream contiguity",
                "File a bug report with the input document",
            ),
            ErrorMetadata::new(
                "W023",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Token is unusually long",
                "Check for an unterminated construct in the document",
            ),
            ErrorMetadata::new(
                "E027",
                "Lexical",
                Severity::High,
                false,
                true,
                "Token count limit exceeded",
                "Lex the document in smaller ranges or raise max_token_count",
            ),
            // Embedding
            ErrorMetadata::new(
                "W030",
                "Embedding",
                Severity::Low,
                true,
                false,
                "No lexer registered for embedded content",
                "Register a provider for the content type",
            ),
            ErrorMetadata::new(
                "E031",
                "Embedding",
                Severity::High,
                true,
                false,
                "Resume state claims an embedded lexer that cannot be resolved",
                "Ensure the same providers are registered when resuming",
            ),
            ErrorMetadata::new(
                "E032",
                "Embedding",
                Severity::High,
                true,
                false,
                "Embedded lexer state does not fit in the packed state",
                "Reduce the embedded lexer's state width",
            ),
            // Configuration
            ErrorMetadata::new(
                "E050",
                "Configuration",
                Severity::High,
                false,
                false,
                "Runtime configuration is invalid",
                "Fix the TOML syntax or field types",
            ),
            ErrorMetadata::new(
                "E051",
                "Configuration",
                Severity::High,
                false,
                false,
                "Runtime configuration file could not be read",
                "Check the configuration path",
            ),
            // Success
            ErrorMetadata::new(
                "I001",
                "Success",
                Severity::Low,
                true,
                false,
                "Operation completed successfully",
                "None",
            ),
            ErrorMetadata::new(
                "I004",
                "Success",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "None",
            ),
            ErrorMetadata::new(
                "I006",
                "Success",
                Severity::Low,
                true,
                false,
                "Document loaded",
                "None",
            ),
            ErrorMetadata::new(
                "I020",
                "Success",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "None",
            ),
            ErrorMetadata::new(
                "I021",
                "Success",
                Severity::Low,
                true,
                false,
                "Incremental re-lex completed",
                "None",
            ),
            ErrorMetadata::new(
                "I022",
                "Success",
                Severity::Low,
                true,
                false,
                "Resumed token streams matched the full scan",
                "None",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            document::DOCUMENT_NOT_FOUND,
            document::INVALID_EXTENSION,
            document::DOCUMENT_TOO_LARGE,
            document::NOT_A_FILE,
            document::PERMISSION_DENIED,
            document::INVALID_ENCODING,
            document::IO_ERROR,
            document::INVALID_PATH,
            lexical::INVALID_RANGE,
            lexical::NOT_CHAR_BOUNDARY,
            lexical::MALFORMED_TOKEN,
            lexical::OVERSIZED_TOKEN,
            lexical::TOO_MANY_TOKENS,
            embedding::PROVIDER_NOT_FOUND,
            embedding::INCONSISTENT_RESUME_STATE,
            embedding::STATE_CAPACITY_EXCEEDED,
            configuration::INVALID_CONFIGURATION,
            configuration::CONFIGURATION_IO,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::DOCUMENT_LOADED,
            success::TOKENIZATION_COMPLETE,
            success::RELEX_COMPLETE,
            success::RESUME_VERIFIED,
        ];

        for code in declared {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_classification_defaults_for_unknown_code() {
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(is_recoverable("Z999"));
        assert!(!requires_halt("Z999"));
        assert_eq!(get_category("Z999"), "Unknown");
    }

    #[test]
    fn test_halt_codes() {
        assert!(requires_halt(lexical::TOO_MANY_TOKENS.as_str()));
        assert!(!requires_halt(embedding::PROVIDER_NOT_FOUND.as_str()));
        assert_eq!(get_category("W030"), "Embedding");
        assert_eq!(Severity::parse("High"), Some(Severity::High));
    }
}
