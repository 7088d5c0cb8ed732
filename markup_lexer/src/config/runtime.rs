// RUNTIME PREFERENCES
//
// Defaults come from `MLX_*` environment variables; a TOML file may override
// any subset of fields.

use crate::logging::codes::{self, Code};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerPreferences {
    /// Match tag and attribute names without regard to ASCII case
    pub case_insensitive: bool,

    /// Delegate style, script and expression regions to secondary lexers
    pub enable_embedding: bool,

    /// Recognize `${ ... }` expression regions in document content
    pub recognize_expressions: bool,

    /// Collect per-language token metrics while scanning
    pub collect_metrics: bool,

    /// Stop after this many tokens; capped by the compile-time limit
    pub token_limit: Option<usize>,
}

impl Default for LexerPreferences {
    fn default() -> Self {
        Self {
            case_insensitive: env_flag(env_vars::LEXER_CASE_INSENSITIVE, true),
            enable_embedding: env_flag(env_vars::LEXER_ENABLE_EMBEDDING, true),
            recognize_expressions: env_flag(env_vars::LEXER_RECOGNIZE_EXPRESSIONS, true),
            collect_metrics: env_flag(env_vars::LEXER_COLLECT_METRICS, true),
            token_limit: env::var(env_vars::LEXER_TOKEN_LIMIT)
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

impl LexerPreferences {
    /// Token limit actually enforced by the analyzer
    pub fn effective_token_limit(&self) -> usize {
        let ceiling = crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
        self.token_limit.map_or(ceiling, |limit| limit.min(ceiling))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPreferences {
    /// Reject files whose extension is not a known markup extension
    pub require_markup_extension: bool,

    /// Log size and line counts for every loaded document
    pub log_document_metrics: bool,
}

impl Default for DocumentPreferences {
    fn default() -> Self {
        Self {
            require_markup_extension: env_flag(env_vars::DOCUMENT_REQUIRE_EXTENSION, false),
            log_document_metrics: env_flag(env_vars::DOCUMENT_LOG_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// JSON lines instead of plain text
    pub use_structured_logging: bool,

    pub enable_console_logging: bool,

    pub min_log_level: LogLevel,

    /// Log per-document lexing metrics after each scan
    pub log_lexer_metrics: bool,

    /// Tag events with the document being scanned
    pub include_document_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            log_lexer_metrics: env_flag(env_vars::LOGGING_LEXER_METRICS, false),
            include_document_context: env_flag(env_vars::LOGGING_DOCUMENT_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse a log level name or digit, as used in environment variables and CLI flags
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Io { .. } => codes::configuration::CONFIGURATION_IO,
            ConfigError::Parse(_) => codes::configuration::INVALID_CONFIGURATION,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexer: LexerPreferences,
    pub document: DocumentPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing sections and fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexer
    pub const LEXER_CASE_INSENSITIVE: &str = "MLX_LEXER_CASE_INSENSITIVE";
    pub const LEXER_ENABLE_EMBEDDING: &str = "MLX_LEXER_ENABLE_EMBEDDING";
    pub const LEXER_RECOGNIZE_EXPRESSIONS: &str = "MLX_LEXER_RECOGNIZE_EXPRESSIONS";
    pub const LEXER_COLLECT_METRICS: &str = "MLX_LEXER_COLLECT_METRICS";
    pub const LEXER_TOKEN_LIMIT: &str = "MLX_LEXER_TOKEN_LIMIT";

    // Documents
    pub const DOCUMENT_REQUIRE_EXTENSION: &str = "MLX_DOCUMENT_REQUIRE_EXTENSION";
    pub const DOCUMENT_LOG_METRICS: &str = "MLX_DOCUMENT_LOG_METRICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "MLX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "MLX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "MLX_LOGGING_MIN_LEVEL";
    pub const LOGGING_LEXER_METRICS: &str = "MLX_LOGGING_LEXER_METRICS";
    pub const LOGGING_DOCUMENT_CONTEXT: &str = "MLX_LOGGING_DOCUMENT_CONTEXT";
}
