//! Markup document loading with compile-time size limits

use crate::config::compile_time::document::{LARGE_DOCUMENT_THRESHOLD, MAX_DOCUMENT_SIZE};
use crate::config::runtime::DocumentPreferences;
use crate::logging::codes;
use crate::utils::LineIndex;
use crate::{log_debug, log_error, log_success};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Extensions accepted when markup extensions are required
pub const MARKUP_EXTENSIONS: [&str; 3] = ["html", "htm", "xhtml"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document not found: {path}")]
    NotFound { path: String },

    #[error("Invalid document extension: expected one of html, htm, xhtml, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("Document too large: {size} bytes (max: {max_size})")]
    TooLarge { size: u64, max_size: u64 },

    #[error("Not a regular file: {path}")]
    NotAFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in document: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading document: {message}")]
    Io { message: String },

    #[error("Empty document path")]
    InvalidPath,
}

impl DocumentError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            DocumentError::NotFound { .. } => codes::document::DOCUMENT_NOT_FOUND,
            DocumentError::InvalidExtension { .. } => codes::document::INVALID_EXTENSION,
            DocumentError::TooLarge { .. } => codes::document::DOCUMENT_TOO_LARGE,
            DocumentError::NotAFile { .. } => codes::document::NOT_A_FILE,
            DocumentError::PermissionDenied { .. } => codes::document::PERMISSION_DENIED,
            DocumentError::InvalidEncoding { .. } => codes::document::INVALID_ENCODING,
            DocumentError::Io { .. } => codes::document::IO_ERROR,
            DocumentError::InvalidPath => codes::document::INVALID_PATH,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    /// Canonical path, `None` for in-memory documents
    pub path: Option<PathBuf>,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentMetadata {
    pub fn is_large(&self) -> bool {
        self.size > LARGE_DOCUMENT_THRESHOLD
    }

    pub fn is_markup(&self) -> bool {
        self.extension
            .as_deref()
            .is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext))
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |path| path.display().to_string())
    }
}

/// Document text shared with every lexer that scans it
#[derive(Debug, Clone)]
pub struct Document {
    pub text: Arc<str>,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn from_text(text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let metadata = DocumentMetadata {
            path: None,
            size: text.len() as u64,
            extension: None,
            line_count: LineIndex::new(&text).line_count(),
            modified: None,
        };
        Self { text, metadata }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }
}

pub struct DocumentLoader {
    pub require_markup_extension: bool,
    pub log_document_metrics: bool,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            require_markup_extension: false,
            log_document_metrics: true,
        }
    }

    pub fn from_preferences(preferences: &DocumentPreferences) -> Self {
        Self {
            require_markup_extension: preferences.require_markup_extension,
            log_document_metrics: preferences.log_document_metrics,
        }
    }

    pub fn with_markup_extension_required(mut self, required: bool) -> Self {
        self.require_markup_extension = required;
        self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document, DocumentError> {
        let start_time = Instant::now();
        let path = path.as_ref();
        let display = path.display().to_string();

        log_debug!("Loading document", "path" => display.as_str());

        let path = self.validate_path(path, &display)?;
        let mut metadata = self.read_metadata(&path)?;
        self.validate_metadata(&metadata, &display)?;
        let text = self.read_text(&path, &display)?;

        metadata.line_count = LineIndex::new(&text).line_count();
        let document = Document {
            text: Arc::from(text),
            metadata,
        };
        self.log_loaded(&document, start_time.elapsed());
        Ok(document)
    }

    fn validate_path(&self, path: &Path, display: &str) -> Result<PathBuf, DocumentError> {
        if path.as_os_str().is_empty() {
            let error = DocumentError::InvalidPath;
            log_error!(error.error_code(), "Empty document path provided");
            return Err(error);
        }

        if !path.exists() {
            let error = DocumentError::NotFound {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Document not found", "path" => display);
            return Err(error);
        }

        if !path.is_file() {
            let error = DocumentError::NotAFile {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Path is not a regular file", "path" => display);
            return Err(error);
        }

        path.canonicalize().map_err(|e| {
            let error = DocumentError::Io {
                message: format!("Failed to resolve path '{}': {}", display, e),
            };
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => display,
                "io_error" => e
            );
            error
        })
    }

    fn read_metadata(&self, path: &Path) -> Result<DocumentMetadata, DocumentError> {
        let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        Ok(DocumentMetadata {
            path: Some(path.to_path_buf()),
            size: metadata.len(),
            extension,
            line_count: 0,
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn validate_metadata(
        &self,
        metadata: &DocumentMetadata,
        display: &str,
    ) -> Result<(), DocumentError> {
        if metadata.size > MAX_DOCUMENT_SIZE {
            let error = DocumentError::TooLarge {
                size: metadata.size,
                max_size: MAX_DOCUMENT_SIZE,
            };
            log_error!(error.error_code(), "Document exceeds compile-time maximum size",
                "path" => display,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_DOCUMENT_SIZE
            );
            return Err(error);
        }

        if self.require_markup_extension && !metadata.is_markup() {
            let error = DocumentError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "Document does not have a markup extension",
                "path" => display,
                "extension" => metadata.extension.as_deref().unwrap_or("none")
            );
            return Err(error);
        }
        Ok(())
    }

    fn read_text(&self, path: &Path, display: &str) -> Result<String, DocumentError> {
        let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
        String::from_utf8(bytes).map_err(|e| {
            let error = DocumentError::InvalidEncoding {
                path: display.to_string(),
            };
            log_error!(error.error_code(), "Document is not valid UTF-8",
                "path" => display,
                "valid_up_to" => e.utf8_error().valid_up_to()
            );
            error
        })
    }

    fn log_loaded(&self, document: &Document, elapsed: Duration) {
        let name = document.metadata.display_name();
        if self.log_document_metrics {
            log_success!(codes::success::DOCUMENT_LOADED, "Document loaded",
                "path" => name.as_str(),
                "size_bytes" => document.metadata.size,
                "lines" => document.metadata.line_count,
                "large" => document.metadata.is_large(),
                "duration_ms" => format!("{:.2}", elapsed.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(codes::success::DOCUMENT_LOADED, "Document loaded",
                "path" => name.as_str()
            );
        }
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, e: std::io::Error) -> DocumentError {
    let display = path.display().to_string();
    let error = match e.kind() {
        std::io::ErrorKind::PermissionDenied => DocumentError::PermissionDenied {
            path: display.clone(),
        },
        _ => DocumentError::Io {
            message: format!("{}: {}", display, e),
        },
    };
    log_error!(error.error_code(), "Failed to read document",
        "path" => display,
        "io_error" => e
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(bytes).expect("write temp file");
        file
    }

    #[test]
    fn test_load_document() {
        let file = write_temp(".html", b"<p>\nhello\n</p>");
        let document = DocumentLoader::new().load(file.path()).expect("load");
        assert_eq!(&*document.text, "<p>\nhello\n</p>");
        assert_eq!(document.metadata.line_count, 3);
        assert_eq!(document.metadata.extension.as_deref(), Some("html"));
        assert!(document.metadata.is_markup());
        assert!(document.metadata.modified.is_some());
    }

    #[test]
    fn test_missing_and_empty_paths() {
        let loader = DocumentLoader::new();
        assert_matches!(
            loader.load("/definitely/not/here.html"),
            Err(DocumentError::NotFound { .. })
        );
        assert_matches!(loader.load(""), Err(DocumentError::InvalidPath));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().expect("temp dir");
        let error = DocumentLoader::new().load(dir.path()).unwrap_err();
        assert_matches!(error, DocumentError::NotAFile { .. });
        assert_eq!(error.error_code(), codes::document::NOT_A_FILE);
    }

    #[test]
    fn test_extension_requirement() {
        let file = write_temp(".txt", b"<p>");
        assert!(DocumentLoader::new().load(file.path()).is_ok());

        let strict = DocumentLoader::new().with_markup_extension_required(true);
        assert_matches!(
            strict.load(file.path()),
            Err(DocumentError::InvalidExtension { extension: Some(ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let file = write_temp(".html", &[b'<', 0xFF, b'>']);
        assert_matches!(
            DocumentLoader::new().load(file.path()),
            Err(DocumentError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_empty_document_is_accepted() {
        let file = write_temp(".html", b"");
        let document = DocumentLoader::new().load(file.path()).expect("load");
        assert!(document.is_empty());
    }

    #[test]
    fn test_from_text() {
        let document = Document::from_text("a\nb");
        assert_eq!(document.metadata.line_count, 2);
        assert_eq!(document.metadata.display_name(), "<memory>");
        assert_eq!(document.len(), 3);
    }
}
