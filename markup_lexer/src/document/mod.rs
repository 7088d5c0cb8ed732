//! Markup documents and their loading

mod loader;

pub use loader::{Document, DocumentError, DocumentLoader, DocumentMetadata, MARKUP_EXTENSIONS};

use crate::config::runtime::DocumentPreferences;
use std::path::Path;

/// Load a document with default preferences
pub fn load_document(path: impl AsRef<Path>) -> Result<Document, DocumentError> {
    DocumentLoader::new().load(path)
}

pub fn load_document_with_preferences(
    path: impl AsRef<Path>,
    preferences: &DocumentPreferences,
) -> Result<Document, DocumentError> {
    DocumentLoader::from_preferences(preferences).load(path)
}
