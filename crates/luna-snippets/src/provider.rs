//! Cached snippet completion provider

use std::sync::OnceLock;

use luna_fs::{NormalizedPath, io};

use crate::snippet::{CompletionItem, SnippetFile};
use crate::{Error, Result};

/// Document selector for HTML files.
pub const HTML_DOCUMENT_SELECTOR: &str = "html";
/// Document selector for JavaScript files.
pub const JS_DOCUMENT_SELECTOR: &str = "javascript";
/// Document selector for TypeScript files.
pub const TS_DOCUMENT_SELECTOR: &str = "typescript";

/// Serves completion items loaded from one snippet file.
///
/// The file is read on the first request. A file that cannot be read or
/// parsed yields no completions, and is not read again.
#[derive(Debug)]
pub struct SnippetCompletionProvider {
    source: NormalizedPath,
    items: OnceLock<Vec<CompletionItem>>,
}

impl SnippetCompletionProvider {
    pub fn new(source: impl Into<NormalizedPath>) -> Self {
        Self {
            source: source.into(),
            items: OnceLock::new(),
        }
    }

    pub fn source(&self) -> &NormalizedPath {
        &self.source
    }

    pub fn provide_completion_items(&self) -> &[CompletionItem] {
        self.items.get_or_init(|| match load_items(&self.source) {
            Ok(items) => {
                tracing::debug!(source = %self.source, count = items.len(), "Loaded snippets");
                items
            }
            Err(e) => {
                tracing::warn!(source = %self.source, error = %e, "Failed to read snippets");
                Vec::new()
            }
        })
    }
}

/// Parse a snippet file into completion items, in file order.
pub fn load_items(path: &NormalizedPath) -> Result<Vec<CompletionItem>> {
    let content = io::read_text(path)?;
    let file: SnippetFile = serde_json::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_string(),
        source,
    })?;
    Ok(file
        .snippets
        .iter()
        .map(|(_, snippet)| CompletionItem::from(snippet))
        .collect())
}
