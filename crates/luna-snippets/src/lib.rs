//! Snippet completions for Luna projects
//!
//! Reads TextMate-format snippet files and turns each snippet into a
//! [`CompletionItem`] an editor can offer.

pub mod error;
pub mod provider;
pub mod snippet;

pub use error::{Error, Result};
pub use provider::{
    HTML_DOCUMENT_SELECTOR, JS_DOCUMENT_SELECTOR, SnippetCompletionProvider, TS_DOCUMENT_SELECTOR,
};
pub use snippet::{CompletionItem, CompletionItemKind, SnippetFile, TmSnippet};
