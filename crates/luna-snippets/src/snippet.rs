//! TextMate snippet format and completion items

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// One entry of a TextMate snippet file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmSnippet {
    pub prefix: String,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A snippet file, keeping snippets in the order they appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetFile {
    pub snippets: Vec<(String, TmSnippet)>,
}

impl<'de> Deserialize<'de> for SnippetFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnippetFileVisitor;

        impl<'de> Visitor<'de> for SnippetFileVisitor {
            type Value = SnippetFile;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of snippet names to snippets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut snippets = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, snippet)) = map.next_entry::<String, TmSnippet>()? {
                    snippets.push((name, snippet));
                }
                Ok(SnippetFile { snippets })
            }
        }

        deserializer.deserialize_map(SnippetFileVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionItemKind {
    Snippet,
}

/// A completion offered to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub documentation: String,
    /// Snippet body, lines joined with `\n`
    pub insert_text: String,
}

impl From<&TmSnippet> for CompletionItem {
    fn from(snippet: &TmSnippet) -> Self {
        Self {
            label: snippet.prefix.clone(),
            kind: CompletionItemKind::Snippet,
            documentation: snippet.description.clone(),
            insert_text: snippet.body.join("\n"),
        }
    }
}
