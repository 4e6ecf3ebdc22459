//! The per-project reference index
//!
//! The index is a plain declaration file holding one
//! `/// <reference path="..."/>` directive per line, each path relative to
//! the index file's own folder. Lines are kept verbatim; duplicate
//! detection is a substring test against the current file content, which
//! keeps the on-disk format compatible with indexes written by other tools.

use std::sync::LazyLock;

use luna_fs::{NormalizedPath, RobustnessConfig, io};
use regex::Regex;

use crate::Result;

static REFERENCE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*///\s*<reference\s+path\s*=\s*["']([^"']+)["']\s*/?>"#)
        .expect("Invalid reference directive regex")
});

/// Format a reference directive for `path`.
pub fn reference_line(path: &str) -> String {
    format!(r#"/// <reference path="{path}"/>"#)
}

/// Extract the path from a reference directive, if the line is one.
pub fn parse_reference(line: &str) -> Option<&str> {
    REFERENCE_PATH
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// In-memory view of a reference index file.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    path: NormalizedPath,
    content: String,
    existed: bool,
}

impl ReferenceIndex {
    /// An empty index that will be written to `path`.
    pub fn empty(path: NormalizedPath) -> Self {
        Self {
            path,
            content: String::new(),
            existed: false,
        }
    }

    /// Load the index at `path`. A missing file is an empty index.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so one bad byte does
    /// not discard every other reference on the next save.
    pub fn load(path: NormalizedPath) -> Result<Self> {
        match io::read_text_lossy_if_exists(&path)? {
            Some(content) => Ok(Self {
                path,
                content,
                existed: true,
            }),
            None => Ok(Self::empty(path)),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Folder that reference paths are relative to.
    pub fn base_dir(&self) -> NormalizedPath {
        self.path.parent().unwrap_or_else(|| NormalizedPath::new("."))
    }

    /// Whether the file existed when loaded.
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Raw content, exactly as it will be written.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Non-empty lines in file order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines().filter(|line| !line.trim().is_empty())
    }

    /// Paths named by reference directives, in file order.
    pub fn references(&self) -> Vec<String> {
        self.lines()
            .filter_map(parse_reference)
            .map(str::to_string)
            .collect()
    }

    /// Whether `reference` occurs anywhere in the current content.
    pub fn contains(&self, reference: &str) -> bool {
        self.content.contains(reference)
    }

    /// Whether the index holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// Append a directive for each path not already present.
    ///
    /// Existing content is left byte-for-byte intact. Returns the paths
    /// that were actually appended.
    pub fn append<S: AsRef<str>>(&mut self, references: &[S]) -> Vec<String> {
        let mut added = Vec::new();
        for reference in references {
            let reference = reference.as_ref();
            if self.contains(reference) {
                tracing::debug!(reference, "Reference already indexed");
                continue;
            }
            if !self.content.is_empty() && !self.content.ends_with('\n') {
                self.content.push('\n');
            }
            self.content.push_str(&reference_line(reference));
            added.push(reference.to_string());
        }
        added
    }

    /// Drop every line mentioning any of `removed`, plus blank lines.
    ///
    /// Returns the number of non-blank lines dropped.
    pub fn retain_without<S: AsRef<str>>(&mut self, removed: &[S]) -> usize {
        let before = self.lines().count();
        let kept: Vec<&str> = self
            .lines()
            .filter(|line| !removed.iter().any(|r| line.contains(r.as_ref())))
            .collect();
        let dropped = before - kept.len();
        self.content = kept.join("\n");
        dropped
    }

    /// Write the index back to its file.
    pub fn save(&self, robustness: RobustnessConfig) -> Result<()> {
        io::write_atomic(&self.path, self.content.as_bytes(), robustness)?;
        Ok(())
    }

    /// Delete the index file.
    pub fn delete(&self) -> Result<()> {
        io::remove_file(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index_with(content: &str) -> ReferenceIndex {
        ReferenceIndex {
            path: NormalizedPath::new("/proj/typings/luna-typings.d.ts"),
            content: content.to_string(),
            existed: true,
        }
    }

    #[test]
    fn reference_line_format() {
        insta::assert_snapshot!(reference_line("luna/luna.d.ts"), @r#"/// <reference path="luna/luna.d.ts"/>"#);
    }

    #[test]
    fn parse_reference_accepts_common_spellings() {
        assert_eq!(parse_reference(r#"/// <reference path="a/x.d.ts"/>"#), Some("a/x.d.ts"));
        assert_eq!(parse_reference(r#"///<reference path='b.d.ts' />"#), Some("b.d.ts"));
        assert_eq!(parse_reference("// just a comment"), None);
    }

    #[test]
    fn append_keeps_existing_bytes() {
        let original = r#"/// <reference path="a/x.d.ts"/>"#;
        let mut index = index_with(original);

        let added = index.append(&["b/y.d.ts"]);

        assert_eq!(added, vec!["b/y.d.ts".to_string()]);
        assert_eq!(
            index.content(),
            "/// <reference path=\"a/x.d.ts\"/>\n/// <reference path=\"b/y.d.ts\"/>"
        );
    }

    #[test]
    fn append_to_empty_index_has_no_leading_newline() {
        let mut index = ReferenceIndex::empty(NormalizedPath::new("/p/typings/i.d.ts"));
        index.append(&["luna/luna.d.ts"]);
        assert_eq!(index.content(), r#"/// <reference path="luna/luna.d.ts"/>"#);
    }

    #[test]
    fn append_skips_present_and_repeated_references() {
        let mut index = index_with("/// <reference path=\"a/x.d.ts\"/>\n");

        let added = index.append(&["a/x.d.ts", "b/y.d.ts", "b/y.d.ts"]);

        assert_eq!(added, vec!["b/y.d.ts".to_string()]);
        assert_eq!(index.references(), vec!["a/x.d.ts", "b/y.d.ts"]);
    }

    #[test]
    fn substring_match_counts_as_present() {
        // Accepted imprecision of the substring check
        let mut index = index_with(r#"/// <reference path="lib/luna/luna.d.ts"/>"#);
        assert!(index.append(&["luna/luna.d.ts"]).is_empty());
    }

    #[test]
    fn retain_without_preserves_order() {
        let mut index = index_with(
            "/// <reference path=\"a.d.ts\"/>\n/// <reference path=\"b.d.ts\"/>\n/// <reference path=\"c.d.ts\"/>",
        );

        let dropped = index.retain_without(&["b.d.ts"]);

        assert_eq!(dropped, 1);
        assert_eq!(
            index.content(),
            "/// <reference path=\"a.d.ts\"/>\n/// <reference path=\"c.d.ts\"/>"
        );
    }

    #[test]
    fn retain_without_everything_leaves_empty_index() {
        let mut index = index_with("/// <reference path=\"a.d.ts\"/>\n\n");
        index.retain_without(&["a.d.ts"]);
        assert!(index.is_empty());
    }

    #[test]
    fn base_dir_is_index_folder() {
        assert_eq!(index_with("").base_dir().as_str(), "/proj/typings");
    }
}
