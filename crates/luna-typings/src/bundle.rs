//! Bundled declaration sets
//!
//! A bundle is the read-only collection of declaration files shipped with
//! the tools. The synchronizer only ever asks a bundle to copy one of its
//! entries to a destination, so where the bytes live (a folder on disk or
//! the binary itself) stays behind the [`DeclarationSource`] trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use luna_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// A read-only source of declaration files addressed by relative path.
#[async_trait]
pub trait DeclarationSource: Send + Sync {
    /// Human-readable description used in errors and logs.
    fn describe(&self) -> String;

    /// Whether the bundle ships `relative`.
    fn contains(&self, relative: &str) -> bool;

    /// Every relative path in the bundle, sorted.
    fn list(&self) -> Vec<String>;

    /// Copy the declaration at `relative` to `dest`, creating parent
    /// folders. Returns the number of bytes written.
    async fn copy_to(&self, relative: &str, dest: &NormalizedPath) -> Result<u64>;
}

/// Check that `relative` is a plain relative path inside a bundle.
///
/// Returns the normalized, forward-slash form.
pub fn validate_reference(relative: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidReference {
        reference: relative.to_string(),
        reason: reason.to_string(),
    };

    let raw = relative.replace('\\', "/");
    if raw.split('/').any(|segment| segment == "..") {
        return Err(invalid("parent segments are not allowed"));
    }

    let normalized = NormalizedPath::new(&raw);
    if normalized.is_absolute() {
        return Err(invalid("must be relative"));
    }
    if normalized.as_str() == "." {
        return Err(invalid("empty path"));
    }
    Ok(normalized.as_str().to_string())
}

/// Declarations stored in a folder on disk.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: NormalizedPath,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn collect(dir: &std::path::Path, prefix: &str, out: &mut Vec<String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };
            let path = entry.path();
            if path.is_dir() {
                Self::collect(&path, &relative, out);
            } else if relative.ends_with(".d.ts") {
                out.push(relative);
            }
        }
    }
}

#[async_trait]
impl DeclarationSource for DirectoryBundle {
    fn describe(&self) -> String {
        format!("bundle at {}", self.root)
    }

    fn contains(&self, relative: &str) -> bool {
        self.root.join(relative).is_file()
    }

    fn list(&self) -> Vec<String> {
        let mut out = Vec::new();
        Self::collect(&self.root.to_native(), "", &mut out);
        out.sort();
        out
    }

    async fn copy_to(&self, relative: &str, dest: &NormalizedPath) -> Result<u64> {
        let src = self.root.join(relative);
        io::copy_file(&src, dest).await.map_err(|e| match e {
            luna_fs::Error::CopySource { .. } if e.is_not_found() => Error::DeclarationNotFound {
                reference: relative.to_string(),
                bundle: self.describe(),
            },
            other => Error::Fs(other),
        })
    }
}

/// Declarations compiled into the binary, versioned with this crate.
#[derive(Debug, Clone)]
pub struct EmbeddedBundle {
    files: BTreeMap<&'static str, &'static str>,
}

const EMBEDDED_FILES: &[(&str, &str)] = &[
    (
        "luna/luna.d.ts",
        include_str!("../assets/LunaTypings/luna/luna.d.ts"),
    ),
    (
        "luna/plugins/qrcode.d.ts",
        include_str!("../assets/LunaTypings/luna/plugins/qrcode.d.ts"),
    ),
];

impl EmbeddedBundle {
    pub fn new() -> Self {
        Self {
            files: EMBEDDED_FILES.iter().copied().collect(),
        }
    }

    /// Version of the embedded declaration set.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Raw content of an embedded declaration.
    pub fn get(&self, relative: &str) -> Option<&'static str> {
        self.files.get(relative).copied()
    }
}

impl Default for EmbeddedBundle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeclarationSource for EmbeddedBundle {
    fn describe(&self) -> String {
        format!("embedded bundle v{}", self.version())
    }

    fn contains(&self, relative: &str) -> bool {
        self.files.contains_key(relative)
    }

    fn list(&self) -> Vec<String> {
        self.files.keys().map(|k| k.to_string()).collect()
    }

    async fn copy_to(&self, relative: &str, dest: &NormalizedPath) -> Result<u64> {
        let content = self.get(relative).ok_or_else(|| Error::DeclarationNotFound {
            reference: relative.to_string(),
            bundle: self.describe(),
        })?;
        Ok(io::write_bytes(dest, content.as_bytes()).await?)
    }
}
