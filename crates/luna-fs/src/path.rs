//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// `.` segments and empty segments are dropped and `..` segments are
/// resolved lexically. Rooted paths clamp at their root (`/..` is `/`), while
/// relative paths keep any leading `..` run, so `../a` stays `../a`.
/// Conversion to a platform-native `PathBuf` happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

/// Split a slash-separated path into its root prefix and remainder.
///
/// Recognizes `//` (UNC), `/` and drive-letter (`C:/`) roots.
fn split_root(path: &str) -> (&str, &str) {
    if let Some(rest) = path.strip_prefix("//") {
        return ("//", rest);
    }
    if let Some(rest) = path.strip_prefix('/') {
        return ("/", rest);
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        let rest = &path[2..];
        return (&path[..2], rest.trim_start_matches('/'));
    }
    ("", path)
}

/// Resolve `.` and `..` lexically. `..` that cannot pop a named segment is
/// kept when `relative`, and dropped at a root otherwise.
fn segments(rest: &str, relative: bool) -> Vec<&str> {
    let mut stack: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if relative => stack.push(".."),
                _ => {}
            },
            other => stack.push(other),
        }
    }
    stack
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let (root, rest) = split_root(&raw);
        let body = segments(rest, root.is_empty()).join("/");

        let inner = match (root, body.is_empty()) {
            ("", true) => ".".to_string(),
            ("", false) => body,
            (r, true) if r.ends_with(':') => format!("{r}/"),
            (r, true) => r.to_string(),
            ("/", false) | ("//", false) => format!("{root}{body}"),
            (r, false) => format!("{r}/{body}"),
        };
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a (possibly multi-segment) relative segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if self.inner == "." {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner.trim_end_matches('/'), segment))
    }

    /// Anchor a relative path at `base`. Absolute paths are returned as-is.
    pub fn absolute_from(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(&self.inner)
        }
    }

    /// Whether this path starts at a filesystem root.
    pub fn is_absolute(&self) -> bool {
        !split_root(&self.inner).0.is_empty()
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let (root, rest) = split_root(&self.inner);
        if rest.is_empty() || self.inner == "." {
            return None;
        }
        if rest == ".." || rest.ends_with("/..") {
            return Some(Self::new(format!("{}/..", self.inner)));
        }
        match rest.rfind('/') {
            Some(idx) => Some(Self::new(format!("{root}{}", &rest[..idx]))),
            None if root.is_empty() => Some(Self::new(".")),
            None => Some(Self::new(root)),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let (_, rest) = split_root(&self.inner);
        if rest.is_empty() || self.inner == "." {
            return None;
        }
        rest.rsplit('/').next()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Express this path relative to `base`, using `..` where needed.
    ///
    /// Returns `None` when the two paths do not share a root (for example
    /// one is absolute and the other relative, or they live on different
    /// drives), or when `base` climbs through `..` beyond the shared prefix.
    /// Equal paths yield `"."`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<String> {
        let (root, rest) = split_root(&self.inner);
        let (base_root, base_rest) = split_root(&base.inner);
        if !root.eq_ignore_ascii_case(base_root) {
            return None;
        }

        let relative = root.is_empty();
        let ours = segments(rest, relative);
        let theirs = segments(base_rest, relative);
        let common = ours
            .iter()
            .zip(theirs.iter())
            .take_while(|(a, b)| a == b)
            .count();
        if theirs[common..].contains(&"..") {
            return None;
        }

        let mut parts: Vec<&str> = std::iter::repeat_n("..", theirs.len() - common).collect();
        parts.extend(&ours[common..]);

        if parts.is_empty() {
            Some(".".to_string())
        } else {
            Some(parts.join("/"))
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
