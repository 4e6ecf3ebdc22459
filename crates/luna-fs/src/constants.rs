//! Well-known names used inside a Luna project.

use std::path::Path;

/// Default file and folder names of a Luna project.
///
/// These are defaults only; `SyncConfig` in `luna-typings` carries the
/// values actually used at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LunaPath {
    /// The `luna.project` marker file identifying a project root
    ProjectMarker,
    /// The `.vscode` editor folder
    EditorDir,
    /// The `typings` folder, both under the editor folder and at the root
    TypingsDir,
    /// The `luna-typings.d.ts` reference index
    IndexFile,
    /// The `.luna.lock` advisory lock file
    LockFile,
    /// The `.luna` per-project configuration folder
    ConfigDir,
    /// The `LunaTypings` bundled declaration folder
    BundleDir,
}

impl LunaPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectMarker => "luna.project",
            Self::EditorDir => ".vscode",
            Self::TypingsDir => "typings",
            Self::IndexFile => "luna-typings.d.ts",
            Self::LockFile => ".luna.lock",
            Self::ConfigDir => ".luna",
            Self::BundleDir => "LunaTypings",
        }
    }
}

impl AsRef<Path> for LunaPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for LunaPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for LunaPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
