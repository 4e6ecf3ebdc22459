//! [`TestProject`] builder for synchronizer scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use luna_test_utils::TestProject;
///
/// let project = TestProject::new().with_marker();
/// project.write_file("typings/custom.d.ts", "declare const x: number;");
/// project.assert_file_exists("luna.project");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Add the `luna.project` marker file.
    pub fn with_marker(self) -> Self {
        self.write_file("luna.project", "{}");
        self
    }

    /// Root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` under the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// `.vscode/typings`, where declarations are installed.
    pub fn typings_target(&self) -> PathBuf {
        self.path(".vscode/typings")
    }

    /// `typings/luna-typings.d.ts`, the reference index.
    pub fn index_path(&self) -> PathBuf {
        self.path("typings/luna-typings.d.ts")
    }

    /// Write `content` to `relative`, creating parent folders.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    /// Read `relative` as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_file(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Read the reference index.
    pub fn read_index(&self) -> String {
        self.read_file("typings/luna-typings.d.ts")
    }

    /// Assert that `relative` exists.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that `relative` does not exist.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
    }

    /// Assert that the file at `relative` contains `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let file_content = self.read_file(relative);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            relative,
            content,
            file_content
        );
    }
}
