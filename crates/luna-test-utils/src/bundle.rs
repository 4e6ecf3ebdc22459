//! [`TestBundle`]: a throwaway declaration bundle on disk.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A temporary folder laid out like a shipped declaration bundle.
pub struct TestBundle {
    temp_dir: TempDir,
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBundle {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// A bundle with `luna/luna.d.ts` and one plugin declaration.
    pub fn standard() -> Self {
        Self::new()
            .with_declaration("luna/luna.d.ts", "interface Luna { version: string; }\n")
            .with_declaration(
                "luna/plugins/qrcode.d.ts",
                "interface LunaQRCode { encode(text: string): string; }\n",
            )
    }

    /// Add a declaration at `relative`.
    pub fn with_declaration(self, relative: &str, content: &str) -> Self {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}
