//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::Duration;

use fs2::FileExt;
use tokio::io::AsyncWriteExt;

use crate::lock::lock_with_timeout;
use crate::{Error, NormalizedPath, Result};

/// Tuning knobs for writes and lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying an advisory lock before giving up
    pub lock_timeout: Duration,
    /// Whether to fsync temp files before renaming them into place
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name().unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    lock_with_timeout(&temp_file, config.lock_timeout).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    if config.enable_fsync {
        temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    }

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    drop(temp_file);

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, treating a missing file as `None`.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read a file that may hold invalid UTF-8, replacing bad sequences with
/// U+FFFD. A missing file is `None`.
pub fn read_text_lossy_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read(&native_path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically with default robustness.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Remove a single file.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Create a directory and all of its missing parents.
pub fn create_dir_all(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Stream-copy `src` to `dest`, creating the parent chain of `dest`.
///
/// Returns the number of bytes copied. A destination left partially
/// written by a failed copy is removed so that a later run does not
/// mistake it for an installed file.
pub async fn copy_file(src: &NormalizedPath, dest: &NormalizedPath) -> Result<u64> {
    let src_native = src.to_native();
    let dest_native = dest.to_native();

    let mut reader = tokio::fs::File::open(&src_native)
        .await
        .map_err(|source| Error::CopySource {
            path: src_native.clone(),
            source,
        })?;
    ensure_parent(dest).await?;
    let mut writer = tokio::fs::File::create(&dest_native)
        .await
        .map_err(|source| Error::CopyDestination {
            path: dest_native.clone(),
            source,
        })?;

    let copied = async {
        let n = tokio::io::copy(&mut reader, &mut writer).await?;
        writer.flush().await?;
        Ok::<u64, std::io::Error>(n)
    }
    .await;

    match copied {
        Ok(n) => Ok(n),
        Err(source) => {
            drop(writer);
            let _ = tokio::fs::remove_file(&dest_native).await;
            Err(Error::CopyDestination {
                path: dest_native,
                source,
            })
        }
    }
}

/// Write `content` to `dest` asynchronously, creating the parent chain.
///
/// Used for declarations that live in memory rather than on disk.
pub async fn write_bytes(dest: &NormalizedPath, content: &[u8]) -> Result<u64> {
    let dest_native = dest.to_native();
    ensure_parent(dest).await?;

    if let Err(source) = tokio::fs::write(&dest_native, content).await {
        let _ = tokio::fs::remove_file(&dest_native).await;
        return Err(Error::CopyDestination {
            path: dest_native,
            source,
        });
    }
    Ok(content.len() as u64)
}

/// A parent chain that cannot be created is a destination failure.
async fn ensure_parent(path: &NormalizedPath) -> Result<()> {
    if let Some(parent) = path.parent() {
        let parent = parent.to_native();
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|source| Error::CopyDestination {
                path: parent,
                source,
            })?;
    }
    Ok(())
}
