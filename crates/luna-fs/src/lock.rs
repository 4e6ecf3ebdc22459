//! Scoped advisory locking
//!
//! A [`ProjectLock`] serializes read-modify-write cycles on files shared by
//! every run against the same project, such as the reference index.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, LunaPath, NormalizedPath, Result, RobustnessConfig};

/// Try to take an exclusive lock on `file`, retrying with exponential
/// backoff until `timeout` has elapsed.
pub(crate) fn lock_with_timeout(file: &File, timeout: Duration) -> std::io::Result<()> {
    let policy = ExponentialBackoff {
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(250),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };

    backoff::retry(policy, || {
        file.try_lock_exclusive().map_err(backoff::Error::transient)
    })
    .map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    })
}

/// Exclusive lock over a directory, held until dropped.
///
/// The lock lives in a `.luna.lock` file inside the directory. The file is
/// left in place after release; only the advisory lock on it matters.
#[derive(Debug)]
pub struct ProjectLock {
    file: File,
    path: PathBuf,
}

impl ProjectLock {
    /// Acquire the lock for `dir`, creating the directory if needed.
    ///
    /// Blocks the calling thread for up to `config.lock_timeout`.
    pub fn acquire(dir: &NormalizedPath, config: RobustnessConfig) -> Result<Self> {
        crate::io::create_dir_all(dir)?;
        let path = dir.join(LunaPath::LockFile.as_str()).to_native();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        lock_with_timeout(&file, config.lock_timeout)
            .map_err(|_| Error::LockFailed { path: path.clone() })?;

        tracing::debug!(lock = %path.display(), "Acquired project lock");
        Ok(Self { file, path })
    }

    /// Acquire the lock from async code without stalling the runtime.
    pub async fn acquire_async(dir: NormalizedPath, config: RobustnessConfig) -> Result<Self> {
        let lock_path = dir.join(LunaPath::LockFile.as_str()).to_native();
        tokio::task::spawn_blocking(move || Self::acquire(&dir, config))
            .await
            .map_err(|_| Error::LockFailed { path: lock_path })?
    }

    /// Path of the lock file backing this guard.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), error = %e, "Failed to release project lock");
        } else {
            tracing::debug!(lock = %self.path.display(), "Released project lock");
        }
    }
}
