//! Atomic file replacement
//!
//! A [`Lockfile`] claims `<file>.lock` next to the file being updated, receives the
//! new content, and is renamed over the original on [`Lockfile::commit`]. Readers
//! therefore see either the old or the new content, never a partial write. Dropping
//! an uncommitted lockfile removes it and leaves the original untouched.

use anyhow::Context;
use file_guard::FileGuard;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_SUFFIX: &str = "lock";

#[derive(Debug)]
pub struct Lockfile {
    file_path: PathBuf,
    lock_path: PathBuf,
    guard: Option<FileGuard<Box<File>>>,
}

impl Lockfile {
    /// Claim the lock for `file_path`
    ///
    /// Fails if another process already holds `<file_path>.lock`.
    pub fn acquire(file_path: &Path) -> anyhow::Result<Self> {
        let lock_path = lock_path_for(file_path);

        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {}", parent.display()))?;
        }

        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| {
                format!(
                    "Unable to create '{}': another process may be updating this file",
                    lock_path.display()
                )
            })?;
        let guard = file_guard::lock(Box::new(file), file_guard::Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", lock_path.display()))?;

        tracing::trace!(lock = %lock_path.display(), "acquired lock");

        Ok(Lockfile {
            file_path: file_path.to_path_buf(),
            lock_path,
            guard: Some(guard),
        })
    }

    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        let guard = self
            .guard
            .as_ref()
            .with_context(|| format!("Lock on {} is not held", self.file_path.display()))?;
        let mut file: &File = guard;

        file.write_all(data)
            .with_context(|| format!("Unable to write {}", self.lock_path.display()))
    }

    /// Replace the target file with everything written so far
    pub fn commit(mut self) -> anyhow::Result<()> {
        let guard = self
            .guard
            .take()
            .with_context(|| format!("Lock on {} is not held", self.file_path.display()))?;

        let file: &File = &guard;
        let moved = file
            .sync_all()
            .and_then(|_| std::fs::rename(&self.lock_path, &self.file_path));
        if let Err(err) = moved {
            let _ = std::fs::remove_file(&self.lock_path);
            return Err(err).with_context(|| {
                format!("Unable to move {} into place", self.lock_path.display())
            });
        }
        drop(guard);

        tracing::trace!(file = %self.file_path.display(), "committed lock");
        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        if self.guard.take().is_some() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

/// Write `data` to `file_path` through a lockfile
pub fn write_atomically(file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut lockfile = Lockfile::acquire(file_path)?;
    lockfile.write(data)?;
    lockfile.commit()
}

fn lock_path_for(file_path: &Path) -> PathBuf {
    let mut lock_path = file_path.as_os_str().to_owned();
    lock_path.push(".");
    lock_path.push(LOCK_SUFFIX);
    PathBuf::from(lock_path)
}
