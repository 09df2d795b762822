//! Working tree I/O
//!
//! All paths handed to a [`Workspace`] are relative to its root. The same type also
//! serves checkouts into directories other than the repository's own worktree.

use crate::artifacts::ignore::{DATA_DIR_NAME, IgnoreRules};
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Vec<u8>> {
        let full_path = self.path.join(file_path);

        std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", full_path.display()))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let full_path = self.path.join(file_path);
        let metadata = std::fs::metadata(&full_path)
            .with_context(|| format!("Unable to stat file {}", full_path.display()))?;

        (full_path.as_path(), metadata).try_into()
    }

    pub fn is_file(&self, path: &Path) -> bool {
        self.path.join(path).is_file()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.path.join(path).is_dir()
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.path.join(path).symlink_metadata().is_ok()
    }

    /// Convert a user-supplied path (absolute or relative to the current directory)
    /// to a path relative to the root
    pub fn relative_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let absolute = normalize(&absolute);

        absolute
            .strip_prefix(self.path.as_ref())
            .map(Path::to_path_buf)
            .with_context(|| format!("{} is outside repository", path.display()))
    }

    /// Files below `root_file_path` (the whole worktree when None) that are not ignored
    pub fn list_files(
        &self,
        root_file_path: Option<&Path>,
        ignore: &IgnoreRules,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root_file_path {
            Some(path) => self.path.join(path),
            None => self.path.to_path_buf(),
        };

        if !root.exists() {
            anyhow::bail!("pathspec '{}' did not match any files", root.display());
        }

        let mut files = WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| {
                entry.file_name() != DATA_DIR_NAME
                    && entry
                        .path()
                        .strip_prefix(self.path.as_ref())
                        .map(|relative| {
                            relative.as_os_str().is_empty()
                                || !ignore.is_ignored(relative, entry.file_type().is_dir())
                        })
                        .unwrap_or(false)
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .ok()
                    .map(Path::to_path_buf)
            })
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    /// Direct children of a directory, skipping the data directory
    pub fn list_dir(&self, dir_path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let full_path = self.path.join(dir_path);

        let mut children = std::fs::read_dir(&full_path)
            .with_context(|| format!("Unable to list directory {}", full_path.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() != DATA_DIR_NAME)
            .map(|entry| dir_path.join(entry.file_name()))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    /// Write a file, creating parent directories and replacing anything in the way
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: EntryMode) -> anyhow::Result<()> {
        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }

        let full_path = self.path.join(file_path);
        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {}", full_path.display())
            })?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {}", full_path.display()))?;
        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {}", full_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = match mode {
                EntryMode::File(FileMode::Executable) => 0o755,
                _ => 0o644,
            };
            std::fs::set_permissions(&full_path, std::fs::Permissions::from_mode(permissions))
                .with_context(|| {
                    format!("Failed to set permissions for file: {}", full_path.display())
                })?;
        }

        Ok(())
    }

    /// Remove a file and any parent directories left empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        match std::fs::remove_file(&full_path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to remove file: {}", full_path.display()));
            }
        }

        let mut parent = file_path.parent();
        while let Some(dir) = parent
            && !dir.as_os_str().is_empty()
        {
            let full_dir = self.path.join(dir);
            if std::fs::remove_dir(&full_dir).is_err() {
                break;
            }
            parent = dir.parent();
        }

        Ok(())
    }

    /// Create a directory and its parents, replacing files that are in the way
    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let mut current = self.path.to_path_buf();

        for component in dir_path.components() {
            current.push(component);

            match std::fs::symlink_metadata(&current) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => std::fs::remove_file(&current).with_context(|| {
                    format!("Failed to remove file in the way: {}", current.display())
                })?,
                Err(_) => {}
            }

            std::fs::create_dir(&current)
                .with_context(|| format!("Failed to create directory: {}", current.display()))?;
        }

        Ok(())
    }
}

/// Resolve `.` and `..` lexically
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}
