//! Index (staging area)
//!
//! Tracks which files will be included in the next commit, keyed by path.
//!
//! ## Index File Format
//!
//! The index file contains:
//! - Header: Signature, version, and entry count
//! - Entries: Sorted list of tracked files with metadata
//! - Checksum: SHA-1 hash of the entire index for integrity verification
//!
//! Saving writes `.got/index.lock` and renames it over `.got/index`, so readers
//! always see a complete index.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to the entries below them, which lets a file
//!   replace a directory (and the other way around) in one step

use crate::areas::database::Database;
use crate::artifacts::core::lockfile::Lockfile;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{
    ENTRY_BLOCK, ENTRY_MIN_SIZE, EntryMetadata, IndexEntry,
};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GotError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.got/index`)
    path: Box<Path>,
    entries: BTreeMap<PathBuf, IndexEntry>,
    children: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Set when the entries differ from what is on disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the path is a staged file or a directory containing staged files
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    /// Staged paths at or below `path`
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| path.as_os_str().is_empty() || entry_path.starts_with(path))
            .cloned()
            .collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Load the index from disk, replacing the in-memory entries
    ///
    /// A missing or empty index file is an empty index.
    pub fn load(&mut self) -> anyhow::Result<()> {
        self.clear();

        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Unable to read index file {}", self.path.display())
                });
            }
        };
        if data.is_empty() {
            return Ok(());
        }

        let mut reader = Checksum::new(Cursor::new(data));
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;
        reader
            .verify()
            .with_context(|| format!("Corrupt index file {}", self.path.display()))?;

        tracing::trace!(entries = self.entries.len(), "loaded index");
        Ok(())
    }

    fn parse_header(&self, reader: &mut Checksum<Cursor<Vec<u8>>>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(Cursor::new(header_bytes))?;
        header.validate()?;

        Ok(header.entries_count)
    }

    /// Read each entry, growing it block by block until its NUL padding is reached
    fn parse_entries(
        &mut self,
        entries_count: u32,
        reader: &mut Checksum<Cursor<Vec<u8>>>,
    ) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes.last() != Some(&0) {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(Cursor::new(Bytes::from(entry_bytes)))?;
            self.store_entry(entry)?;
        }

        Ok(())
    }

    /// Persist the entries atomically
    pub fn save(&mut self) -> anyhow::Result<()> {
        let mut writer = Checksum::new(Vec::new());

        let header = IndexHeader::with_count(self.entries.len() as u32);
        writer.write(&header.serialize()?)?;
        for entry in self.entries.values() {
            writer.write(&entry.serialize()?)?;
        }
        writer.write_checksum()?;

        let mut lockfile = Lockfile::acquire(&self.path)?;
        lockfile.write(&writer.into_inner())?;
        lockfile.commit()?;

        self.changed = false;
        tracing::debug!(entries = self.entries.len(), "saved index");

        Ok(())
    }

    /// Store `content` as a blob and record it under `path`
    pub fn stage(
        &mut self,
        database: &Database,
        path: &Path,
        content: Vec<u8>,
        metadata: EntryMetadata,
    ) -> anyhow::Result<ObjectId> {
        let oid = database.put(&Blob::new(content))?;
        self.add(IndexEntry::new(path.to_path_buf(), oid.clone(), metadata))?;

        tracing::debug!(path = %path.display(), %oid, "staged file");
        Ok(oid)
    }

    /// Remove the entry for `path`
    pub fn unstage(&mut self, path: &Path) -> anyhow::Result<()> {
        if !self.entries.contains_key(path) {
            return Err(GotError::PathNotStaged {
                path: path.to_path_buf(),
            }
            .into());
        }

        self.remove_entry(path)?;
        self.changed = true;

        Ok(())
    }

    /// Insert or replace an entry, dropping entries it conflicts with
    ///
    /// Staging `a/b` removes a staged file `a`; staging `a` removes everything below `a/`.
    pub fn add(&mut self, entry: IndexEntry) -> anyhow::Result<()> {
        self.discard_conflicts(&entry)?;
        self.store_entry(entry)?;
        self.changed = true;

        Ok(())
    }

    /// Replace every entry at once
    pub fn reset(&mut self, entries: impl IntoIterator<Item = IndexEntry>) -> anyhow::Result<()> {
        self.clear();
        for entry in entries {
            self.store_entry(entry)?;
        }
        self.changed = true;

        Ok(())
    }

    pub fn update_entry_stat(&mut self, path: &Path, stat: EntryMetadata) {
        if let Some(existing_entry) = self.entries.get_mut(path) {
            existing_entry.metadata = stat;
            self.changed = true;
        }
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        for parent in entry.parent_dirs()? {
            self.remove_entry(&parent.to_path_buf())?;
        }
        self.remove_children(&entry.name)
    }

    fn store_entry(&mut self, entry: IndexEntry) -> anyhow::Result<()> {
        for parent in entry.parent_dirs()? {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);

        Ok(())
    }

    fn remove_children(&mut self, path: &Path) -> anyhow::Result<()> {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child)?;
            }
        }

        Ok(())
    }

    fn remove_entry(&mut self, path: &Path) -> anyhow::Result<()> {
        let Some(entry) = self.entries.remove(path) else {
            return Ok(());
        };

        for parent in entry.parent_dirs()? {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }

        Ok(())
    }
}
