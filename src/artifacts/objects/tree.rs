//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are written sorted by name, with directory names compared as if they
//! ended in `/`, so identical directories always hash identically.
//!
//! ## Tree Building
//!
//! [`TreeBuilder`] turns the flat, path-keyed index into nested trees and writes
//! them children first, so every hash a tree refers to already exists.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// A tree object: entry names mapped to their targets
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    entries: BTreeMap<String, DatabaseEntry>,
}

impl Tree {
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.entries.into_iter()
    }

    pub fn get(&self, name: &str) -> Option<&DatabaseEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they are encoded
    pub fn sorted_entries(&self) -> Vec<(&String, &DatabaseEntry)> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_by_key(|(name, entry)| sort_key(name, entry.is_tree()));
        entries
    }
}

fn sort_key(name: &str, is_tree: bool) -> String {
    if is_tree {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for (name, entry) in self.sorted_entries() {
            write!(content, "{:o} {}", entry.mode.as_u32(), name)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(self.object_type().frame(&content)))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                anyhow::bail!("unexpected EOF in tree entry mode");
            }
            let mode = EntryMode::from_octal_str(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in tree entry name");
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                anyhow::bail!("invalid tree entry name '{name}'");
            }

            let oid = ObjectId::read_h40_from(&mut reader)
                .with_context(|| format!("tree entry '{name}' is missing its hash"))?;

            if entries.insert(name.clone(), DatabaseEntry::new(oid, mode)).is_some() {
                anyhow::bail!("duplicate tree entry '{name}'");
            }
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.sorted_entries()
            .into_iter()
            .map(|(name, entry)| {
                let kind = if entry.is_tree() {
                    ObjectType::Tree
                } else {
                    ObjectType::Blob
                };
                format!("{} {} {}\t{}", entry.mode, kind, entry.oid, name)
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Pending tree entry while building from the index
#[derive(Debug, Clone)]
enum PendingEntry {
    File(IndexEntry),
    Directory(TreeBuilder),
}

/// Nested trees assembled from flat index entries
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    entries: BTreeMap<String, PendingEntry>,
}

impl TreeBuilder {
    /// Group index entries by directory
    ///
    /// An entry at `a/b/c` creates the intermediate directories `a` and `a/b`.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs()?;
            root.add_entry(&parents, entry)?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, parents: &[&Path], entry: &IndexEntry) -> anyhow::Result<()> {
        let Some((parent, rest)) = parents.split_first() else {
            self.entries.insert(
                entry.basename()?.to_string(),
                PendingEntry::File(entry.clone()),
            );
            return Ok(());
        };

        let name = parent
            .file_name()
            .and_then(|s| s.to_str())
            .context("Invalid parent")?;

        let subtree = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| PendingEntry::Directory(TreeBuilder::default()));

        match subtree {
            PendingEntry::Directory(tree) => tree.add_entry(rest, entry),
            PendingEntry::File(file) => anyhow::bail!(
                "{} is staged as a file and as a directory",
                file.name.display()
            ),
        }
    }

    /// Visit trees depth-first, children before parents
    ///
    /// `func` receives each finished tree and returns its id (usually by storing
    /// it), which the parent then records. Returns the root tree id.
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<ObjectId>
    where
        F: FnMut(&Tree) -> anyhow::Result<ObjectId>,
    {
        let mut entries = BTreeMap::new();

        for (name, pending) in &self.entries {
            let entry = match pending {
                PendingEntry::File(file) => {
                    DatabaseEntry::new(file.oid.clone(), file.metadata.mode)
                }
                PendingEntry::Directory(tree) => {
                    DatabaseEntry::new(tree.traverse(func)?, EntryMode::Directory)
                }
            };
            entries.insert(name.clone(), entry);
        }

        func(&Tree::new(entries))
    }
}
