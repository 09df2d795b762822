//! Object database
//!
//! Content-addressable, write-once storage. Every object lives at
//! `.got/objects/<2 hex>/<38 hex>` as the zlib-compressed object stream; the hash is
//! recomputed on every read so a corrupted file surfaces as `MalformedObject`.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::tree_diff::{TreeChange, TreeDiff};
use crate::artifacts::objects::OBJECT_ID_PREFIX_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::codec;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::GotError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shortest abbreviated hash accepted by prefix lookups
pub const MIN_PREFIX_LENGTH: usize = 4;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: implement packfiles for better performance and storage efficiency
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object unless an object with the same hash already exists
    ///
    /// Idempotent: storing identical content twice only costs the existence check.
    pub fn put(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let content = object.serialize()?;
        let oid = ObjectId::from_encoded(&content);
        let object_path = self.path.join(oid.to_path());

        if object_path.exists() {
            tracing::trace!(%oid, "object already stored");
            return Ok(oid);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(&object_path, &content)?;
        tracing::debug!(%oid, kind = %object.object_type(), size = content.len(), "stored object");

        Ok(oid)
    }

    /// Load and decode an object, verifying its hash
    pub fn get(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let content = self.read_object(oid)?;
        codec::decode_with_id(oid, &content)
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).is_file()
    }

    /// Kind of a stored object, read from its header only
    pub fn object_type(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        let content = self.read_object(oid)?;
        codec::decode_type(oid, &content)
    }

    pub fn get_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        match self.get(oid)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(GotError::NotACommit {
                oid: oid.to_string(),
                kind: other.object_type().to_string(),
            }
            .into()),
        }
    }

    pub fn get_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        self.get(oid)?
            .into_tree()
            .ok_or_else(|| wrong_kind(oid, ObjectType::Tree))
    }

    pub fn get_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        self.get(oid)?
            .into_blob()
            .ok_or_else(|| wrong_kind(oid, ObjectType::Blob))
    }

    /// Every blob reachable from a tree, keyed by its full path
    pub fn tree_entries(&self, oid: &ObjectId) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut entries = BTreeMap::new();
        self.collect_tree_entries(oid, Path::new(""), &mut entries)?;

        Ok(entries)
    }

    fn collect_tree_entries(
        &self,
        oid: &ObjectId,
        prefix: &Path,
        entries: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        for (name, entry) in self.get_tree(oid)?.into_entries() {
            let path = prefix.join(name);

            if entry.is_tree() {
                self.collect_tree_entries(&entry.oid, &path, entries)?;
            } else {
                entries.insert(path, entry);
            }
        }

        Ok(())
    }

    /// Structural difference between two trees (`None` stands for an empty tree)
    pub fn tree_diff(
        &self,
        old_oid: Option<&ObjectId>,
        new_oid: Option<&ObjectId>,
    ) -> anyhow::Result<Vec<TreeChange>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_oids(old_oid, new_oid, Path::new(""))?;

        Ok(tree_diff.into_changes())
    }

    /// Expand an abbreviated hash to the single object it names
    pub fn resolve_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() < MIN_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("'{prefix}' is not an abbreviated object id");
        }

        let mut matches = self.find_objects_by_prefix(&prefix)?;
        tracing::trace!(%prefix, candidates = matches.len(), "prefix lookup");

        match matches.len() {
            0 => Err(GotError::ObjectNotFound { oid: prefix }.into()),
            1 => Ok(matches.remove(0)),
            _ => {
                let candidates = matches
                    .iter()
                    .map(|oid| match self.object_type(oid) {
                        Ok(kind) => format!("{} {}", oid.to_short_oid(), kind),
                        Err(_) => format!("{} unknown", oid.to_short_oid()),
                    })
                    .collect();

                Err(GotError::AmbiguousHash { prefix, candidates }.into())
            }
        }
    }

    /// All stored objects whose hash starts with `prefix` (at least two characters)
    ///
    /// Only the bucket named by the first two characters is scanned.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let (dir_name, file_prefix) = prefix.split_at(OBJECT_ID_PREFIX_LENGTH.min(prefix.len()));
        let dir_path = self.path.join(dir_name);

        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to read object bucket {}", dir_path.display()))?
        {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    fn read_object(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(GotError::ObjectNotFound {
                    oid: oid.to_string(),
                }
                .into());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Unable to read object file {}", object_path.display())
                });
            }
        };

        let content = codec::decompress(&compressed)
            .map_err(|err| GotError::malformed(oid, format!("{err:#}")))?;

        let actual = ObjectId::from_encoded(&content);
        if &actual != oid {
            return Err(GotError::malformed(oid, format!("content hashes to {actual}")).into());
        }

        Ok(content)
    }

    fn write_object(&self, object_path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = codec::compress(content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| {
                format!("Unable to open object file {}", temp_object_path.display())
            })?;

        file.write_all(&compressed).with_context(|| {
            format!("Unable to write object file {}", temp_object_path.display())
        })?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).with_context(|| {
            format!("Unable to rename object file to {}", object_path.display())
        })?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

fn wrong_kind(oid: &ObjectId, wanted: ObjectType) -> anyhow::Error {
    GotError::WrongKind {
        oid: oid.to_string(),
        wanted: wanted.to_string(),
    }
    .into()
}
