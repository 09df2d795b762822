//! References (branches, HEAD, tags)
//!
//! References are human-readable names pointing at objects. They can be:
//! - Direct: containing a 40-character hash
//! - Symbolic: `ref: <name>` pointing at another reference (e.g. HEAD -> refs/heads/master)
//!
//! Every reference is a small text file below `.got/`, replaced atomically through a
//! lockfile on each update.

use crate::artifacts::core::lockfile;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::ref_name::{HEADS_PREFIX, REFS_PREFIX, RefName};
use crate::errors::GotError;
use anyhow::Context;
use std::path::Path;
use walkdir::WalkDir;

/// Maximum number of symbolic hops followed before reporting a cycle
pub const MAX_SYMREF_DEPTH: usize = 5;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Raw content of a reference file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// Symbolic reference pointing to another ref
    SymRef(RefName),
    /// Direct object ID
    Oid(ObjectId),
}

#[derive(Debug)]
pub struct Refs {
    /// Path to the repository data directory (`.got`)
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    /// Read a reference file without following it
    pub fn read_raw(&self, name: &RefName) -> anyhow::Result<Option<RefValue>> {
        let path = name.to_path(&self.path);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read ref file at {}", path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => Ok(Some(RefValue::SymRef(RefName::try_parse(
                symref_match[1].to_string(),
            )?))),
            None => ObjectId::try_parse(content.to_string())
                .map(|oid| Some(RefValue::Oid(oid)))
                .with_context(|| format!("reference {name} holds an invalid object id")),
        }
    }

    pub fn exists(&self, name: &RefName) -> bool {
        name.to_path(&self.path).is_file()
    }

    /// Resolve a reference to an object id, following symbolic references
    pub fn read(&self, name: &RefName) -> anyhow::Result<ObjectId> {
        let target = self.resolve_symbolic(name)?;

        match self.read_raw(&target)? {
            Some(RefValue::Oid(oid)) => Ok(oid),
            _ => Err(GotError::ReferenceNotFound {
                name: target.to_string(),
            }
            .into()),
        }
    }

    /// Follow symbolic references to the last name in the chain
    ///
    /// The returned reference may not exist yet (e.g. the branch of an empty repository).
    pub fn resolve_symbolic(&self, name: &RefName) -> anyhow::Result<RefName> {
        let mut current = name.clone();

        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read_raw(&current)? {
                Some(RefValue::SymRef(target)) => current = target,
                Some(RefValue::Oid(_)) => return Ok(current),
                None if current == *name => {
                    return Err(GotError::ReferenceNotFound {
                        name: name.to_string(),
                    }
                    .into());
                }
                None => return Ok(current),
            }
        }

        Err(GotError::ReferenceCycle {
            name: name.to_string(),
        }
        .into())
    }

    /// Create or overwrite a direct reference
    pub fn write(&self, name: &RefName, oid: &ObjectId) -> anyhow::Result<()> {
        tracing::debug!(%name, %oid, "updating reference");
        lockfile::write_atomically(&name.to_path(&self.path), format!("{oid}\n").as_bytes())
    }

    /// Create or overwrite a symbolic reference
    pub fn write_symbolic(&self, name: &RefName, target: &RefName) -> anyhow::Result<()> {
        tracing::debug!(%name, %target, "updating symbolic reference");
        lockfile::write_atomically(
            &name.to_path(&self.path),
            format!("ref: {target}\n").as_bytes(),
        )
    }

    pub fn delete(&self, name: &RefName) -> anyhow::Result<()> {
        let path = name.to_path(&self.path);
        if !path.is_file() {
            return Err(GotError::ReferenceNotFound {
                name: name.to_string(),
            }
            .into());
        }

        std::fs::remove_file(&path)
            .with_context(|| format!("failed to delete ref file at {}", path.display()))?;
        self.prune_empty_parent_dirs(&path)?;
        tracing::debug!(%name, "deleted reference");

        Ok(())
    }

    /// References below `prefix` (e.g. `refs/heads/`), sorted by name
    pub fn list(&self, prefix: &str) -> anyhow::Result<Vec<RefName>> {
        let refs_path = self.path.join(REFS_PREFIX);
        let mut names = WalkDir::new(&refs_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                let name = relative_path.to_str()?.replace(std::path::MAIN_SEPARATOR, "/");
                RefName::try_parse(name).ok()
            })
            .filter(|name| name.as_ref().starts_with(prefix))
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    /// First existing reference a short name can refer to
    pub fn lookup(&self, name: &str) -> Option<RefName> {
        RefName::candidates(name)
            .into_iter()
            .find(|candidate| self.exists(candidate))
    }

    /// The commit HEAD points to, or None before the first commit
    pub fn head_oid(&self) -> anyhow::Result<Option<ObjectId>> {
        let target = self.resolve_symbolic(&RefName::head())?;

        match self.read_raw(&target)? {
            Some(RefValue::Oid(oid)) => Ok(Some(oid)),
            _ => Ok(None),
        }
    }

    /// The branch HEAD is attached to, or None when HEAD is detached
    pub fn current_branch(&self) -> anyhow::Result<Option<RefName>> {
        let target = self.resolve_symbolic(&RefName::head())?;

        Ok(target.is_branch().then_some(target))
    }

    /// Move the current branch (or a detached HEAD) to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let target = self.resolve_symbolic(&RefName::head())?;
        self.write(&target, oid)
    }

    /// Attach HEAD to a branch
    pub fn set_head_branch(&self, branch: &RefName) -> anyhow::Result<()> {
        self.write_symbolic(&RefName::head(), branch)
    }

    /// Detach HEAD at `oid`
    pub fn detach_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.write(&RefName::head(), oid)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        let stop_dirs = [
            self.path.join(REFS_PREFIX),
            self.path.join(HEADS_PREFIX),
            self.path.join("refs/tags/"),
        ];

        if let Some(parent) = path.parent()
            && parent.starts_with(self.path.as_ref())
            && !stop_dirs.iter().any(|dir| dir.as_path() == parent)
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty ref directory at {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
