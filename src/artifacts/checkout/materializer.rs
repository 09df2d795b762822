//! Writing a tree into a directory
//!
//! A checkout compares three views of every path: the current HEAD tree, the index
//! and the target tree. Only paths where HEAD and the target differ are touched;
//! everything else keeps its index entry and working tree file as they are, including
//! staged files HEAD does not know about.
//!
//! It runs in two phases:
//!
//! 1. [`Materializer::plan`] reads the target tree and inspects the directory. Every
//!    conflict is collected here, before anything is written:
//!    - a staged change (index differs from HEAD) to a path the target changes
//!    - a file whose content differs from the index and from the target
//!    - an untracked file whose content differs from the file that would replace it
//!    - a file sitting where the target needs a directory
//!    - a directory holding files where the target needs a file
//! 2. [`Materializer::apply`] removes HEAD files missing from the target, then
//!    writes every changed target file whose content is not already in place.
//!
//! Checkouts into a directory other than the worktree pass no HEAD tree and no index
//! entries, so every target path is written and every existing file is untracked.
//! A forced checkout skips conflict detection and resets every target path.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GotError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type TreeEntries = BTreeMap<PathBuf, DatabaseEntry>;

/// File system changes needed to reach a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutPlan {
    /// Target blobs to write, by path
    pub updates: TreeEntries,
    /// HEAD paths absent from the target
    pub removals: Vec<PathBuf>,
    /// Index entries carried over unchanged
    pub kept: Vec<IndexEntry>,
}

pub struct Materializer<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    head: TreeEntries,
    tracked: BTreeMap<PathBuf, IndexEntry>,
    force: bool,
}

impl<'r> Materializer<'r> {
    pub fn new(
        database: &'r Database,
        workspace: &'r Workspace,
        head: TreeEntries,
        tracked: impl IntoIterator<Item = IndexEntry>,
        force: bool,
    ) -> Self {
        Materializer {
            database,
            workspace,
            head,
            tracked: tracked
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
            force,
        }
    }

    /// Plan, then apply; returns the index entries after the checkout
    pub fn checkout(&self, tree_oid: &ObjectId) -> anyhow::Result<Vec<IndexEntry>> {
        let plan = self.plan(tree_oid)?;
        self.apply(&plan)
    }

    /// Compute the changes for `tree_oid`, failing with `CheckoutConflict` unless forced
    pub fn plan(&self, tree_oid: &ObjectId) -> anyhow::Result<CheckoutPlan> {
        let targets = self.database.tree_entries(tree_oid)?;
        let mut plan = CheckoutPlan::default();

        for (path, target) in &targets {
            let unchanged = !self.force && self.head.get(path) == Some(target);
            match self.tracked.get(path) {
                Some(entry) if unchanged => plan.kept.push(entry.clone()),
                // staged removal of a path the target leaves alone
                None if unchanged => {}
                _ => {
                    plan.updates.insert(path.clone(), target.clone());
                }
            }
        }

        plan.removals = self
            .head
            .keys()
            .filter(|path| !targets.contains_key(*path) && self.tracked.contains_key(*path))
            .cloned()
            .collect();

        plan.kept.extend(
            self.tracked
                .values()
                .filter(|entry| {
                    !self.head.contains_key(&entry.name) && !targets.contains_key(&entry.name)
                })
                .filter(|entry| !clashes_with(&entry.name, &plan.updates))
                .cloned(),
        );

        if self.force {
            return Ok(plan);
        }

        let conflicts = self.detect_conflicts(&plan)?;
        if !conflicts.is_empty() {
            tracing::debug!(count = conflicts.len(), "checkout conflicts detected");
            return Err(GotError::CheckoutConflict {
                paths: conflicts.into_iter().collect(),
            }
            .into());
        }

        Ok(plan)
    }

    /// Carry out a plan; returns the kept entries plus one entry per written file
    pub fn apply(&self, plan: &CheckoutPlan) -> anyhow::Result<Vec<IndexEntry>> {
        for path in &plan.removals {
            self.workspace.remove_file(path)?;
        }

        let mut entries = plan.kept.clone();
        for (path, target) in &plan.updates {
            if self.current_oid(path)?.as_ref() != Some(&target.oid) {
                let blob = self.database.get_blob(&target.oid)?;
                self.workspace
                    .write_file(path, blob.content(), target.mode)?;
            }

            let mut metadata = self.workspace.stat_file(path)?;
            metadata.mode = target.mode;
            entries.push(IndexEntry::new(path.clone(), target.oid.clone(), metadata));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            written = plan.updates.len(),
            removed = plan.removals.len(),
            kept = plan.kept.len(),
            target = %self.workspace.path().display(),
            "materialized tree"
        );

        Ok(entries)
    }

    fn detect_conflicts(&self, plan: &CheckoutPlan) -> anyhow::Result<BTreeSet<PathBuf>> {
        let removals = plan.removals.iter().collect::<BTreeSet<_>>();
        let mut conflicts = BTreeSet::new();

        for (path, target) in &plan.updates {
            for parent in path.ancestors().skip(1) {
                if parent.as_os_str().is_empty() {
                    continue;
                }
                if self.workspace.is_file(parent) && !removals.contains(&parent.to_path_buf()) {
                    conflicts.insert(parent.to_path_buf());
                }
            }

            if self.workspace.is_dir(path) {
                conflicts.extend(
                    self.files_under(path)?
                        .into_iter()
                        .filter(|file| !removals.contains(file)),
                );
            } else if self.would_lose_changes(path, Some(target))? {
                conflicts.insert(path.clone());
            }
        }

        for path in &plan.removals {
            if self.would_lose_changes(path, None)? {
                conflicts.insert(path.clone());
            }
        }

        Ok(conflicts)
    }

    /// Whether replacing `path` with `target` (None removes it) discards local work
    fn would_lose_changes(
        &self,
        path: &Path,
        target: Option<&DatabaseEntry>,
    ) -> anyhow::Result<bool> {
        let entry = self.tracked.get(path);

        let staged = match (entry, self.head.get(path)) {
            (Some(entry), Some(head)) => !same_content(entry, head),
            (None, None) => false,
            _ => true,
        };
        let index_matches_target = match (entry, target) {
            (Some(entry), Some(target)) => same_content(entry, target),
            _ => false,
        };
        if staged && !index_matches_target {
            return Ok(true);
        }

        if !self.workspace.is_file(path) {
            return Ok(false);
        }
        if let Some(entry) = entry
            && self.is_clean(entry)?
        {
            return Ok(false);
        }

        Ok(self.current_oid(path)?.as_ref() != target.map(|target| &target.oid))
    }

    /// Whether the file still matches its index entry
    fn is_clean(&self, entry: &IndexEntry) -> anyhow::Result<bool> {
        if let Ok(stat) = self.workspace.stat_file(&entry.name)
            && entry.stat_match(&stat)
            && entry.times_match(&stat)
        {
            return Ok(true);
        }

        Ok(self.current_oid(&entry.name)?.as_ref() == Some(&entry.oid))
    }

    /// Blob id of the file at `path`, if there is one
    fn current_oid(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !self.workspace.is_file(path) {
            return Ok(None);
        }

        let blob = Blob::new(self.workspace.read_file(path)?);
        Ok(Some(blob.object_id()?))
    }

    fn files_under(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.workspace.list_files(Some(dir), &IgnoreRules::default())
    }
}

fn same_content(entry: &IndexEntry, tree_entry: &DatabaseEntry) -> bool {
    entry.oid == tree_entry.oid && entry.metadata.mode == tree_entry.mode
}

/// Whether `path` is an ancestor or a descendant of a path being written
fn clashes_with(path: &Path, updates: &TreeEntries) -> bool {
    path.ancestors()
        .skip(1)
        .any(|parent| updates.contains_key(parent))
        || updates.keys().any(|update| update.starts_with(path) && update != path)
}
