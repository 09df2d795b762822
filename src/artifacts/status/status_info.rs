use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::diff::tree_diff::TreeChangeType;
use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::tree::{Tree, TreeBuilder};
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub type FileStatSet = BTreeMap<PathBuf, EntryMetadata>;
pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

/// Three-way comparison of HEAD, the index and the working tree
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    /// Untracked files, and untracked directories with a trailing separator
    pub untracked_files: FileSet,
    pub changed_files: BTreeMap<PathBuf, FileChange>,
    pub workspace_changeset: ChangeSet,
    pub index_changeset: ChangeSet,
}

impl StatusInfo {
    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    /// Compare the three areas
    ///
    /// Index entries whose content turned out unchanged get their stat data refreshed,
    /// so the caller should save the index when it reports changes.
    pub fn initialize(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let ignore = self.repository.ignore_rules()?;
        let inspector = Inspector::new(self.repository.workspace(), &ignore);

        let mut file_stats = FileStatSet::new();
        let mut untracked_files = FileSet::new();
        self.scan_workspace(
            Path::new(""),
            &ignore,
            &inspector,
            index,
            &mut untracked_files,
            &mut file_stats,
        )?;

        let mut changed_files = self.check_index_entries(&file_stats, index, &inspector)?;
        self.check_head_tree(index, &mut changed_files)?;

        let workspace_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(file, change)| {
                (
                    file.clone(),
                    FileChangeType::Workspace(change.workspace_change),
                )
            })
            .collect();
        let index_changeset = changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(file, change)| (file.clone(), FileChangeType::Index(change.index_change)))
            .collect();

        Ok(StatusInfo {
            untracked_files,
            changed_files,
            workspace_changeset,
            index_changeset,
        })
    }

    fn scan_workspace(
        &self,
        prefix: &Path,
        ignore: &IgnoreRules,
        inspector: &Inspector<'_>,
        index: &Index,
        untracked_files: &mut FileSet,
        file_stats: &mut FileStatSet,
    ) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        for path in workspace.list_dir(prefix)? {
            let is_dir = workspace.is_dir(&path);

            if index.is_tracked(&path) {
                if is_dir {
                    self.scan_workspace(
                        &path,
                        ignore,
                        inspector,
                        index,
                        untracked_files,
                        file_stats,
                    )?;
                } else {
                    file_stats.insert(path.clone(), workspace.stat_file(&path)?);
                }
            } else if ignore.is_ignored(&path, is_dir) {
                continue;
            } else if !is_dir {
                untracked_files.insert(path);
            } else if inspector.has_untracked_content(&path, index)? {
                // trailing separator marks a directory
                untracked_files.insert(path.join(""));
            }
        }

        Ok(())
    }

    fn check_index_entries(
        &self,
        file_stats: &FileStatSet,
        index: &mut Index,
        inspector: &Inspector<'_>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();
        let mut refreshed = Vec::new();

        for entry in index.entries() {
            let stat = file_stats.get(&entry.name);
            let change = inspector.check_index_against_workspace(entry, stat)?;

            if change != WorkspaceChangeType::None {
                changed_files
                    .entry(entry.name.clone())
                    .or_default()
                    .workspace_change = change;
            } else if let Some(stat) = stat
                && !entry.times_match(stat)
            {
                refreshed.push((entry.name.clone(), stat.clone()));
            }
        }

        for (path, stat) in refreshed {
            index.update_entry_stat(&path, stat);
        }

        Ok(changed_files)
    }

    /// Stage changes: the HEAD tree against a tree built from the index
    fn check_head_tree(
        &self,
        index: &Index,
        changed_files: &mut BTreeMap<PathBuf, FileChange>,
    ) -> anyhow::Result<()> {
        let database = self.repository.database();
        let head_tree = self.repository.head_tree_oid()?;
        let index_tree = TreeBuilder::build(index.entries())?
            .traverse(&mut |tree: &Tree| database.put(tree))?;

        for change in database.tree_diff(head_tree.as_ref(), Some(&index_tree))? {
            let index_change = match change.change {
                TreeChangeType::Added(_) => IndexChangeType::Added,
                TreeChangeType::Removed(_) => IndexChangeType::Deleted,
                TreeChangeType::Modified { .. } => IndexChangeType::Modified,
            };
            changed_files.entry(change.path).or_default().index_change = index_change;
        }

        Ok(())
    }
}
