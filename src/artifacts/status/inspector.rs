use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::ignore::IgnoreRules;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

/// Compares single index entries against the working tree
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
    ignore: &'r IgnoreRules,
}

impl<'r> Inspector<'r> {
    /// Whether an untracked directory holds at least one file worth reporting
    pub fn has_untracked_content(&self, path: &Path, index: &Index) -> anyhow::Result<bool> {
        Ok(self
            .workspace
            .list_files(Some(path), self.ignore)?
            .iter()
            .any(|file| !index.is_tracked(file)))
    }

    fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        let blob = self.workspace.parse_blob(&index_entry.name)?;
        let oid = blob.object_id()?;

        Ok(oid != index_entry.oid)
    }

    /// Size and mode decide first; matching timestamps mean unchanged without hashing
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
        stat: Option<&EntryMetadata>,
    ) -> anyhow::Result<WorkspaceChangeType> {
        match stat {
            None => Ok(WorkspaceChangeType::Deleted),
            Some(stat) if !entry.stat_match(stat) => Ok(WorkspaceChangeType::Modified),
            Some(stat) if entry.times_match(stat) => Ok(WorkspaceChangeType::None),
            Some(_) if self.is_content_changed(entry)? => Ok(WorkspaceChangeType::Modified),
            Some(_) => Ok(WorkspaceChangeType::None),
        }
    }
}
