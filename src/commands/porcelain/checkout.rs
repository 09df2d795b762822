use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::materializer::{Materializer, TreeEntries};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::{PeelTarget, Revision, peel};
use std::io::Write;
use std::path::Path;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.
"#;

impl Repository {
    /// Materialize `target` into `directory` (the worktree when None)
    ///
    /// Checking out into the worktree also resets the index and moves HEAD.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(
        &mut self,
        target: &str,
        directory: Option<&str>,
        force: bool,
    ) -> anyhow::Result<()> {
        let revision = Revision::try_parse(target)?;
        let commit_oid = peel(
            self.database(),
            &revision.resolve(self)?,
            PeelTarget::Kind(ObjectType::Commit),
        )?;
        let commit = self.database().get_commit(&commit_oid)?;

        let directory = match directory {
            Some(directory) => {
                std::fs::create_dir_all(directory)?;
                Some(Path::new(directory).canonicalize()?)
            }
            None => None,
        };

        match directory {
            Some(directory) if directory.as_path() != self.path() => {
                let workspace = Workspace::new(directory.into_boxed_path());
                Materializer::new(self.database(), &workspace, TreeEntries::new(), [], force)
                    .checkout(commit.tree_oid())?;

                writeln!(
                    self.writer(),
                    "Checked out {} into {}",
                    commit_oid.to_short_oid(),
                    workspace.path().display()
                )?;
            }
            _ => {
                self.checkout_worktree(&revision, &commit_oid, commit.tree_oid(), force)
                    .await?
            }
        }

        Ok(())
    }

    async fn checkout_worktree(
        &self,
        revision: &Revision,
        commit_oid: &ObjectId,
        tree_oid: &ObjectId,
        force: bool,
    ) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        let head = match self.head_tree_oid()? {
            Some(head_tree) => self.database().tree_entries(&head_tree)?,
            None => TreeEntries::new(),
        };
        let tracked = index.entries().cloned().collect::<Vec<_>>();
        let entries = Materializer::new(self.database(), self.workspace(), head, tracked, force)
            .checkout(tree_oid)?;

        index.reset(entries)?;
        index.save()?;

        let current_branch = self.refs().current_branch()?;
        // HEAD and @ name the branch they point to
        let target_branch = match revision.ref_name(self) {
            Some(name) => Some(self.refs().resolve_symbolic(&name)?),
            None => None,
        };
        match target_branch.filter(|name| name.is_branch()) {
            Some(branch) if current_branch.as_ref() == Some(&branch) => {
                writeln!(self.writer(), "Already on '{}'", branch.short_name())?;
            }
            Some(branch) => {
                self.refs().set_head_branch(&branch)?;
                writeln!(
                    self.writer(),
                    "Switched to branch '{}'",
                    branch.short_name()
                )?;
            }
            None => {
                self.refs().detach_head(commit_oid)?;
                if current_branch.is_some() {
                    eprintln!("{DETACHMENT_NOTICE}");
                }
                let commit = self.database().get_commit(commit_oid)?;
                writeln!(
                    self.writer(),
                    "HEAD is now at {} {}",
                    commit_oid.to_short_oid(),
                    commit.short_message()
                )?;
            }
        }

        Ok(())
    }
}
