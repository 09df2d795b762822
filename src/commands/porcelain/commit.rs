use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use std::io::Write;

impl Repository {
    #[tracing::instrument(skip(self, message))]
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let tree_id = self.build_index_tree().await?;

        let parent = self.refs().head_oid()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = Author::load_from_env(self.config())?;
        let message = format!("{}\n", message.trim());

        let commit = Commit::new(parent.into_iter().collect(), tree_id, author, message);
        let commit_id = self.database().put(&commit)?;
        self.refs().update_head(&commit_id)?;

        let branch = match self.refs().current_branch()? {
            Some(branch) => branch.short_name().to_string(),
            None => "detached HEAD".to_string(),
        };
        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
