use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::{ChangeSet, FileSet, Status, StatusInfo};
use colored::Colorize;
use std::io::Write;

impl Repository {
    #[tracing::instrument(skip(self))]
    pub async fn status(&mut self, porcelain: bool) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        let status = Status::new(self).initialize(&mut index)?;

        if index.is_changed() {
            index.save()?;
        }

        if porcelain {
            self.print_porcelain(&status)
        } else {
            self.print_long_format(&status)
        }
    }

    fn print_porcelain(&self, status: &StatusInfo) -> anyhow::Result<()> {
        for (path, change) in &status.changed_files {
            writeln!(self.writer(), "{change} {}", path.display())?;
        }
        for path in &status.untracked_files {
            writeln!(self.writer(), "?? {}", path.display())?;
        }

        Ok(())
    }

    fn print_long_format(&self, status: &StatusInfo) -> anyhow::Result<()> {
        match self.refs().current_branch()? {
            Some(branch) => writeln!(self.writer(), "On branch {}", branch.short_name())?,
            None => match self.refs().head_oid()? {
                Some(oid) => writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?,
                None => writeln!(self.writer(), "Not currently on any branch.")?,
            },
        }
        if self.refs().head_oid()?.is_none() {
            writeln!(self.writer(), "\nNo commits yet")?;
        }

        self.print_changeset("Changes to be committed:", &status.index_changeset)?;
        self.print_changeset("Changes not staged for commit:", &status.workspace_changeset)?;
        self.print_untracked(&status.untracked_files)?;

        if status.is_clean() {
            writeln!(self.writer(), "\nnothing to commit, working tree clean")?;
        } else if status.changed_files.is_empty() {
            writeln!(
                self.writer(),
                "\nnothing added to commit but untracked files present"
            )?;
        } else if status.index_changeset.is_empty() {
            writeln!(
                self.writer(),
                "\nno changes added to commit (use \"got add\" to track)"
            )?;
        }

        Ok(())
    }

    fn print_changeset(&self, header: &str, changeset: &ChangeSet) -> anyhow::Result<()> {
        if changeset.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "\n{header}")?;
        for (path, change) in changeset {
            let path = match change {
                FileChangeType::Index(_) => path.display().to_string().green(),
                FileChangeType::Workspace(_) => path.display().to_string().red(),
            };
            writeln!(self.writer(), "{change}{path}")?;
        }

        Ok(())
    }

    fn print_untracked(&self, untracked_files: &FileSet) -> anyhow::Result<()> {
        if untracked_files.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "\nUntracked files:")?;
        for path in untracked_files {
            writeln!(self.writer(), "{:>8}{}", "", path.display().to_string().red())?;
        }

        Ok(())
    }
}
