use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::{PeelTarget, Revision, peel};
use colored::Colorize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub oneline: bool,
    pub name_status: bool,
}

impl Repository {
    #[tracing::instrument(skip(self, opts))]
    pub fn log(&self, revision: Option<&str>, opts: &LogOptions) -> anyhow::Result<()> {
        let start = match revision {
            Some(revision) => Revision::try_parse(revision)?.resolve(self)?,
            None => self.refs().head_oid()?.ok_or_else(|| {
                anyhow::anyhow!("your current branch does not have any commits yet")
            })?,
        };
        let start = peel(self.database(), &start, PeelTarget::Kind(ObjectType::Commit))?;

        for item in RevList::new(self.database(), [start])? {
            let (oid, commit) = item?;
            self.display_commit(&oid, &commit, opts)?;
        }

        Ok(())
    }

    pub fn display_commit(
        &self,
        oid: &ObjectId,
        commit: &Commit,
        opts: &LogOptions,
    ) -> anyhow::Result<()> {
        if opts.oneline {
            writeln!(
                self.writer(),
                "{} {}",
                oid.to_short_oid().yellow(),
                commit.short_message()
            )?;
        } else {
            self.show_commit_medium(oid, commit)?;
        }

        if opts.name_status {
            if !opts.oneline {
                writeln!(self.writer())?;
            }
            self.show_name_status(oid, commit)?;
        }
        if !opts.oneline {
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        if commit.parents().len() > 1 {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer(), "Merge: {parents}")?;
        }
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {message_line}")?;
        }

        Ok(())
    }

    /// Blob-level changes against the first parent
    fn show_name_status(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        for change in self.database().tree_diff(commit.parent(), Some(oid))? {
            writeln!(
                self.writer(),
                "{}\t{}",
                change.change.status_char(),
                change.path.display()
            )?;
        }

        Ok(())
    }
}

