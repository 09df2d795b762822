use crate::areas::repository::Repository;
use crate::errors::GotError;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Unstage paths and, unless `cached`, delete them from the worktree
    ///
    /// A directory removes every staged file below it.
    #[tracing::instrument(skip(self))]
    pub async fn rm(&mut self, paths: &[String], cached: bool) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        let mut targets = BTreeSet::new();
        for path in paths {
            let relative = self.workspace().relative_path(Path::new(path))?;
            let staged = index.entries_under_path(&relative);
            if staged.is_empty() {
                return Err(GotError::PathNotStaged { path: relative }.into());
            }
            targets.extend(staged);
        }

        for path in &targets {
            index.unstage(path)?;
        }
        index.save()?;

        for path in &targets {
            if !cached {
                self.workspace().remove_file(path)?;
            }
            writeln!(self.writer(), "rm '{}'", path.display())?;
        }

        Ok(())
    }
}
