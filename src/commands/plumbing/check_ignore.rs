use crate::areas::repository::Repository;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Echo back each of `paths` that the ignore rules exclude
    #[tracing::instrument(skip(self))]
    pub fn check_ignore(&self, paths: &[String]) -> anyhow::Result<()> {
        let ignore = self.ignore_rules()?;

        for path in paths {
            let relative = self.workspace().relative_path(Path::new(path))?;
            let is_dir = self.workspace().is_dir(&relative);

            if ignore.is_ignored(&relative, is_dir) {
                writeln!(self.writer(), "{path}")?;
            }
        }

        Ok(())
    }
}
