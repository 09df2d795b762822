use crate::areas::repository::Repository;
use std::path::Path;

impl Repository {
    #[tracing::instrument(skip(self))]
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let ignore = self.ignore_rules()?;

        // Expand directories before touching the index, so a bad pathspec stages nothing
        let mut files = Vec::new();
        for path in paths {
            let relative = self.workspace().relative_path(Path::new(path))?;
            let root = (!relative.as_os_str().is_empty()).then_some(relative.as_path());
            files.extend(self.workspace().list_files(root, &ignore)?);
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        for path in files {
            let data = self.workspace().read_file(&path)?;
            let stat = self.workspace().stat_file(&path)?;

            index.stage(self.database(), &path, data, stat)?;
        }

        index.save()?;

        Ok(())
    }
}
