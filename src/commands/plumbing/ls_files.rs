use crate::areas::repository::Repository;
use chrono::DateTime;
use std::io::Write;

impl Repository {
    /// List staged paths; `verbose` adds mode, object id, stage, size and mtime
    #[tracing::instrument(skip(self))]
    pub async fn ls_files(&self, verbose: bool) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        for entry in index.entries() {
            if !verbose {
                writeln!(self.writer(), "{}", entry.name.display())?;
                continue;
            }

            let mtime = DateTime::from_timestamp(
                entry.metadata.mtime as i64,
                entry.metadata.mtime_nsec,
            )
            .map(|mtime| mtime.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

            writeln!(
                self.writer(),
                "{} {} {} {:>8} {}\t{}",
                entry.metadata.mode,
                entry.oid,
                entry.stage(),
                entry.metadata.size,
                mtime,
                entry.name.display()
            )?;
        }

        Ok(())
    }
}
