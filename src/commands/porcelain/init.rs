use crate::areas::repository::{CONFIG_FILE, EXCLUDE_FILE, Repository};
use crate::artifacts::revision::ref_name::{HEADS_PREFIX, RefName, TAGS_PREFIX};
use anyhow::Context;
use std::fs;
use std::io::Write;

pub const DEFAULT_BRANCH: &str = "master";
const DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

impl Repository {
    #[tracing::instrument(skip(self), fields(path = %self.path().display()))]
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let got_path = self.got_path();
        if got_path.exists() && fs::read_dir(&got_path)?.next().is_some() {
            anyhow::bail!("{} already exists and is not empty", got_path.display());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .got/objects directory")?;
        fs::create_dir_all(got_path.join(HEADS_PREFIX))
            .context("Failed to create .got/refs/heads directory")?;
        fs::create_dir_all(got_path.join(TAGS_PREFIX))
            .context("Failed to create .got/refs/tags directory")?;
        fs::create_dir_all(got_path.join("info")).context("Failed to create .got/info directory")?;

        self.refs()
            .set_head_branch(&RefName::branch(DEFAULT_BRANCH)?)
            .context("Failed to create initial HEAD reference")?;

        self.config()
            .save(&got_path.join(CONFIG_FILE))
            .context("Failed to write .got/config")?;
        fs::write(got_path.join("description"), DESCRIPTION)
            .context("Failed to write .got/description")?;
        fs::write(got_path.join(EXCLUDE_FILE), b"").context("Failed to write .got/info/exclude")?;

        let index = self.index();
        let mut index = index.lock().await;
        index.save().context("Failed to create .got/index file")?;

        writeln!(
            self.writer(),
            "Initialized empty got repository in {}",
            got_path.display()
        )?;

        Ok(())
    }
}
