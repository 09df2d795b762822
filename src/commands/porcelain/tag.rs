use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::revision::ref_name::{RefName, TAGS_PREFIX};
use crate::artifacts::revision::revision::Revision;
use std::io::Write;

impl Repository {
    /// List tags when `name` is None; otherwise create a tag at `target` (HEAD by default)
    ///
    /// An annotated tag writes a tag object and the reference points to it. A message
    /// implies `annotate`; `annotate` without a message fails.
    #[tracing::instrument(skip(self, message))]
    pub fn tag(
        &self,
        name: Option<&str>,
        target: Option<&str>,
        annotate: bool,
        message: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(name) = name else {
            for tag in self.refs().list(TAGS_PREFIX)? {
                writeln!(self.writer(), "{}", tag.short_name())?;
            }
            return Ok(());
        };

        if annotate && message.is_none() {
            anyhow::bail!("annotated tag '{name}' needs a message");
        }

        let ref_name = RefName::tag(name)?;
        if self.refs().exists(&ref_name) {
            anyhow::bail!("tag '{name}' already exists");
        }

        let target_oid = Revision::try_parse(target.unwrap_or("HEAD"))?.resolve(self)?;

        let oid = match message {
            Some(message) => {
                let tagger = Author::load_from_env(self.config())?;
                let tag = Tag::new(
                    target_oid.clone(),
                    self.database().object_type(&target_oid)?,
                    name.to_string(),
                    tagger,
                    format!("{}\n", message.trim()),
                );
                self.database().put(&tag)?
            }
            None => target_oid,
        };

        self.refs().write(&ref_name, &oid)
    }
}
