use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::{PeelTarget, Revision, peel};
use std::io::Write;
use std::path::Path;

impl Repository {
    /// List the entries of `tree_ish`, descending into subtrees when `recursive`
    #[tracing::instrument(skip(self))]
    pub fn ls_tree(&self, tree_ish: &str, recursive: bool) -> anyhow::Result<()> {
        let oid = Revision::try_parse(tree_ish)?.resolve(self)?;
        let tree_oid = peel(self.database(), &oid, PeelTarget::Kind(ObjectType::Tree))?;

        self.list_tree(&tree_oid, Path::new(""), recursive)
    }

    fn list_tree(&self, oid: &ObjectId, prefix: &Path, recursive: bool) -> anyhow::Result<()> {
        let tree = self.database().get_tree(oid)?;

        for (name, entry) in tree.sorted_entries() {
            let path = prefix.join(name);

            if entry.is_tree() && recursive {
                self.list_tree(&entry.oid, &path, recursive)?;
                continue;
            }

            let kind = match entry.is_tree() {
                true => ObjectType::Tree,
                false => ObjectType::Blob,
            };
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode,
                kind,
                entry.oid,
                path.display()
            )?;
        }

        Ok(())
    }
}
