use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::{PeelTarget, Revision, peel};
use std::io::Write;

impl Repository {
    /// Print the object `object` names, peeled to `kind`
    ///
    /// Blob content is written byte for byte; trees are listed one entry per line.
    #[tracing::instrument(skip(self))]
    pub fn cat_file(&self, kind: &str, object: &str) -> anyhow::Result<()> {
        let kind = ObjectType::try_from(kind)?;
        let oid = Revision::try_parse(object)?.resolve(self)?;
        let oid = peel(self.database(), &oid, PeelTarget::Kind(kind))?;

        match self.database().get(&oid)? {
            ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
            ObjectBox::Tree(tree) if tree.is_empty() => {}
            ObjectBox::Tree(tree) => writeln!(self.writer(), "{}", tree.display())?,
            other => write!(self.writer(), "{}", other.display())?,
        }

        Ok(())
    }
}
