use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::codec;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Hash a file as an object of `kind`, storing it when `write` is set
    ///
    /// Non-blob content must parse as an object of that kind.
    #[tracing::instrument(skip(self))]
    pub fn hash_object(&self, object_path: &str, kind: &str, write: bool) -> anyhow::Result<()> {
        let kind = ObjectType::try_from(kind)?;
        let data = std::fs::read(Path::new(object_path))?;

        let object = match kind {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::new(data))),
            kind => codec::decode(&kind.frame(&data))?,
        };

        let object_id = match write {
            true => self.database().put(&object)?,
            false => object.object_id()?,
        };
        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
