use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::revision::{PeelTarget, Revision, peel};
use std::io::Write;

impl Repository {
    /// Print the object id `spec` names, peeled to `kind` when given
    #[tracing::instrument(skip(self))]
    pub fn rev_parse(&self, spec: &str, kind: Option<&str>) -> anyhow::Result<()> {
        let mut oid = Revision::try_parse(spec)?.resolve(self)?;

        if let Some(kind) = kind {
            oid = peel(
                self.database(),
                &oid,
                PeelTarget::Kind(ObjectType::try_from(kind)?),
            )?;
        }

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
