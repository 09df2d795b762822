use crate::areas::repository::Repository;
use crate::artifacts::revision::ref_name::REFS_PREFIX;
use std::io::Write;

impl Repository {
    /// Print `<oid> <name>` for every reference under `refs/`
    #[tracing::instrument(skip(self))]
    pub fn show_ref(&self) -> anyhow::Result<()> {
        for name in self.refs().list(REFS_PREFIX)? {
            let oid = self.refs().read(&name)?;
            writeln!(self.writer(), "{oid} {name}")?;
        }

        Ok(())
    }
}
