use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeBuilder};
use std::io::Write;

impl Repository {
    pub async fn write_tree(&self) -> anyhow::Result<()> {
        let tree_id = self.build_index_tree().await?;
        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }

    /// Store the trees described by the index, children first; returns the root tree id
    pub async fn build_index_tree(&self) -> anyhow::Result<ObjectId> {
        let index = self.index();
        let mut index = index.lock().await;
        index.load()?;

        let builder = TreeBuilder::build(index.entries())?;
        builder.traverse(&mut |tree: &Tree| self.database().put(tree))
    }
}
