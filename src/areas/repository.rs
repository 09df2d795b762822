//! Repository handle
//!
//! Ties the persisted areas of one repository together: the object database, the
//! references, the index, the working tree and the config. Commands are implemented
//! as `impl Repository` blocks under `commands/` and write their output to
//! [`Repository::writer`].

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::ignore::{DATA_DIR_NAME, IgnoreRules};
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CONFIG_FILE: &str = "config";
pub const INDEX_FILE: &str = "index";
pub const OBJECTS_DIR: &str = "objects";
pub const EXCLUDE_FILE: &str = "info/exclude";

pub struct Repository {
    /// Working tree root
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: Config,
}

impl Repository {
    /// Handle for the repository rooted at `path`, whether or not `.got` exists yet
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let got_dir = path.join(DATA_DIR_NAME);

        let index = Index::new(got_dir.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(got_dir.join(OBJECTS_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(got_dir.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            config: Config::default(),
        })
    }

    /// Open the repository containing `start`, searching parent directories for `.got`
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = start.canonicalize()?;
        let root = start
            .ancestors()
            .find(|dir| dir.join(DATA_DIR_NAME).is_dir())
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                anyhow::anyhow!("not a got repository (or any of the parent directories): {DATA_DIR_NAME}")
            })?;

        let mut repository = Self::new(&root, writer)?;
        repository.config = Config::load(&repository.got_path().join(CONFIG_FILE))?;
        tracing::debug!(path = %repository.path.display(), "opened repository");

        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.got` data directory
    pub fn got_path(&self) -> PathBuf {
        self.path.join(DATA_DIR_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Root tree of the commit HEAD points to, None before the first commit
    pub fn head_tree_oid(&self) -> anyhow::Result<Option<ObjectId>> {
        self.refs
            .head_oid()?
            .map(|oid| Ok(self.database.get_commit(&oid)?.tree_oid().clone()))
            .transpose()
    }

    /// Ignore rules from `.got/info/exclude` and every `.gotignore` in the worktree
    pub fn ignore_rules(&self) -> anyhow::Result<IgnoreRules> {
        IgnoreRules::load(&self.path, &self.got_path().join(EXCLUDE_FILE))
    }
}
