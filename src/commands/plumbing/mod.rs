//! Plumbing commands (low-level operations)
//!
//! Plumbing commands give direct access to objects, references and the index.
//! They are meant for scripting and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `cat-file`: Print an object's content
//! - `hash-object`: Compute an object id and optionally store the object
//! - `ls-tree`: List the contents of a tree
//! - `ls-files`: List staged paths
//! - `rev-parse`: Resolve a revision expression
//! - `show-ref`: List references
//! - `check-ignore`: Report which paths are ignored
//! - `write-tree`: Store the index as tree objects

pub mod cat_file;
pub mod check_ignore;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
pub mod write_tree;
