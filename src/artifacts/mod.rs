//! Data structures and algorithms
//!
//! - `checkout`: Materializing a tree into a directory with conflict detection
//! - `core`: Shared utilities (lockfile)
//! - `database`: Database entry types
//! - `diff`: Tree-to-tree comparison
//! - `ignore`: Ignore rules for working tree scans
//! - `index`: Index/staging area data structures
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit, tag) and their codec
//! - `revision`: Reference names and revision expressions
//! - `status`: Working tree status inspection

pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod ignore;
pub mod index;
pub mod log;
pub mod objects;
pub mod revision;
pub mod status;
