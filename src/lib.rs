//! got: a small content-addressable version control system
//!
//! - `areas`: persisted state of a repository (objects, refs, index, worktree, config)
//! - `artifacts`: the data structures and algorithms working on that state
//! - `commands`: plumbing and porcelain commands as `impl Repository` blocks

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
pub mod telemetry;
