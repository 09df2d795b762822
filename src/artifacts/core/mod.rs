//! Shared filesystem utilities
//!
//! - `lockfile`: atomic replace of mutable repository files (index, references)

pub mod lockfile;
