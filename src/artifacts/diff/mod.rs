//! Tree comparison
//!
//! - `tree_diff`: which blob paths were added, removed or modified between two trees

pub mod tree_diff;
