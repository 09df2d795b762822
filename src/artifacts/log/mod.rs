//! Commit history traversal
//!
//! `rev_list` walks every parent of the starting commits with a priority queue
//! ordered by committer timestamp, so merged histories interleave the way they
//! were committed.

pub mod rev_list;
