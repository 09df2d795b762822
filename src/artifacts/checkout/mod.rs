//! Checkout
//!
//! Materializes a tree into a directory. All conflicts are detected before the
//! first write, so a refused checkout leaves the directory exactly as it was.

pub mod materializer;
