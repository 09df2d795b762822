//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `config`: Repository configuration (`.got/config`)
//! - `database`: Object database for storing blobs, trees, commits and tags
//! - `index`: Staging area for tracking file changes
//! - `refs`: Reference management (branches, tags, HEAD)
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
