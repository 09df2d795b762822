//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the repository areas into version control workflows.
//!
//! ## Commands
//!
//! - `init`: Create the `.got` directory layout
//! - `add`: Stage files for commit
//! - `rm`: Unstage files and optionally delete them
//! - `commit`: Record the index as a new commit
//! - `status`: Compare HEAD, the index and the working tree
//! - `log`: Show commit history
//! - `checkout`: Materialize a commit into the worktree or another directory
//! - `tag`: List or create tags

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod rm;
pub mod status;
pub mod tag;
