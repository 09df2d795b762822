//! Error kinds raised by the storage core
//!
//! Every fallible operation in the crate returns `anyhow::Result`. The kinds below are
//! raised as [`GotError`] values and converted into `anyhow::Error`, so callers (and the
//! CLI) can recover the exact kind with `downcast_ref::<GotError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GotError {
    #[error("object {oid} not found")]
    ObjectNotFound { oid: String },

    #[error("malformed object {oid}: {reason}")]
    MalformedObject { oid: String, reason: String },

    #[error("short object id {prefix} is ambiguous\nhint: The candidates are:\n{}", candidates.iter().map(|c| format!("hint:   {c}")).collect::<Vec<_>>().join("\n"))]
    AmbiguousHash {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("reference {name} not found")]
    ReferenceNotFound { name: String },

    #[error("reference {name} is nested too deeply (possible cycle)")]
    ReferenceCycle { name: String },

    #[error("reference {name} points to missing object {oid}")]
    DanglingReference { name: String, oid: String },

    #[error("invalid revision syntax: '{spec}'")]
    InvalidRevisionSyntax { spec: String },

    #[error("object {oid} is a {kind}, not a commit")]
    NotACommit { oid: String, kind: String },

    #[error("commit {oid} has no parent")]
    NoParent { oid: String },

    #[error("object {oid} cannot be peeled to a {wanted}")]
    WrongKind { oid: String, wanted: String },

    #[error("pathspec '{}' did not match any staged file", path.display())]
    PathNotStaged { path: PathBuf },

    #[error("checkout would overwrite local changes or untracked files:\n{}", paths.iter().map(|p| format!("\t{}", p.display())).collect::<Vec<_>>().join("\n"))]
    CheckoutConflict { paths: Vec<PathBuf> },
}

impl GotError {
    pub fn malformed(oid: impl ToString, reason: impl Into<String>) -> Self {
        GotError::MalformedObject {
            oid: oid.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status reported for this kind.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Look for a core error kind anywhere in an `anyhow` chain.
pub fn error_kind(error: &anyhow::Error) -> Option<&GotError> {
    error.chain().find_map(|cause| cause.downcast_ref::<GotError>())
}
