use crate::artifacts::revision::INVALID_REF_NAME_REGEX;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub const HEAD: &str = "HEAD";
pub const REFS_PREFIX: &str = "refs/";
pub const HEADS_PREFIX: &str = "refs/heads/";
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Full name of a reference, relative to the repository data directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        if name != HEAD && !name.starts_with(REFS_PREFIX) {
            anyhow::bail!("reference name must be HEAD or start with '{REFS_PREFIX}': {name}");
        }
        validate(&name)?;

        Ok(Self(name))
    }

    pub fn head() -> Self {
        Self(HEAD.to_string())
    }

    /// `refs/heads/<name>` for a short branch name
    pub fn branch(name: &str) -> anyhow::Result<Self> {
        validate(name)?;
        Ok(Self(format!("{HEADS_PREFIX}{name}")))
    }

    /// `refs/tags/<name>` for a short tag name
    pub fn tag(name: &str) -> anyhow::Result<Self> {
        validate(name)?;
        Ok(Self(format!("{TAGS_PREFIX}{name}")))
    }

    pub fn is_head(&self) -> bool {
        self.0 == HEAD
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with(HEADS_PREFIX)
    }

    /// Name without its `refs/heads/` or `refs/tags/` namespace
    pub fn short_name(&self) -> &str {
        self.0
            .strip_prefix(HEADS_PREFIX)
            .or_else(|| self.0.strip_prefix(TAGS_PREFIX))
            .unwrap_or(&self.0)
    }

    /// Location of the reference file below `root`
    pub fn to_path(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// Full names a short user-supplied name may refer to, in lookup order
    pub fn candidates(name: &str) -> Vec<RefName> {
        if validate(name).is_err() {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        if name == HEAD || name.starts_with(REFS_PREFIX) {
            candidates.push(Self(name.to_string()));
        }
        candidates.extend(
            [REFS_PREFIX, TAGS_PREFIX, HEADS_PREFIX]
                .into_iter()
                .map(|prefix| Self(format!("{prefix}{name}"))),
        );

        candidates
    }
}

fn validate(name: &str) -> anyhow::Result<()> {
    if name.is_empty() {
        anyhow::bail!("reference name cannot be empty");
    }

    let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
        .with_context(|| format!("invalid ref name regex: {INVALID_REF_NAME_REGEX}"))?;

    if re.is_match(name) {
        anyhow::bail!("invalid reference name: {name}");
    }

    Ok(())
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
