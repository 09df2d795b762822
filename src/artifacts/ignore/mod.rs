//! Ignore rules
//!
//! Rules come from `.got/info/exclude` (repository-wide) and `.gotignore` files (scoped
//! to the directory containing them). Later rules override earlier ones and deeper
//! `.gotignore` files are read after shallower ones, so the most specific rule wins.
//!
//! Pattern syntax:
//! - blank lines and lines starting with `#` are skipped
//! - `!pattern` re-includes paths matched by an earlier rule
//! - a leading `/` anchors the pattern to the rule's directory
//! - a trailing `/` only matches directories
//! - patterns without `/` match the basename at any depth below the rule's directory
//!
//! The repository data directory is always ignored.

use anyhow::Context;
use glob::{MatchOptions, Pattern};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const IGNORE_FILE_NAME: &str = ".gotignore";
pub const DATA_DIR_NAME: &str = ".got";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnoreRule {
    /// Directory the rule applies to, relative to the worktree
    base: PathBuf,
    pattern: Pattern,
    negated: bool,
    dir_only: bool,
    /// Match against the whole path below `base` instead of the basename
    anchored: bool,
}

impl IgnoreRule {
    fn parse(base: &Path, line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (dir_only, line) = match line.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (anchored, line) = match line.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (line.contains('/'), line),
        };
        if line.is_empty() {
            return Ok(None);
        }

        let pattern =
            Pattern::new(line).with_context(|| format!("invalid ignore pattern '{line}'"))?;

        Ok(Some(IgnoreRule {
            base: base.to_path_buf(),
            pattern,
            negated,
            dir_only,
            anchored,
        }))
    }

    fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        let Ok(relative) = path.strip_prefix(&self.base) else {
            return false;
        };

        if self.anchored {
            relative
                .to_str()
                .is_some_and(|relative| self.pattern.matches_with(relative, MATCH_OPTIONS))
        } else {
            relative
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.pattern.matches_with(name, MATCH_OPTIONS))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// Collect the exclude file and every `.gotignore` below the worktree
    pub fn load(worktree: &Path, exclude_file: &Path) -> anyhow::Result<Self> {
        let mut rules = IgnoreRules::default();

        if exclude_file.is_file() {
            let content = std::fs::read_to_string(exclude_file).with_context(|| {
                format!("Unable to read exclude file {}", exclude_file.display())
            })?;
            rules.add_rules(Path::new(""), &content)?;
        }

        let mut ignore_files = WalkDir::new(worktree)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != DATA_DIR_NAME)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == IGNORE_FILE_NAME)
            .map(|entry| entry.into_path())
            .collect::<Vec<_>>();
        ignore_files.sort_by_key(|path| path.components().count());

        for ignore_file in ignore_files {
            let base = ignore_file
                .parent()
                .and_then(|dir| dir.strip_prefix(worktree).ok())
                .unwrap_or(Path::new(""))
                .to_path_buf();
            let content = std::fs::read_to_string(&ignore_file).with_context(|| {
                format!("Unable to read ignore file {}", ignore_file.display())
            })?;
            rules.add_rules(&base, &content)?;
        }

        tracing::trace!(rules = rules.rules.len(), "loaded ignore rules");
        Ok(rules)
    }

    /// Append the rules of one ignore file scoped to `base`
    pub fn add_rules(&mut self, base: &Path, content: &str) -> anyhow::Result<()> {
        for line in content.lines() {
            if let Some(rule) = IgnoreRule::parse(base, line)? {
                self.rules.push(rule);
            }
        }

        Ok(())
    }

    /// Whether a worktree-relative path is ignored
    ///
    /// A path inside an ignored directory is ignored as well.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if path
            .components()
            .any(|component| component == Component::Normal(OsStr::new(DATA_DIR_NAME)))
        {
            return true;
        }

        let mut ancestors = path
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        ancestors.reverse();

        ancestors.into_iter().any(|dir| self.matched(dir, true)) || self.matched(path, is_dir)
    }

    fn matched(&self, path: &Path, is_dir: bool) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(path, is_dir))
            .is_some_and(|rule| !rule.negated)
    }
}
