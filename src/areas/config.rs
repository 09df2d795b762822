//! Repository configuration (`.got/config`)
//!
//! ```text
//! [core]
//! repositoryformatversion = 0
//! filemode = false
//! bare = false
//!
//! [user]
//! name = "A. U. Thor"
//! email = "author@example.com"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_FORMAT_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub core: Core,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Core {
    pub repositoryformatversion: u32,
    #[serde(default)]
    pub filemode: bool,
    #[serde(default)]
    pub bare: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            core: Core {
                repositoryformatversion: SUPPORTED_FORMAT_VERSION,
                filemode: false,
                bare: false,
            },
            user: None,
        }
    }
}

impl Config {
    /// Read and validate a config file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if config.core.repositoryformatversion != SUPPORTED_FORMAT_VERSION {
            anyhow::bail!(
                "Unsupported repositoryformatversion {}",
                config.core.repositoryformatversion
            );
        }

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string(self).context("Unable to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Unable to write config file {}", path.display()))
    }
}
