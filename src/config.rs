use serde::Deserialize;

use crate::registry::{Registry, Source};

/// Feed table compiled into the binary.
const BUILTIN_FEEDS: &str = include_str!("../feeds.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Name shown before "Daily Dashboard" in the masthead
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Address the host server binds to
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

fn default_owner() -> String {
    "My".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    pub label: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Config {
    /// The feed table shipped with the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_str(BUILTIN_FEEDS)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn registry(&self) -> Registry {
        Registry::new(
            self.categories
                .iter()
                .map(|c| (c.label.clone(), c.sources.clone())),
        )
    }
}
