use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::merge::DEFAULT_TYPE_PROPERTY;
use crate::storage::SearchPathProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub merge: MergeConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Logical root under which merged nodes live.
    pub merged_root: String,
    /// Property that declares a node's type.
    pub type_property: String,
    /// Honor `hideProperties` directives when merging layers.
    pub honor_hide_directives: bool,
}

/// Search roots, least specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub json: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("config")
    }

    /// Load from an optional file (any format the `config` crate knows,
    /// extension may be omitted) layered under `OVERLAY_MERGE__*` variables.
    pub fn load_from(file: &str) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Config::default())?;
        let config = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("OVERLAY_MERGE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.paths")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            merge: MergeConfig::default(),
            search: SearchConfig::default(),
            logging: LoggingConfig {
                filter: "overlay_merge=debug,info".to_string(),
                json: false,
            },
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            merged_root: "/mnt/overlay".to_string(),
            type_property: DEFAULT_TYPE_PROPERTY.to_string(),
            honor_hide_directives: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { paths: vec!["/libs".to_string(), "/apps".to_string()] }
    }
}

#[async_trait]
impl SearchPathProvider for SearchConfig {
    async fn search_paths(&self) -> Result<Vec<String>> {
        Ok(self.paths.clone())
    }
}
