use std::sync::Arc;
use tracing::debug;

use crate::config::MergeConfig;
use crate::merge::error::MergeResult;
use crate::merge::node::MergedNode;
use crate::merge::path::{join, normalize_path, normalize_relative};
use crate::storage::LayerLookup;

/// Builds merged nodes below the configured merged root from the layers a
/// [`LayerLookup`] reports.
pub struct MergeResolver {
    lookup: Arc<dyn LayerLookup>,
    config: MergeConfig,
}

impl MergeResolver {
    pub fn new(lookup: Arc<dyn LayerLookup>, config: MergeConfig) -> MergeResult<Self> {
        let merged_root = normalize_path(&config.merged_root)?;
        Ok(Self { lookup, config: MergeConfig { merged_root, ..config } })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Resolve the node at `relative_path`. `Ok(None)` when no layer
    /// contributes to it.
    pub async fn resolve(&self, relative_path: &str) -> MergeResult<Option<MergedNode>> {
        let relative = normalize_relative(relative_path)?;
        let logical_path = join(&self.config.merged_root, &relative);

        let layers = self.lookup.lookup(&logical_path).await?;
        if layers.is_empty() {
            debug!(path = %logical_path, "No layers found");
            return Ok(None);
        }

        debug!(path = %logical_path, layers = layers.len(), "Merging layers");
        MergedNode::with_config(&self.config, &relative, layers).map(Some)
    }
}
