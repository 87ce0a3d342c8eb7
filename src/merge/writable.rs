//! Writable-layer resolution.
//!
//! Decides which physical node a mutation of a merged node lands on:
//!
//! - a node with a single layer already under the most specific search root
//!   is written in place when that is the only root; otherwise a node is
//!   ensured under the second most specific root at the same relative offset
//! - any other node is written through its most specific existing layer
//!
//! Resolution is best effort. Storage failures, vanished layers and missing
//! search paths yield `None` and never surface as errors, so reads of the
//! merged node stay unaffected.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::merge::node::MergedNode;
use crate::merge::path::{is_under, join, parent};
use crate::storage::{
    NodeStore, PhysicalNode, SearchPathProvider, WritableAdapter, WritableProperties,
};

pub struct WritableResolver {
    search_paths: Arc<dyn SearchPathProvider>,
    store: Arc<dyn NodeStore>,
    adapter: Arc<dyn WritableAdapter>,
}

impl WritableResolver {
    pub fn new(
        search_paths: Arc<dyn SearchPathProvider>,
        store: Arc<dyn NodeStore>,
        adapter: Arc<dyn WritableAdapter>,
    ) -> Self {
        Self { search_paths, store, adapter }
    }

    /// Mutable handle for `node`, or `None` when no layer can take the write.
    pub async fn resolve(&self, node: &MergedNode) -> Option<Box<dyn WritableProperties>> {
        let search_paths = match self.search_paths.search_paths().await {
            Ok(paths) => paths,
            Err(e) => {
                warn!(path = %node.path(), error = %e, "Search paths unavailable");
                return None;
            }
        };
        let Some(last_root) = search_paths.last() else {
            warn!(path = %node.path(), "No search paths configured");
            return None;
        };

        let provenance = node.provenance();
        if let [only] = provenance
            && is_under(only, last_root)
        {
            if search_paths.len() == 1 {
                debug!(path = %node.path(), layer = %only, "Writing single layer in place");
                return self.writable_at(only).await;
            }
            return self.promote(node, only, &search_paths[search_paths.len() - 2]).await;
        }

        // Provenance is never empty for a constructed node.
        let target = provenance.last()?;
        debug!(path = %node.path(), layer = %target, "Writing most specific layer");
        self.writable_at(target).await
    }

    /// Ensure a node for a single-layer merge under `prefix` and hand out a
    /// handle on it. The container is ensured at the parent of the offset
    /// path and inherits the single layer's type.
    async fn promote(
        &self,
        node: &MergedNode,
        layer_path: &str,
        prefix: &str,
    ) -> Option<Box<dyn WritableProperties>> {
        let source = match self.store.get_node(layer_path).await {
            Ok(Some(source)) => source,
            Ok(None) => {
                debug!(path = %node.path(), layer = %layer_path, "Layer no longer exists");
                return None;
            }
            Err(e) => {
                warn!(path = %node.path(), layer = %layer_path, error = %e, "Failed to read layer");
                return None;
            }
        };

        let create_path = join(prefix, node.relative_path());
        let Some(container_path) = parent(&create_path) else {
            warn!(path = %node.path(), create_path = %create_path, "No parent to create under");
            return None;
        };

        debug!(
            path = %node.path(),
            container = %container_path,
            node_type = %source.node_type,
            "Ensuring copy-on-write layer"
        );
        match self.store.ensure_node(&container_path, &source.node_type).await {
            Ok(created) => self.adapt(&created).await,
            Err(e) => {
                warn!(
                    path = %node.path(),
                    container = %container_path,
                    error = %e,
                    "Failed to create copy-on-write layer"
                );
                None
            }
        }
    }

    async fn writable_at(&self, layer_path: &str) -> Option<Box<dyn WritableProperties>> {
        match self.store.get_node(layer_path).await {
            Ok(Some(physical)) => self.adapt(&physical).await,
            Ok(None) => {
                debug!(layer = %layer_path, "Layer no longer exists");
                None
            }
            Err(e) => {
                warn!(layer = %layer_path, error = %e, "Failed to read layer");
                None
            }
        }
    }

    async fn adapt(&self, physical: &PhysicalNode) -> Option<Box<dyn WritableProperties>> {
        match self.adapter.writable(physical).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(layer = %physical.path, error = %e, "Failed to open writable handle");
                None
            }
        }
    }
}
