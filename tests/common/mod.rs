//! Shared fixtures: an in-memory store and a layer lookup that walks the
//! search roots in order.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use overlay_merge::merge::path::{join, relative_to};
use overlay_merge::storage::{Layer, LayerLookup, MemoryStore, NodeStore, PhysicalNode};
use overlay_merge::types::PropertyMap;
use serde_json::Value;

pub const MERGED_ROOT: &str = "/mnt/overlay";

pub struct SearchRootLookup {
    pub store: MemoryStore,
    pub roots: Vec<String>,
}

#[async_trait]
impl LayerLookup for SearchRootLookup {
    async fn lookup(&self, logical_path: &str) -> Result<Vec<Layer>> {
        let relative = relative_to(logical_path, MERGED_ROOT)
            .ok_or_else(|| anyhow!("{logical_path} is outside {MERGED_ROOT}"))?;

        let mut layers = Vec::new();
        for root in &self.roots {
            if let Some(node) = self.store.get_node(&join(root, relative)).await? {
                layers.push(node.to_layer());
            }
        }
        Ok(layers)
    }
}

pub fn props(entries: &[(&str, Value)]) -> PropertyMap {
    entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub async fn put(store: &MemoryStore, path: &str, node_type: &str, entries: &[(&str, Value)]) {
    store
        .insert(PhysicalNode::new(path, node_type).with_properties(props(entries)))
        .await
        .expect("insert node");
}

pub fn roots(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}
