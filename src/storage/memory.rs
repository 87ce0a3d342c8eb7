//! In-memory node store.
//!
//! Holds physical nodes keyed by normalized path and hands out writable
//! handles that mutate them in place. Used to drive the merge core without a
//! real backend.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::merge::path::{normalize_path, parent};
use crate::types::{PropertyMap, PropertyValue};

use super::models::PhysicalNode;
use super::traits::{NodeStore, WritableAdapter, WritableProperties};

/// Type given to ancestors created implicitly by `ensure_node`.
pub const INTERMEDIATE_NODE_TYPE: &str = "container";

type Nodes = Arc<RwLock<BTreeMap<String, PhysicalNode>>>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    nodes: Nodes,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that serves reads but rejects creation and mutation.
    pub fn read_only() -> Self {
        Self { nodes: Nodes::default(), read_only: true }
    }

    /// Insert or replace a node, bypassing the read-only flag.
    pub async fn insert(&self, mut node: PhysicalNode) -> Result<()> {
        node.path = normalize_path(&node.path)?;
        self.nodes.write().await.insert(node.path.clone(), node);
        Ok(())
    }

    pub async fn contains(&self, path: &str) -> bool {
        match normalize_path(path) {
            Ok(path) => self.nodes.read().await.contains_key(&path),
            Err(_) => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    async fn get_node(&self, path: &str) -> Result<Option<PhysicalNode>> {
        let path = normalize_path(path)?;
        Ok(self.nodes.read().await.get(&path).cloned())
    }

    async fn ensure_node(&self, path: &str, node_type: &str) -> Result<PhysicalNode> {
        let path = normalize_path(path)?;
        let mut nodes = self.nodes.write().await;

        if let Some(existing) = nodes.get(&path) {
            return Ok(existing.clone());
        }

        if self.read_only {
            bail!("Cannot create {path}: store is read-only");
        }

        let mut missing = Vec::new();
        let mut cursor = parent(&path);
        while let Some(ancestor) = cursor {
            if ancestor == "/" || nodes.contains_key(&ancestor) {
                break;
            }
            cursor = parent(&ancestor);
            missing.push(ancestor);
        }
        for ancestor in missing.into_iter().rev() {
            debug!(path = %ancestor, "Creating intermediate node");
            nodes.insert(ancestor.clone(), PhysicalNode::new(ancestor, INTERMEDIATE_NODE_TYPE));
        }

        debug!(path = %path, node_type, "Creating node");
        let node = PhysicalNode::new(path.clone(), node_type);
        nodes.insert(path, node.clone());
        Ok(node)
    }
}

#[async_trait]
impl WritableAdapter for MemoryStore {
    async fn writable(&self, node: &PhysicalNode) -> Result<Option<Box<dyn WritableProperties>>> {
        if self.read_only {
            return Ok(None);
        }

        let path = normalize_path(&node.path)?;
        if !self.nodes.read().await.contains_key(&path) {
            return Ok(None);
        }

        Ok(Some(Box::new(MemoryHandle { nodes: Arc::clone(&self.nodes), path })))
    }
}

/// Writable handle on one node of a [`MemoryStore`].
struct MemoryHandle {
    nodes: Nodes,
    path: String,
}

#[async_trait]
impl WritableProperties for MemoryHandle {
    fn path(&self) -> &str {
        &self.path
    }

    async fn get(&self, key: &str) -> Result<Option<PropertyValue>> {
        let nodes = self.nodes.read().await;
        let node = nodes.get(&self.path).ok_or_else(|| anyhow!("Node removed: {}", self.path))?;
        Ok(node.properties.get(key).cloned())
    }

    async fn set(&self, key: &str, value: PropertyValue) -> Result<Option<PropertyValue>> {
        let mut nodes = self.nodes.write().await;
        let node =
            nodes.get_mut(&self.path).ok_or_else(|| anyhow!("Node removed: {}", self.path))?;
        Ok(node.properties.insert(key.to_string(), value))
    }

    async fn remove(&self, key: &str) -> Result<Option<PropertyValue>> {
        let mut nodes = self.nodes.write().await;
        let node =
            nodes.get_mut(&self.path).ok_or_else(|| anyhow!("Node removed: {}", self.path))?;
        Ok(node.properties.remove(key))
    }

    async fn snapshot(&self) -> Result<PropertyMap> {
        let nodes = self.nodes.read().await;
        let node = nodes.get(&self.path).ok_or_else(|| anyhow!("Node removed: {}", self.path))?;
        Ok(node.properties.clone())
    }
}
