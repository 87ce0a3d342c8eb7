use anyhow::Result;
use async_trait::async_trait;
#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

use crate::types::{PropertyMap, PropertyValue};

use super::models::{Layer, PhysicalNode};

/// Locates the physical layers behind a logical path.
#[cfg_attr(any(test, feature = "mockall"), automock)]
#[async_trait]
pub trait LayerLookup: Send + Sync {
    /// Layers at `logical_path`, least specific first. Empty when nothing
    /// contributes.
    async fn lookup(&self, logical_path: &str) -> Result<Vec<Layer>>;
}

/// Supplies the configured search roots, least specific first.
#[cfg_attr(any(test, feature = "mockall"), automock)]
#[async_trait]
pub trait SearchPathProvider: Send + Sync {
    async fn search_paths(&self) -> Result<Vec<String>>;
}

#[cfg_attr(any(test, feature = "mockall"), automock)]
#[async_trait]
pub trait NodeStore: Send + Sync {
    async fn get_node(&self, path: &str) -> Result<Option<PhysicalNode>>;

    /// Return the node at `path`, creating it (and any missing ancestors)
    /// with `node_type` when absent. Idempotent.
    async fn ensure_node(&self, path: &str, node_type: &str) -> Result<PhysicalNode>;
}

#[cfg_attr(any(test, feature = "mockall"), automock)]
#[async_trait]
pub trait WritableAdapter: Send + Sync {
    /// Mutable handle on `node`, or `None` if the node cannot be mutated.
    async fn writable(&self, node: &PhysicalNode) -> Result<Option<Box<dyn WritableProperties>>>;
}

/// Mutable property map of exactly one physical node.
#[async_trait]
pub trait WritableProperties: Send + Sync {
    fn path(&self) -> &str;
    async fn get(&self, key: &str) -> Result<Option<PropertyValue>>;
    /// Returns the previous value.
    async fn set(&self, key: &str, value: PropertyValue) -> Result<Option<PropertyValue>>;
    async fn remove(&self, key: &str) -> Result<Option<PropertyValue>>;
    async fn snapshot(&self) -> Result<PropertyMap>;
}
