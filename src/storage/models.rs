use serde::{Deserialize, Serialize};

use crate::types::{NodePath, PropertyMap};

/// One physical contribution to a merged node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub path: NodePath,
    pub properties: PropertyMap,
}

impl Layer {
    pub fn new(path: impl Into<NodePath>, properties: PropertyMap) -> Self {
        Self { path: path.into(), properties }
    }
}

/// A node as held by the storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalNode {
    pub path: NodePath,
    pub node_type: String,
    pub properties: PropertyMap,
}

impl PhysicalNode {
    pub fn new(path: impl Into<NodePath>, node_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            node_type: node_type.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// View this node as a layer of a merge.
    pub fn to_layer(&self) -> Layer {
        Layer { path: self.path.clone(), properties: self.properties.clone() }
    }
}
