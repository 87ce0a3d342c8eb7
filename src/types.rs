use std::collections::BTreeMap;

/// A property value as stored in a layer.
pub type PropertyValue = serde_json::Value;

/// Key/value properties of one physical node.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Path of a node, physical or logical.
pub type NodePath = String;
