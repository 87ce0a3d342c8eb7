//! Merged node: one logical node backed by an ordered list of physical layers.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::MergeConfig;
use crate::merge::error::{MergeError, MergeResult};
use crate::merge::path::{join, normalize_path, normalize_relative};
use crate::merge::property_view::LayeredPropertyView;
use crate::storage::models::Layer;
use crate::types::PropertyMap;

/// Metadata key flagging a node as merged.
pub const METADATA_MERGED: &str = "overlay.merged";
/// Metadata key listing the contributing physical paths.
pub const METADATA_LAYERS: &str = "overlay.mergedLayers";

/// Type property consulted when none is configured.
pub const DEFAULT_TYPE_PROPERTY: &str = "resourceType";

/// Provenance of a merged node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMetadata {
    pub merged: bool,
    /// Physical paths, least specific first.
    pub provenance: Vec<String>,
}

impl NodeMetadata {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            METADATA_MERGED: self.merged,
            METADATA_LAYERS: self.provenance,
        })
    }
}

/// Immutable snapshot of a merged node.
///
/// Identity is the logical path alone: two nodes built from different layer
/// snapshots at the same path compare equal and hash alike.
#[derive(Debug, Clone)]
pub struct MergedNode {
    path: String,
    merged_root: String,
    node_type: String,
    metadata: NodeMetadata,
    properties: LayeredPropertyView,
}

impl MergedNode {
    /// Build the node at `relative_path` below `merged_root` with the default
    /// merge settings.
    pub fn new(merged_root: &str, relative_path: &str, layers: Vec<Layer>) -> MergeResult<Self> {
        let config = MergeConfig { merged_root: merged_root.to_string(), ..Default::default() };
        Self::with_config(&config, relative_path, layers)
    }

    /// Build the node at `relative_path` below `config.merged_root`.
    ///
    /// `layers` must be ordered least specific first and must not be empty.
    pub fn with_config(
        config: &MergeConfig,
        relative_path: &str,
        layers: Vec<Layer>,
    ) -> MergeResult<Self> {
        let merged_root = normalize_path(&config.merged_root)?;
        let relative = normalize_relative(relative_path)?;
        let path = join(&merged_root, &relative);

        if layers.is_empty() {
            return Err(MergeError::EmptyLayers(path));
        }

        let (provenance, maps): (Vec<_>, Vec<_>) =
            layers.into_iter().map(|layer| (layer.path, layer.properties)).unzip();

        let properties = if config.honor_hide_directives {
            LayeredPropertyView::with_hide_directives(maps)
        } else {
            LayeredPropertyView::new(maps)
        };

        let fallback_type = if relative.is_empty() { "/" } else { relative.as_str() };
        let node_type = properties.get_str_or(&config.type_property, fallback_type);

        Ok(Self {
            path,
            merged_root,
            node_type,
            metadata: NodeMetadata { merged: true, provenance },
            properties,
        })
    }

    /// Logical path of the node.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn merged_root(&self) -> &str {
        &self.merged_root
    }

    /// Declared type of the most specific layer, or the node's position
    /// relative to the merged root (`/` for the root) when none declares one.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Merged nodes have no super type.
    pub fn super_type(&self) -> Option<&str> {
        None
    }

    pub fn is_merged(&self) -> bool {
        self.metadata.merged
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn provenance(&self) -> &[String] {
        &self.metadata.provenance
    }

    /// Read-only merged properties.
    pub fn properties(&self) -> &LayeredPropertyView {
        &self.properties
    }

    /// Path relative to the merged root; empty for the root itself.
    pub fn relative_path(&self) -> &str {
        self.path[self.merged_root.len()..].trim_start_matches('/')
    }

    /// Physical path and properties of each layer, least specific first.
    pub fn layers(&self) -> impl Iterator<Item = (&str, &PropertyMap)> + '_ {
        self.metadata.provenance.iter().map(String::as_str).zip(self.properties.layers())
    }
}

impl PartialEq for MergedNode {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for MergedNode {}

impl Hash for MergedNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl fmt::Display for MergedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MergedNode [path={}, layers=[{}]]", self.path, self.provenance().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn layer(path: &str, entries: &[(&str, serde_json::Value)]) -> Layer {
        let props: PropertyMap = entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        Layer::new(path, props)
    }

    #[test]
    fn test_override_scenario() {
        let node = MergedNode::new(
            "/mnt/overlay",
            "a",
            vec![
                layer("/libs/a", &[("resourceType", json!("base"))]),
                layer("/apps/a", &[("resourceType", json!("override"))]),
            ],
        )
        .unwrap();

        assert_eq!(node.path(), "/mnt/overlay/a");
        assert_eq!(node.node_type(), "override");
        assert_eq!(node.provenance(), &["/libs/a".to_string(), "/apps/a".to_string()]);
        assert!(node.is_merged());
        assert!(node.super_type().is_none());
    }

    #[test]
    fn test_type_falls_back_to_relative_path() {
        let node = MergedNode::new(
            "/mnt/overlay",
            "components/text",
            vec![layer("/libs/components/text", &[("title", json!("Text"))])],
        )
        .unwrap();

        assert_eq!(node.node_type(), "components/text");
        assert_eq!(node.relative_path(), "components/text");
    }

    #[test]
    fn test_type_falls_back_to_slash_for_root() {
        let node = MergedNode::new("/mnt/overlay", "", vec![layer("/libs", &[])]).unwrap();

        assert_eq!(node.path(), "/mnt/overlay");
        assert_eq!(node.relative_path(), "");
        assert_eq!(node.node_type(), "/");
    }

    #[test]
    fn test_scalar_type_of_top_layer_wins() {
        let node = MergedNode::new(
            "/mnt/overlay",
            "a",
            vec![
                layer("/libs/a", &[("resourceType", json!("base"))]),
                layer("/apps/a", &[("resourceType", json!(3))]),
            ],
        )
        .unwrap();

        assert_eq!(node.node_type(), "3");
    }

    #[test]
    fn test_configured_type_property() {
        let config = MergeConfig {
            merged_root: "/mnt/ui".to_string(),
            type_property: "sling:resourceType".to_string(),
            honor_hide_directives: false,
        };
        let node = MergedNode::with_config(
            &config,
            "a",
            vec![layer(
                "/libs/a",
                &[("sling:resourceType", json!("ui/base")), ("resourceType", json!("ignored"))],
            )],
        )
        .unwrap();

        assert_eq!(node.node_type(), "ui/base");
    }

    #[test]
    fn test_hidden_type_property_uses_fallback() {
        let config = MergeConfig { honor_hide_directives: true, ..Default::default() };
        let node = MergedNode::with_config(
            &config,
            "a",
            vec![
                layer("/libs/a", &[("resourceType", json!("base"))]),
                layer("/apps/a", &[("hideProperties", json!("*"))]),
            ],
        )
        .unwrap();

        assert_eq!(node.node_type(), "a");
        assert!(node.properties().is_empty());
    }

    #[test]
    fn test_empty_layers_rejected() {
        let result = MergedNode::new("/mnt/overlay", "a", vec![]);
        assert!(matches!(result, Err(MergeError::EmptyLayers(path)) if path == "/mnt/overlay/a"));
    }

    #[test]
    fn test_invalid_root_rejected() {
        let result = MergedNode::new("mnt", "a", vec![layer("/libs/a", &[])]);
        assert!(matches!(result, Err(MergeError::InvalidPath(_))));
    }

    #[test]
    fn test_equality_is_path_only() {
        let a = MergedNode::new("/mnt/overlay", "a", vec![layer("/libs/a", &[("x", json!(1))])])
            .unwrap();
        let b = MergedNode::new(
            "/mnt/overlay",
            "a",
            vec![layer("/libs/a", &[("x", json!(2))]), layer("/apps/a", &[])],
        )
        .unwrap();
        let c = MergedNode::new("/mnt/overlay", "b", vec![layer("/libs/b", &[])]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<MergedNode> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_includes_path_and_layers() {
        let node = MergedNode::new(
            "/mnt/overlay",
            "a",
            vec![layer("/libs/a", &[]), layer("/apps/a", &[])],
        )
        .unwrap();

        assert_eq!(node.to_string(), "MergedNode [path=/mnt/overlay/a, layers=[/libs/a, /apps/a]]");
    }

    #[test]
    fn test_metadata_to_json() {
        let node =
            MergedNode::new("/mnt/overlay", "a", vec![layer("/libs/a", &[]), layer("/apps/a", &[])])
                .unwrap();

        let json = node.metadata().to_json();
        assert_eq!(json[METADATA_MERGED], true);
        assert_eq!(json[METADATA_LAYERS], json!(["/libs/a", "/apps/a"]));
    }

    #[test]
    fn test_layers_round_trip_in_order() {
        let layers = vec![layer("/libs/a", &[("x", json!(1))]), layer("/apps/a", &[("x", json!(2))])];
        let node = MergedNode::new("/mnt/overlay", "a", layers.clone()).unwrap();

        let seen: Vec<(&str, &PropertyMap)> = node.layers().collect();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("/libs/a", &layers[0].properties));
        assert_eq!(seen[1], ("/apps/a", &layers[1].properties));
        assert_eq!(node.properties().get("x"), Some(&json!(2)));
    }
}
