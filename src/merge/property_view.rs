//! Layered property view.
//!
//! Combines the property maps of an ordered layer list into one read-only
//! key/value view. Layers are ordered least specific first; for any key the
//! value of the highest-index layer that defines it wins outright, with no
//! coercion or deep merging of structured values.

use serde::de::DeserializeOwned;
use std::collections::BTreeSet;

use crate::types::{PropertyMap, PropertyValue};

/// Directive listing properties of lower layers to hide.
pub const HIDE_PROPERTIES: &str = "hideProperties";
/// Directive hiding a whole node. Never part of the merged view.
pub const HIDE_RESOURCE: &str = "hideResource";
/// Directive hiding children. Never part of the merged view.
pub const HIDE_CHILDREN: &str = "hideChildren";
/// Directive for child ordering. Never part of the merged view.
pub const ORDER_BEFORE: &str = "orderBefore";
/// Wildcard accepted by [`HIDE_PROPERTIES`].
pub const HIDE_ALL: &str = "*";

const DIRECTIVES: [&str; 4] = [HIDE_PROPERTIES, HIDE_RESOURCE, HIDE_CHILDREN, ORDER_BEFORE];

#[derive(Debug, Clone, PartialEq)]
pub struct LayeredPropertyView {
    layers: Vec<PropertyMap>,
    hide_directives: bool,
}

impl LayeredPropertyView {
    /// Plain override view: every key of every layer takes part.
    pub fn new(layers: Vec<PropertyMap>) -> Self {
        Self { layers, hide_directives: false }
    }

    /// View that honors `hideProperties` and drops directive keys.
    pub fn with_hide_directives(layers: Vec<PropertyMap>) -> Self {
        Self { layers, hide_directives: true }
    }

    pub fn layers(&self) -> &[PropertyMap] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Winning value for `key`, scanning from the most specific layer down.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        if self.hide_directives && DIRECTIVES.contains(&key) {
            return None;
        }

        for layer in self.layers.iter().rev() {
            if let Some(value) = layer.get(key) {
                return Some(value);
            }
            if self.hide_directives && hides(layer, key) {
                return None;
            }
        }
        None
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a PropertyValue) -> &'a PropertyValue {
        self.get(key).unwrap_or(default)
    }

    /// Winning value rendered as a string, or `default` when no layer
    /// defines `key`.
    ///
    /// Scalars render in their plain form (`3`, `true`); an array renders its
    /// first element. Values with no string form (`null`, objects, empty
    /// arrays) also yield `default`.
    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        self.get(key).and_then(string_form).unwrap_or_else(|| default.to_string())
    }

    /// Winning value deserialized as `T`; `None` if absent or not convertible.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Union of the visible keys of all layers.
    pub fn keys(&self) -> BTreeSet<&str> {
        let mut keys = BTreeSet::new();
        for layer in &self.layers {
            if self.hide_directives {
                for hidden in hidden_names(layer) {
                    if hidden == HIDE_ALL {
                        keys.clear();
                        break;
                    }
                    keys.remove(hidden);
                }
            }
            keys.extend(layer.keys().map(String::as_str));
        }
        if self.hide_directives {
            for directive in DIRECTIVES {
                keys.remove(directive);
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Materialize the merged map.
    pub fn to_map(&self) -> PropertyMap {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value.clone())))
            .collect()
    }
}

fn string_form(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::String(s) => Some(s.clone()),
        PropertyValue::Number(n) => Some(n.to_string()),
        PropertyValue::Bool(b) => Some(b.to_string()),
        PropertyValue::Array(items) => items.first().and_then(string_form),
        PropertyValue::Null | PropertyValue::Object(_) => None,
    }
}

fn hidden_names(layer: &PropertyMap) -> Vec<&str> {
    match layer.get(HIDE_PROPERTIES) {
        Some(PropertyValue::String(name)) => vec![name.as_str()],
        Some(PropertyValue::Array(names)) => names.iter().filter_map(|n| n.as_str()).collect(),
        _ => Vec::new(),
    }
}

fn hides(layer: &PropertyMap, key: &str) -> bool {
    hidden_names(layer).into_iter().any(|name| name == HIDE_ALL || name == key)
}
