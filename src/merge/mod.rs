//! Merge engine.
//!
//! - Layered property view with last-layer-wins reads
//! - Merged nodes with path-only identity and derived types
//! - Writable-layer resolution with copy-on-write promotion

pub mod error;
pub mod node;
pub mod path;
mod property_view;
mod resolver;
mod writable;

pub use error::{MergeError, MergeResult};
pub use node::{DEFAULT_TYPE_PROPERTY, METADATA_LAYERS, METADATA_MERGED, MergedNode, NodeMetadata};
pub use property_view::{
    HIDE_ALL, HIDE_CHILDREN, HIDE_PROPERTIES, HIDE_RESOURCE, LayeredPropertyView, ORDER_BEFORE,
};
pub use resolver::MergeResolver;
pub use writable::WritableResolver;
