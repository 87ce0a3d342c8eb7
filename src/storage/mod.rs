pub mod memory;
pub mod models;
pub mod traits;

pub use memory::MemoryStore;
pub use models::*;
pub use traits::{LayerLookup, NodeStore, SearchPathProvider, WritableAdapter, WritableProperties};
