//! Overlay resolution for layered property nodes.
//!
//! A logical node is presented as the merge of several physical nodes found
//! along an ordered list of search roots. Reads go through a layered property
//! view where the most specific layer wins; writes are routed to a single
//! physical layer, materializing a copy-on-write layer when none exists yet.

pub mod config;
pub mod merge;
pub mod storage;
pub mod types;
