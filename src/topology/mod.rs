//! Network topology module.
//!
//! This module contains the router records, the persistent store that
//! accumulates them across runs, and the builder that merges declarations
//! into the store.

pub mod builder;
pub mod store;
pub mod types;

// Re-export key types for easier access
pub use builder::TopologyBuilder;
pub use store::TopologyStore;
pub use types::{EbgpPeer, Igp, Interface, InterfaceType, Router};
