//! Address derivation and subnet allocation.
//!
//! This module derives router identities (name, router id, loopback) and
//! hands out collision-free point-to-point subnets per AS and for eBGP links.

pub mod counters;
pub mod identity;

// Re-export commonly used types
pub use counters::{CounterScope, SubnetCounters};
pub use identity::{
    enclosing_subnet, link_endpoints, link_subnet, loopback, loopback_subnet, router_id, router_name, subnet_index_of,
    RouterIdentity,
};
