//! # Topogen - IPv6 multi-AS topology builder for GNS3 labs
//!
//! This library accumulates router declarations into a persistent topology
//! record and generates the network-layer configuration (addressing, IGP,
//! BGP) of every router in a simulated multi-AS IPv6 network.
//!
//! ## Overview
//!
//! Routers are declared one at a time, each with its AS, its point-to-point
//! links, and its iBGP and eBGP peers. Declarations can be repeated freely:
//! a router that already exists is merged, never duplicated, and links that
//! already have addresses keep them.
//!
//! ## Key Features
//!
//! - **Deterministic identities**: router ids and loopbacks derive from the
//!   router number and its AS alone
//! - **Collision-free addressing**: one /64 per link, handed out by per-AS
//!   counters for internal links and a shared counter for eBGP links
//! - **Link classification**: internal IGP links vs. eBGP links, iBGP vs.
//!   eBGP sessions
//! - **Idempotent reruns**: declaring the same topology again changes
//!   nothing, on disk or in memory
//! - **Config rendering**: IOS-style startup configs deployed straight into
//!   GNS3 node directories
//!
//! ## Architecture
//!
//! - `config`: Declaration file structures and validation
//! - `config_loader`: Declaration file loading
//! - `ip`: Router identity derivation and subnet counters
//! - `topology`: Router records, the persistent store, and the builder
//! - `render`: Startup config rendering and deployment
//! - `orchestrator`: High-level coordination of a generation run
//! - `error`: Error types for the topology engine
//! - `utils`: Address prefix helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use topogen::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! // Load declarations from a YAML file
//! let config = config_loader::load_config(Path::new("lab.yaml"))?;
//!
//! // Merge them into the topology store
//! let store = orchestrator::generate_topology(&config, Path::new("routers.json"))?;
//!
//! // Write a startup config for every router
//! let report = orchestrator::deploy_configs(&config, &store, None);
//! println!("{} configs deployed", report.deployed.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Declaration Format
//!
//! ```yaml
//! autonomous_systems:
//!   - number: 10
//!     igp: RIP
//!     router_id_family: 1
//!     link_prefix: "2001:192:168"
//!   - number: 20
//!     igp: OSPF
//!     router_id_family: 2
//!     link_prefix: "2001:192:169"
//!
//! routers:
//!   - id: 6
//!     as_number: 10
//!     links: [[4, 9], [5, 8]]   # (peer, link hint)
//!     ibgp_peers: [4, 5]
//!     ebgp_peers:
//!       - { peer: 9, peer_as: 20 }
//!     gns_path: "/home/user/gns3/project/dynamips/R6"
//! ```
//!
//! ## Error Handling
//!
//! The topology engine reports failures through [`error::TopologyError`].
//! Loading and orchestration return `color_eyre::Result` with context
//! attached at each step.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod orchestrator;
pub mod render;
pub mod topology;
pub mod utils;
