//! Error types for topology building, persistence and rendering.

use std::path::PathBuf;

/// Errors raised by the topology store, builder and renderer
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The persisted topology is not a well-formed list of router records
    #[error("Corrupt topology store {}: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    /// A peer referenced by a router has no record of its own
    #[error("Router {router} references unknown peer {peer}")]
    UnknownPeer { router: String, peer: String },

    /// A directory the topology is persisted or deployed into does not exist
    #[error("Topology path not found: {}", path.display())]
    MissingTopologyPath { path: PathBuf },

    /// An eBGP session was declared without a matching eBGP link
    #[error("Router {router} has an eBGP session with {peer} but no eBGP interface towards it")]
    MissingEbgpInterface { router: String, peer: String },

    #[error("AS {as_number} is not present in the AS table")]
    UnknownAs { as_number: u32 },

    /// All subnets of a counter scope have been handed out
    #[error("No free subnet left in {scope}")]
    SubnetExhausted { scope: String },

    #[error("Invalid IPv6 address {value}")]
    InvalidAddress { value: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TopologyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TopologyError::Io { path: path.into(), source }
    }
}
