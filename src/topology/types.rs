//! Topology record definitions.
//!
//! These are the records persisted in the topology store and consumed by
//! the renderer. Field names are part of the store format and stay stable
//! across loads and saves.

use ipnet::Ipv6Net;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;

/// Interior routing protocol run inside an AS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Igp {
    #[serde(rename = "RIP")]
    Rip,
    /// Stores written before the IGP was chosen per AS only ever ran OSPF
    #[default]
    #[serde(rename = "OSPF")]
    Ospf,
}

impl fmt::Display for Igp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Igp::Rip => write!(f, "RIP"),
            Igp::Ospf => write!(f, "OSPF"),
        }
    }
}

/// Classification of a point-to-point link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    /// Same-AS transport, carries the IGP and iBGP sessions
    #[default]
    Internal,
    /// Inter-AS transport, carries exactly one eBGP session
    Ebgp,
}

/// One endpoint of a point-to-point link, owned by a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub peer: String,
    pub local_ip: Ipv6Net,
    pub peer_ip: Ipv6Net,
    #[serde(rename = "type", default)]
    pub kind: InterfaceType,
}

impl Interface {
    /// Build the opposite endpoint of this link, as seen from `peer`.
    ///
    /// `owner` is the name of the router holding `self`.
    pub fn mirrored(&self, owner: &str) -> Interface {
        Interface {
            peer: owner.to_string(),
            local_ip: self.peer_ip,
            peer_ip: self.local_ip,
            kind: self.kind,
        }
    }

    pub fn is_igp_enabled(&self) -> bool {
        self.kind == InterfaceType::Internal
    }

    /// Network prefix shared by both endpoints
    pub fn subnet(&self) -> Ipv6Net {
        self.local_ip.trunc()
    }
}

/// eBGP session towards a router in another AS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbgpPeer {
    pub peer: String,
    pub peer_as: u32,
}

/// One network node and everything declared about it so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub name: String,
    pub as_number: u32,
    #[serde(alias = "router_id_bgp")]
    pub router_id: Ipv4Addr,
    pub loopback: Ipv6Net,
    #[serde(default)]
    pub igp: Igp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gns_path: Option<PathBuf>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub ibgp_peers: Vec<String>,
    #[serde(default)]
    pub ebgp_peers: Vec<EbgpPeer>,
}

impl Router {
    pub fn new(name: String, as_number: u32, router_id: Ipv4Addr, loopback: Ipv6Net, igp: Igp) -> Self {
        Router {
            name,
            as_number,
            router_id,
            loopback,
            igp,
            gns_path: None,
            interfaces: Vec::new(),
            ibgp_peers: Vec::new(),
            ebgp_peers: Vec::new(),
        }
    }

    /// Find the interface of the given type towards `peer`
    pub fn interface_to(&self, peer: &str, kind: InterfaceType) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|iface| iface.peer == peer && iface.kind == kind)
    }

    pub fn has_ibgp_peer(&self, peer: &str) -> bool {
        self.ibgp_peers.iter().any(|p| p == peer)
    }

    pub fn ebgp_peer(&self, peer: &str) -> Option<&EbgpPeer> {
        self.ebgp_peers.iter().find(|p| p.peer == peer)
    }

    /// Loopback address without its prefix length, as used for BGP peering
    pub fn loopback_address(&self) -> Ipv6Addr {
        self.loopback.addr()
    }
}
