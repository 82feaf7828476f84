//! IOS-style startup config rendering.

use crate::config::RenderConfig;
use crate::error::TopologyError;
use crate::topology::{Igp, InterfaceType, Router, TopologyStore};
use std::net::Ipv6Addr;

/// A BGP neighbor with its session address resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpNeighbor {
    pub address: Ipv6Addr,
    pub remote_as: u32,
    /// iBGP sessions run between loopbacks
    pub internal: bool,
}

/// Resolve the session address of every BGP peer of `router`.
///
/// iBGP peers are reached on their loopback, eBGP peers on the far end of
/// the eBGP link towards them.
pub fn resolve_neighbors(router: &Router, store: &TopologyStore) -> Result<Vec<BgpNeighbor>, TopologyError> {
    let mut neighbors = Vec::with_capacity(router.ibgp_peers.len() + router.ebgp_peers.len());

    for peer in &router.ibgp_peers {
        let peer_router = store.get(peer).ok_or_else(|| TopologyError::UnknownPeer {
            router: router.name.clone(),
            peer: peer.clone(),
        })?;
        neighbors.push(BgpNeighbor {
            address: peer_router.loopback_address(),
            remote_as: router.as_number,
            internal: true,
        });
    }

    for ebgp in &router.ebgp_peers {
        if !store.contains(&ebgp.peer) {
            return Err(TopologyError::UnknownPeer {
                router: router.name.clone(),
                peer: ebgp.peer.clone(),
            });
        }
        let iface = router
            .interface_to(&ebgp.peer, InterfaceType::Ebgp)
            .ok_or_else(|| TopologyError::MissingEbgpInterface {
                router: router.name.clone(),
                peer: ebgp.peer.clone(),
            })?;
        neighbors.push(BgpNeighbor {
            address: iface.peer_ip.addr(),
            remote_as: ebgp.peer_as,
            internal: false,
        });
    }

    Ok(neighbors)
}

/// Render the startup config of `router`
pub fn render_router(router: &Router, store: &TopologyStore, options: &RenderConfig) -> Result<String, TopologyError> {
    let neighbors = resolve_neighbors(router, store)?;
    let igp_enable = match router.igp {
        Igp::Ospf => format!(" ipv6 ospf {} area {}\n", options.ospf_process_id, options.ospf_area),
        Igp::Rip => format!(" ipv6 rip {} enable\n", options.rip_process_name),
    };

    let mut cfg = String::new();

    // Base config
    cfg.push_str(&format!("hostname {}\n", router.name));
    cfg.push_str("ipv6 unicast-routing\n\n");

    cfg.push_str("interface Loopback0\n");
    cfg.push_str(&format!(" ipv6 address {}\n", router.loopback));
    cfg.push_str(&igp_enable);
    cfg.push_str("exit\n\n");

    for (idx, iface) in router.interfaces.iter().enumerate() {
        cfg.push_str(&format!("interface {}{}\n", options.interface_prefix, idx));
        cfg.push_str(&format!(" ipv6 address {}\n", iface.local_ip));
        cfg.push_str(" no shutdown\n");
        if iface.is_igp_enabled() {
            cfg.push_str(&igp_enable);
        }
        cfg.push_str("exit\n\n");
    }

    // IGP process
    match router.igp {
        Igp::Ospf => {
            cfg.push_str(&format!("ipv6 router ospf {}\n", options.ospf_process_id));
            cfg.push_str(&format!(" router-id {}\n", router.router_id));
        }
        Igp::Rip => {
            cfg.push_str(&format!("ipv6 router rip {}\n", options.rip_process_name));
        }
    }
    cfg.push_str("exit\n\n");

    // BGP process
    cfg.push_str(&format!("router bgp {}\n", router.as_number));
    cfg.push_str(&format!(" bgp router-id {}\n", router.router_id));
    cfg.push_str(" no bgp default ipv4-unicast\n");
    for neighbor in &neighbors {
        cfg.push_str(&format!(" neighbor {} remote-as {}\n", neighbor.address, neighbor.remote_as));
        if neighbor.internal {
            cfg.push_str(&format!(" neighbor {} update-source Loopback0\n", neighbor.address));
        }
    }
    if !neighbors.is_empty() {
        cfg.push_str(" address-family ipv6\n");
        for neighbor in &neighbors {
            cfg.push_str(&format!("  neighbor {} activate\n", neighbor.address));
        }
        cfg.push_str(" exit-address-family\n");
    }
    cfg.push_str("exit\n");
    cfg.push_str("end\n");

    Ok(cfg)
}
