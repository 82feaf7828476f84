//! Router identity and link address derivation.
//!
//! Every function here is a pure function of its inputs: the same router
//! number, AS family and prefix always produce the same name, router id and
//! addresses. Reruns rely on this to find the records they created earlier.
//!
//! Numeric suffixes are written into the address text verbatim, so router
//! 12 gets the loopback `<prefix>::12/128` and subnet index 10 of prefix
//! `2001:192:168` reads `2001:192:168:10::/64`.

use crate::config::AddressPlan;
use crate::error::TopologyError;
use ipnet::Ipv6Net;
use std::net::Ipv4Addr;

/// Highest router number, bounded by the last octet of the router id
pub const MAX_ROUTER_NUM: u32 = 255;

/// Highest subnet index that still fits in a single hextet when written in decimal
pub const MAX_SUBNET_INDEX: u32 = 9999;

/// Name, router id and loopback of one router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterIdentity {
    pub name: String,
    pub router_id: Ipv4Addr,
    pub loopback: Ipv6Net,
}

impl RouterIdentity {
    /// Derive the identity of router `router_num` in an AS of router-id family `family`
    pub fn resolve(plan: &AddressPlan, family: u8, router_num: u32) -> Result<Self, TopologyError> {
        Ok(RouterIdentity {
            name: router_name(router_num),
            router_id: router_id(family, router_num)?,
            loopback: loopback(&plan.loopback_prefix, router_num)?,
        })
    }
}

pub fn router_name(router_num: u32) -> String {
    format!("R{}", router_num)
}

/// Router id in the form `<family>.1.1.<router_num>`
pub fn router_id(family: u8, router_num: u32) -> Result<Ipv4Addr, TopologyError> {
    let last = u8::try_from(router_num).map_err(|_| TopologyError::InvalidAddress {
        value: format!("{}.1.1.{}", family, router_num),
    })?;
    Ok(Ipv4Addr::new(family, 1, 1, last))
}

/// Host route `<prefix>::<router_num>/128` used as the iBGP session address
pub fn loopback(prefix: &str, router_num: u32) -> Result<Ipv6Net, TopologyError> {
    parse_net(format!("{}::{}/128", prefix, router_num))
}

/// The /64 holding every loopback under `prefix`.
///
/// Router numbers only ever fill the last hextet, so one /64 covers them all.
pub fn loopback_subnet(prefix: &str) -> Result<Ipv6Net, TopologyError> {
    enclosing_subnet(loopback(prefix, 1)?)
}

/// The /64 that `net` falls in
pub fn enclosing_subnet(net: Ipv6Net) -> Result<Ipv6Net, TopologyError> {
    Ipv6Net::new(net.addr(), 64)
        .map(|subnet| subnet.trunc())
        .map_err(|_| TopologyError::InvalidAddress { value: net.to_string() })
}

/// Subnet index `k` for which `link_subnet(prefix, k)` is `subnet`, if any.
///
/// The index is written in decimal into a hex hextet, so only hextets whose
/// hex text is all digits can be produced by a counter.
pub fn subnet_index_of(prefix: &str, subnet: Ipv6Net) -> Option<u32> {
    let index = format!("{:x}", subnet.addr().segments()[3]).parse::<u32>().ok()?;
    match link_subnet(prefix, index) {
        Ok(candidate) if candidate == subnet => Some(index),
        _ => None,
    }
}

/// Both endpoints of link subnet `index` under `prefix`: `::1` for the
/// allocating side, `::2` for its peer.
pub fn link_endpoints(prefix: &str, index: u32) -> Result<(Ipv6Net, Ipv6Net), TopologyError> {
    if index > MAX_SUBNET_INDEX {
        return Err(TopologyError::InvalidAddress {
            value: format!("{}:{}::/64", prefix, index),
        });
    }
    let local = parse_net(format!("{}:{}::1/64", prefix, index))?;
    let peer = parse_net(format!("{}:{}::2/64", prefix, index))?;
    Ok((local, peer))
}

/// The /64 network of link subnet `index` under `prefix`
pub fn link_subnet(prefix: &str, index: u32) -> Result<Ipv6Net, TopologyError> {
    link_endpoints(prefix, index).map(|(local, _)| local.trunc())
}

fn parse_net(value: String) -> Result<Ipv6Net, TopologyError> {
    value
        .parse::<Ipv6Net>()
        .map_err(|_| TopologyError::InvalidAddress { value })
}
