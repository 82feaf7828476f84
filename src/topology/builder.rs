//! Topology builder.
//!
//! Turns router declarations into merged router records. Each declaration
//! is resolved to a deterministic identity, merged into whatever the store
//! already knows about the router, and given fresh subnets for links that
//! do not exist yet. Declaring the same router twice changes nothing the
//! second time: no new interfaces, no new peers, no counter advance.
//!
//! A link is allocated by at most one side. When the router at the other
//! end already holds an interface back to us, that interface is mirrored
//! instead of allocating a second subnet for the same physical link.

use super::store::TopologyStore;
use super::types::{EbgpPeer, Igp, Interface, InterfaceType, Router};
use crate::config::{AsConfig, Config, RouterDeclaration};
use crate::error::TopologyError;
use crate::ip::{
    enclosing_subnet, link_endpoints, link_subnet, loopback_subnet, router_name, CounterScope, RouterIdentity,
    SubnetCounters,
};
use ipnet::Ipv6Net;
use log::{debug, info, warn};
use std::collections::HashSet;

pub struct TopologyBuilder<'a> {
    config: &'a Config,
    counters: SubnetCounters,
}

impl<'a> TopologyBuilder<'a> {
    /// Builder for one generation run, with counters at their start value
    pub fn new(config: &'a Config) -> Self {
        TopologyBuilder {
            config,
            counters: SubnetCounters::new(config.addressing.counter_start),
        }
    }

    pub fn counters(&self) -> &SubnetCounters {
        &self.counters
    }

    /// Merge one router declaration into `store` and return the merged record.
    ///
    /// The store is only touched once the whole declaration has been merged.
    pub fn declare(&mut self, store: &mut TopologyStore, decl: &RouterDeclaration) -> Result<Router, TopologyError> {
        let config = self.config;
        let declared_as = Self::lookup_as(config, decl.as_number)?;
        let identity = RouterIdentity::resolve(&config.addressing, declared_as.router_id_family, decl.id)?;

        let mut router = match store.get(&identity.name) {
            Some(existing) => {
                debug!("Router {} already exists, adding new interfaces if any", existing.name);
                if existing.as_number != decl.as_number {
                    warn!(
                        "Router {} is stored in AS {} but declared in AS {}, keeping AS {}",
                        existing.name, existing.as_number, decl.as_number, existing.as_number
                    );
                }
                existing.clone()
            }
            None => Router::new(
                identity.name,
                decl.as_number,
                identity.router_id,
                identity.loopback,
                declared_as.igp,
            ),
        };

        let local_as = Self::lookup_as(config, router.as_number)?;
        router.igp = local_as.igp;
        if let Some(gns_path) = &decl.gns_path {
            router.gns_path = Some(gns_path.clone());
        }

        // Link subnets must never land on a loopback
        let mut used = store.used_subnets();
        used.insert(loopback_subnet(&config.addressing.loopback_prefix)?);
        for stored in store.routers() {
            used.insert(enclosing_subnet(stored.loopback)?);
        }

        for &(peer_num, _hint) in &decl.links {
            let peer = router_name(peer_num);
            if router.interface_to(&peer, InterfaceType::Internal).is_some() {
                debug!("Interface to {} already exists for {}, skipping", peer, router.name);
                continue;
            }
            let iface = match Self::remote_end(store, &router.name, &peer, InterfaceType::Internal) {
                Some(iface) => iface,
                None => self.allocate_link(
                    CounterScope::As(router.as_number),
                    &local_as.link_prefix,
                    &peer,
                    InterfaceType::Internal,
                    &mut used,
                )?,
            };
            router.interfaces.push(iface);
        }

        for &peer_num in &decl.ibgp_peers {
            let peer = router_name(peer_num);
            if router.has_ibgp_peer(&peer) {
                debug!("iBGP peer {} already present on {}", peer, router.name);
            } else {
                router.ibgp_peers.push(peer);
            }
        }

        // The link and the session are guarded separately, so either one can
        // be declared again without the other.
        for ebgp in &decl.ebgp_peers {
            let peer = router_name(ebgp.peer);
            if router.interface_to(&peer, InterfaceType::Ebgp).is_some() {
                debug!("eBGP interface to {} already exists for {}, skipping", peer, router.name);
            } else {
                let iface = match Self::remote_end(store, &router.name, &peer, InterfaceType::Ebgp) {
                    Some(iface) => iface,
                    None => self.allocate_link(
                        CounterScope::Ebgp,
                        &config.addressing.ebgp_prefix,
                        &peer,
                        InterfaceType::Ebgp,
                        &mut used,
                    )?,
                };
                router.interfaces.push(iface);
            }

            if router.ebgp_peer(&peer).is_none() {
                router.ebgp_peers.push(EbgpPeer {
                    peer,
                    peer_as: ebgp.peer_as,
                });
            }
        }

        info!(
            "Router {} processed: {} interfaces, {} iBGP peers, {} eBGP peers",
            router.name,
            router.interfaces.len(),
            router.ibgp_peers.len(),
            router.ebgp_peers.len()
        );
        store.upsert(router.clone());
        Ok(router)
    }

    /// IGP currently configured for `as_number`
    pub fn igp_for(&self, as_number: u32) -> Result<Igp, TopologyError> {
        Self::lookup_as(self.config, as_number).map(|as_config| as_config.igp)
    }

    fn lookup_as(config: &Config, as_number: u32) -> Result<&AsConfig, TopologyError> {
        config
            .as_config(as_number)
            .ok_or(TopologyError::UnknownAs { as_number })
    }

    /// Our side of a link the peer has already allocated, if any
    fn remote_end(store: &TopologyStore, local: &str, peer: &str, kind: InterfaceType) -> Option<Interface> {
        let remote = store.get(peer)?.interface_to(local, kind)?;
        debug!("Reusing subnet {} allocated by {} for {}", remote.subnet(), peer, local);
        Some(remote.mirrored(peer))
    }

    fn allocate_link(
        &mut self,
        scope: CounterScope,
        prefix: &str,
        peer: &str,
        kind: InterfaceType,
        used: &mut HashSet<Ipv6Net>,
    ) -> Result<Interface, TopologyError> {
        let index = self.counters.allocate(scope, |k| {
            link_subnet(prefix, k)
                .map(|subnet| used.contains(&subnet))
                .unwrap_or(false)
        })?;
        let (local_ip, peer_ip) = link_endpoints(prefix, index)?;
        used.insert(local_ip.trunc());
        debug!("Allocated {} in {} for link to {}", local_ip.trunc(), scope, peer);

        Ok(Interface {
            peer: peer.to_string(),
            local_ip,
            peer_ip,
            kind,
        })
    }
}
