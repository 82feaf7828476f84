use crate::ip::identity::{loopback_subnet, subnet_index_of, MAX_ROUTER_NUM, MAX_SUBNET_INDEX};
use crate::topology::Igp;
use crate::utils::ip_utils::{hextet_count, is_hextet_prefix};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Number of hextets in a link prefix; the subnet index fills the fourth
/// one, which puts every link on a /64 boundary.
const LINK_PREFIX_HEXTETS: usize = 3;

/// Topology declaration file
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub addressing: AddressPlan,
    #[serde(default)]
    pub render: RenderConfig,
    pub autonomous_systems: Vec<AsConfig>,
    #[serde(default)]
    pub routers: Vec<RouterDeclaration>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.addressing.validate()?;

        let mut numbers = HashSet::new();
        let mut prefixes = HashSet::new();
        prefixes.insert(self.addressing.ebgp_prefix.to_lowercase());
        self.addressing.check_link_space(&self.addressing.ebgp_prefix)?;

        for as_config in &self.autonomous_systems {
            if !numbers.insert(as_config.number) {
                return Err(ValidationError::InvalidAs(format!(
                    "AS {} is declared more than once",
                    as_config.number
                )));
            }
            if as_config.router_id_family == 0 {
                return Err(ValidationError::InvalidAs(format!(
                    "AS {} needs a non-zero router_id_family",
                    as_config.number
                )));
            }
            if !is_hextet_prefix(&as_config.link_prefix, LINK_PREFIX_HEXTETS) {
                return Err(ValidationError::InvalidAs(format!(
                    "AS {} link_prefix '{}' must be {} uncompressed hextets",
                    as_config.number, as_config.link_prefix, LINK_PREFIX_HEXTETS
                )));
            }
            // Links of different scopes must never share a subnet
            if !prefixes.insert(as_config.link_prefix.to_lowercase()) {
                return Err(ValidationError::InvalidAs(format!(
                    "AS {} link_prefix '{}' overlaps another link space",
                    as_config.number, as_config.link_prefix
                )));
            }
            self.addressing.check_link_space(&as_config.link_prefix)?;
        }

        for router in &self.routers {
            Self::validate_router(router, &numbers)?;
        }

        Ok(())
    }

    fn validate_router(router: &RouterDeclaration, numbers: &HashSet<u32>) -> Result<(), ValidationError> {
        if router.id == 0 || router.id > MAX_ROUTER_NUM {
            return Err(ValidationError::InvalidRouter(format!(
                "router id {} must be between 1 and {}",
                router.id, MAX_ROUTER_NUM
            )));
        }
        if !numbers.contains(&router.as_number) {
            return Err(ValidationError::InvalidRouter(format!(
                "R{} belongs to AS {} which is not in autonomous_systems",
                router.id, router.as_number
            )));
        }

        let peers = router
            .links
            .iter()
            .map(|(peer, _)| *peer)
            .chain(router.ibgp_peers.iter().copied())
            .chain(router.ebgp_peers.iter().map(|p| p.peer));
        for peer in peers {
            if peer == router.id {
                return Err(ValidationError::InvalidRouter(format!("R{} cannot peer with itself", router.id)));
            }
            if peer == 0 || peer > MAX_ROUTER_NUM {
                return Err(ValidationError::InvalidRouter(format!(
                    "R{} references peer {} outside 1..={}",
                    router.id, peer, MAX_ROUTER_NUM
                )));
            }
        }

        for ebgp in &router.ebgp_peers {
            if ebgp.peer_as == router.as_number {
                return Err(ValidationError::InvalidRouter(format!(
                    "R{} declares eBGP with R{} inside its own AS {}",
                    router.id, ebgp.peer, router.as_number
                )));
            }
        }

        Ok(())
    }

    /// Look up an AS in the AS table
    pub fn as_config(&self, as_number: u32) -> Option<&AsConfig> {
        self.autonomous_systems.iter().find(|a| a.number == as_number)
    }
}

/// Address prefixes shared by all autonomous systems
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AddressPlan {
    /// Loopbacks are `<loopback_prefix>::<router_num>/128`
    pub loopback_prefix: String,
    /// eBGP links are `<ebgp_prefix>:<counter>::/64`
    pub ebgp_prefix: String,
    /// First value of every subnet counter
    pub counter_start: u32,
}

impl AddressPlan {
    fn validate(&self) -> Result<(), ValidationError> {
        match hextet_count(&self.loopback_prefix) {
            Some(1..=6) => {}
            _ => {
                return Err(ValidationError::InvalidAddressing(format!(
                    "loopback_prefix '{}' must be 1 to 6 uncompressed hextets",
                    self.loopback_prefix
                )))
            }
        }
        if !is_hextet_prefix(&self.ebgp_prefix, LINK_PREFIX_HEXTETS) {
            return Err(ValidationError::InvalidAddressing(format!(
                "ebgp_prefix '{}' must be {} uncompressed hextets",
                self.ebgp_prefix, LINK_PREFIX_HEXTETS
            )));
        }
        if self.counter_start > MAX_SUBNET_INDEX {
            return Err(ValidationError::InvalidAddressing(format!(
                "counter_start {} exceeds {}",
                self.counter_start, MAX_SUBNET_INDEX
            )));
        }
        Ok(())
    }

    /// Reject a link prefix whose counter can reach the loopback /64
    fn check_link_space(&self, link_prefix: &str) -> Result<(), ValidationError> {
        let loopbacks = loopback_subnet(&self.loopback_prefix)
            .map_err(|e| ValidationError::InvalidAddressing(e.to_string()))?;
        match subnet_index_of(link_prefix, loopbacks) {
            Some(index) if index >= self.counter_start => Err(ValidationError::InvalidAddressing(format!(
                "link prefix '{}' reaches the loopback subnet {} at index {}",
                link_prefix, loopbacks, index
            ))),
            _ => Ok(()),
        }
    }
}

/// One autonomous system of the lab
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AsConfig {
    pub number: u32,
    pub igp: Igp,
    /// First octet of the router ids in this AS
    pub router_id_family: u8,
    /// Internal links are `<link_prefix>:<counter>::/64`
    pub link_prefix: String,
}

/// Declaration of one router and the links and sessions seen from its side
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouterDeclaration {
    pub id: u32,
    #[serde(alias = "as")]
    pub as_number: u32,
    /// `(peer, link hint)` pairs. The hint is advisory and never overrides
    /// an address that was already assigned.
    #[serde(default)]
    pub links: Vec<(u32, u32)>,
    #[serde(default)]
    pub ibgp_peers: Vec<u32>,
    #[serde(default)]
    pub ebgp_peers: Vec<EbgpDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gns_path: Option<PathBuf>,
}

impl RouterDeclaration {
    pub fn new(id: u32, as_number: u32) -> Self {
        RouterDeclaration {
            id,
            as_number,
            links: Vec::new(),
            ibgp_peers: Vec::new(),
            ebgp_peers: Vec::new(),
            gns_path: None,
        }
    }

    pub fn link(mut self, peer: u32, hint: u32) -> Self {
        self.links.push((peer, hint));
        self
    }

    pub fn ibgp(mut self, peer: u32) -> Self {
        self.ibgp_peers.push(peer);
        self
    }

    pub fn ebgp(mut self, peer: u32, peer_as: u32) -> Self {
        self.ebgp_peers.push(EbgpDeclaration { peer, peer_as });
        self
    }

    pub fn gns_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.gns_path = Some(path.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct EbgpDeclaration {
    pub peer: u32,
    pub peer_as: u32,
}

/// Parameters of the generated startup configs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub ospf_process_id: u32,
    pub ospf_area: u32,
    pub rip_process_name: String,
    /// Physical interfaces are named `<interface_prefix><index>`
    pub interface_prefix: String,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid autonomous system configuration: {0}")]
    InvalidAs(String),
    #[error("Invalid router declaration: {0}")]
    InvalidRouter(String),
}

/// Default implementations
impl Default for AddressPlan {
    fn default() -> Self {
        Self {
            loopback_prefix: "2001:192:100:255".to_string(),
            ebgp_prefix: "2001:192:170".to_string(),
            counter_start: 1,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ospf_process_id: 1,
            ospf_area: 0,
            rip_process_name: "RIP-ASX".to_string(),
            interface_prefix: "GigabitEthernet0/".to_string(),
        }
    }
}
