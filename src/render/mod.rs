//! # Config Rendering Module
//!
//! Turns merged router records into IOS-style IPv6 startup configs and
//! deploys them into GNS3 node directories. Rendering is read-only: it
//! never merges or allocates, it only resolves what the builder stored.
//!
//! ## Rendered Sections
//!
//! Each config contains, in order:
//!
//! - **Base**: hostname and `ipv6 unicast-routing`
//! - **Loopback0**: the router's /128 loopback, IGP-enabled
//! - **Physical interfaces**: one `GigabitEthernet0/<idx>` per interface in
//!   declaration order, IGP-enabled on internal links only
//! - **IGP process**: OSPFv3 with the router id, or a named RIPng process
//! - **BGP process**: iBGP neighbors on their loopbacks, eBGP neighbors on
//!   the far end of the eBGP link
//!
//! ## Deployment
//!
//! Configs go to `<gns_path>/i1_startup-config.cfg` when the router has a
//! GNS3 node directory, otherwise to `<output>/<name>_startup-config.cfg`.
//! A router whose directory is missing or whose peers cannot be resolved is
//! reported and skipped; the others are still written.

pub mod deploy;
pub mod ios;

pub use deploy::{deploy, deploy_router, target_file, DeployReport, GNS3_STARTUP_CONFIG};
pub use ios::{render_router, resolve_neighbors, BgpNeighbor};
