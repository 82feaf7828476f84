//! Writing rendered configs into GNS3 node directories.

use super::ios::render_router;
use crate::config::RenderConfig;
use crate::error::TopologyError;
use crate::topology::{Router, TopologyStore};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Startup config file GNS3 reads from a node directory
pub const GNS3_STARTUP_CONFIG: &str = "i1_startup-config.cfg";

/// Outcome of deploying a whole store
#[derive(Debug, Default)]
pub struct DeployReport {
    /// Routers written, with the file they were written to
    pub deployed: Vec<(String, PathBuf)>,
    /// Routers that could not be deployed, with the reason
    pub failed: Vec<(String, TopologyError)>,
    /// Routers without any deployment target
    pub skipped: Vec<String>,
}

/// File a router's config goes to, if it has anywhere to go.
///
/// A router's own `gns_path` wins over `fallback_dir`.
pub fn target_file(router: &Router, fallback_dir: Option<&Path>) -> Option<PathBuf> {
    match (&router.gns_path, fallback_dir) {
        (Some(dir), _) => Some(dir.join(GNS3_STARTUP_CONFIG)),
        (None, Some(dir)) => Some(dir.join(format!("{}_startup-config.cfg", router.name))),
        (None, None) => None,
    }
}

/// Render one router and write it to `file`, whose directory must exist
pub fn deploy_router(
    router: &Router,
    store: &TopologyStore,
    options: &RenderConfig,
    file: &Path,
) -> Result<(), TopologyError> {
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(TopologyError::MissingTopologyPath { path: dir.to_path_buf() });
    }
    let cfg = render_router(router, store, options)?;
    fs::write(file, cfg).map_err(|e| TopologyError::io(file, e))
}

/// Deploy every router of the store.
///
/// A router that fails is reported and the remaining routers are still
/// deployed.
pub fn deploy(store: &TopologyStore, options: &RenderConfig, fallback_dir: Option<&Path>) -> DeployReport {
    let mut report = DeployReport::default();

    for router in store.routers() {
        let Some(file) = target_file(router, fallback_dir) else {
            warn!("No deployment path for {}, skipping", router.name);
            report.skipped.push(router.name.clone());
            continue;
        };

        match deploy_router(router, store, options, &file) {
            Ok(()) => {
                info!("Deployed config for {} to {:?}", router.name, file);
                report.deployed.push((router.name.clone(), file));
            }
            Err(e) => {
                error!("Failed to deploy {}: {}", router.name, e);
                report.failed.push((router.name.clone(), e));
            }
        }
    }

    report
}
