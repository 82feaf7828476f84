//! Generation orchestrator.
//!
//! This module coordinates a generation run: loading the topology store,
//! applying the declarations in file order, committing the store after each
//! router, and optionally deploying rendered configs.

use crate::config::Config;
use crate::error::TopologyError;
use crate::render::{self, DeployReport};
use crate::topology::{TopologyBuilder, TopologyStore};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{error, info};
use std::path::Path;

/// Apply every declaration of `config` to `store`, in order.
///
/// The store is saved after each router. A missing store directory is
/// logged and the run moves on to the next declaration; any other error
/// aborts the run, leaving the last saved store in place.
pub fn apply_declarations(config: &Config, store: &mut TopologyStore) -> Result<()> {
    let mut builder = TopologyBuilder::new(config);

    for decl in &config.routers {
        let router = builder
            .declare(store, decl)
            .wrap_err_with(|| format!("Failed to process declaration of R{}", decl.id))?;

        match store.save() {
            Ok(()) => {}
            Err(TopologyError::MissingTopologyPath { path }) => {
                error!("Store directory {:?} not found, {} was not persisted", path, router.name);
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("Failed to save topology after {}", router.name));
            }
        }
    }

    Ok(())
}

/// Load the store at `store_path` and apply `config` to it
pub fn generate_topology(config: &Config, store_path: &Path) -> Result<TopologyStore> {
    // Corruption is fatal before anything is merged
    let mut store = TopologyStore::load(store_path)
        .wrap_err_with(|| format!("Failed to load topology store '{}'", store_path.display()))?;

    apply_declarations(config, &mut store)?;

    info!("Topology holds {} routers", store.len());
    Ok(store)
}

/// Render and write the configs of every router in `store`
pub fn deploy_configs(config: &Config, store: &TopologyStore, output_dir: Option<&Path>) -> DeployReport {
    let report = render::deploy(store, &config.render, output_dir);
    info!(
        "Deployed {} configs, {} failed, {} without a target",
        report.deployed.len(),
        report.failed.len(),
        report.skipped.len()
    );
    report
}
