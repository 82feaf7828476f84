use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a topology declaration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading declarations from: {:?}", config_path);

    // Open the declaration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open declaration file '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse declaration file '{}'", config_path.display()))?;

    info!(
        "Declared {} autonomous systems and {} routers",
        config.autonomous_systems.len(),
        config.routers.len()
    );

    // Validate the configuration
    config.validate()?;

    Ok(config)
}
