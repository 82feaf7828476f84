use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use topogen::{config_loader, orchestrator};

/// Incremental IPv6 multi-AS topology builder for GNS3 labs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology declaration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Topology store to merge the declarations into
    #[arg(short, long, default_value = "routers.json")]
    store: PathBuf,

    /// Render startup configs and write them to each router's GNS3 directory
    #[arg(long)]
    deploy: bool,

    /// Directory for configs of routers without a GNS3 directory
    #[arg(short, long, requires = "deploy")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Declaration file: {:?}", args.config);
    info!("Topology store: {:?}", args.store);

    let config = config_loader::load_config(&args.config)?;
    let store = orchestrator::generate_topology(&config, &args.store)?;

    if args.deploy {
        if let Some(output) = &args.output {
            fs::create_dir_all(output)
                .wrap_err_with(|| format!("Failed to create output directory '{}'", output.display()))?;
        }

        let report = orchestrator::deploy_configs(&config, &store, args.output.as_deref());
        for (router, error) in &report.failed {
            warn!("{} not deployed: {}", router, error);
        }
        if report.deployed.is_empty() && !store.is_empty() {
            return Err(eyre!("No router config could be deployed"));
        }
    }

    info!("Topology generation completed successfully");
    Ok(())
}
