mod logging;

use clap::Parser;
use dnscoord_domain::ClusterConfig;
use dnscoord_infrastructure::{HickoryRecordSource, SystemIdentity, TomlConfigurationSource};
use dnscoord_jobs::{build_model, Cluster};
use logging::{LoggingDnsListener, LoggingSynchronizationListener};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "dnscoord")]
#[command(version)]
#[command(about = "DNS-driven application cluster coordinator")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", default_value = "dnscoord.toml")]
    config: String,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ClusterConfig::load(&cli.config)?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.logging.level)
        .parse()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .init();

    if cli.check {
        let (nodes, resources) = build_model(&config)?;
        println!(
            "configuration OK: {} nodes, {} resources",
            nodes.len(),
            resources.len()
        );
        return Ok(());
    }

    info!("Starting dnscoord v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_file = %cli.config,
        display = %config.display,
        nodes = config.nodes.len(),
        resources = config.resources.len(),
        "Configuration loaded"
    );

    let identity = Arc::new(SystemIdentity::detect()?);
    let records = Arc::new(HickoryRecordSource::new());
    let source = Arc::new(TomlConfigurationSource::new(&cli.config));

    let cluster = Cluster::builder(source, identity, records).build();
    cluster.add_dns_listener(Arc::new(LoggingDnsListener));
    cluster.add_synchronization_listener(Arc::new(LoggingSynchronizationListener));

    cluster.start().await?;
    info!("cluster running; ctrl-c stops");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cluster.stop().await;
    info!(status = %cluster.status().await, "shutdown complete");

    Ok(())
}
