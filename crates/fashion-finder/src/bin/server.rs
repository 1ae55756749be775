//! Fashion finder server binary
//!
//! Run with: cargo run -p fashion-finder --bin fashion-finder-server

use clap::Parser;
use fashion_finder::{config::FinderConfig, server::FinderServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fashion-finder-server", version, about = "Fashion product search server")]
struct Args {
    /// Host address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Path to a TOML config file (overrides FASHION_FINDER_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fashion_finder=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      Fashion Finder                       ║
║        Find your next outfit by image or text query       ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration (env secrets are required here)
    let mut config = match &args.config {
        Some(path) => {
            let mut config = FinderConfig::from_file(path)?;
            config.weaviate.overlay_env()?;
            config
        }
        None => FinderConfig::load()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Cluster: {}", config.weaviate.cluster_url);
    tracing::info!("  - Collection: {}", config.search.collection);
    tracing::info!("  - Result limit: {}", config.search.result_limit);
    tracing::info!("  - Hybrid alpha: {}", config.search.hybrid_alpha);

    // Create the server (fatal on missing credentials or env config)
    let server = FinderServer::new(config)?;

    // Check the cluster before accepting traffic
    if server.state().catalog().ready().await {
        tracing::info!("Weaviate cluster is ready");
    } else {
        tracing::warn!("Weaviate cluster readiness probe failed; searches may error");
    }

    println!("\nServer starting...");
    println!("  UI:     http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API:    http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
