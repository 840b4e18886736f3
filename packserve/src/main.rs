//! Packserve - a static file server for pre-compressed web assets
//!
//! This is the main entry point for the Packserve CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use packserve_core::ServeConfig;
use packserve_server::StaticService;
use packserve_static::{FileServer, FileServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Packserve - serve pre-compressed web assets with the headers browsers need
///
/// With no arguments it serves the current directory on port 8080.
#[derive(Parser)]
#[command(name = "packserve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on (":8080" and "0.0.0.0:8080" are equivalent)
    #[arg(long)]
    listen: Option<String>,

    /// Root directory to serve
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to a TOML or JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable directory listings
    #[arg(long)]
    no_browse: bool,

    /// Disable pre-compressed sibling lookup
    #[arg(long)]
    no_precompressed: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    // Config file first, explicit flags override
    let mut config = match &cli.config {
        Some(path) => ServeConfig::from_file(path)?,
        None => ServeConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(root) = cli.root {
        config.root = root;
    }
    if cli.no_browse {
        config.browse = false;
    }
    if cli.no_precompressed {
        config.precompressed = false;
    }

    let listen = config.listen_addr();
    let root = std::fs::canonicalize(&config.root).unwrap_or_else(|_| config.root.clone());

    let file_server = FileServer::new(FileServerConfig {
        root: root.clone(),
        index: config.index.clone(),
        browse: config.browse,
        precompressed: config.precompressed,
    });

    run_server(&listen, &root, StaticService::new(Arc::new(file_server)));

    Ok(())
}

fn run_server(listen: &str, root: &Path, service_logic: StaticService) {
    tracing::info!("🚀 Starting Packserve v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("📁 Serving {} on {}", root.display(), listen);

    let mut server = pingora::server::Server::new(Some(pingora::server::configuration::Opt {
        upgrade: false,
        daemon: false,
        nocapture: false,
        test: false,
        conf: None, // We handle config manually
    }))
    .expect("Failed to create Pingora server");

    server.bootstrap();

    let mut service = pingora::proxy::http_proxy_service(&server.configuration, service_logic);
    service.add_tcp(listen);
    server.add_service(service);

    println!("🚀 Packserve running on {}", listen);
    server.run_forever();
}
