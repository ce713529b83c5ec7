use anyhow::{Context, Result};
use clap::Parser;
use dhcp_server::dhcp::{transport, DhcpServer, InformResponder};
use dhcp_server::Config;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// DHCP Server - answers DHCPINFORM from static configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/dhcp-server/config.yaml")]
    config: String,

    /// Address to bind, overrides the configuration file
    #[arg(short, long)]
    listen: Option<Ipv4Addr>,

    /// UDP port to bind, overrides the configuration file
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        info!("Config not found at {}, using default configuration", path);
        return Ok(Config::default());
    }

    let config = Config::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path))?;
    info!("Loaded configuration from {}", path);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dhcp_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DHCP Server");

    let mut config = load_config(&args.config)?;
    if let Some(listen) = args.listen {
        config.listen_address = listen;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    if config.inform.is_none() {
        warn!("No inform section configured, requests will only be logged");
    }

    let addr = config.socket_addr();
    let socket = transport::bind(addr)
        .await
        .with_context(|| format!("Failed to bind DHCP socket to {}", addr))?;
    info!("DHCP server listening on {}", addr);

    let server = DhcpServer::new(Arc::new(socket)).buffer_size(config.buffer_size);
    let responder = InformResponder::new(config.inform.clone());

    tokio::select! {
        err = server.serve(&responder) => {
            error!("DHCP server error: {}", err);
            Err(err.into())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
