use clap::Parser;
use dockpanel::api::Server;
use dockpanel::engine::EngineClient;
use dockpanel::manager::{ContainerManager, ManagerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Web control panel for a single Docker/Podman container.
#[derive(Debug, Parser)]
#[command(name = "dockpanel", version, about)]
struct Args {
    /// Address to serve the panel on
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    /// Image used when a start request names none
    #[arg(long, default_value = "hello-world")]
    default_image: String,

    /// Prefix for generated container names
    #[arg(long, default_value = "app_container")]
    name_prefix: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dockpanel=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = ManagerConfig {
        default_image: args.default_image,
        name_prefix: args.name_prefix,
        ..ManagerConfig::default()
    };

    // An unreachable daemon is not fatal: the panel still serves and
    // reports the connection problem via /engine-info.
    let manager = match EngineClient::connect().await {
        Ok(engine) => {
            info!("Container engine connected");
            let manager = ContainerManager::new(Arc::new(engine), config);
            manager.adopt_existing().await;
            manager
        }
        Err(e) => {
            warn!("Container engine initialization failed: {}", e);
            warn!("Make sure Docker or Podman is running");
            ContainerManager::disconnected(e.to_string(), config)
        }
    };

    Server::new(Arc::new(manager), args.listen).run().await?;
    Ok(())
}
