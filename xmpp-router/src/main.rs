#![forbid(unsafe_code)]

mod net;
mod xml;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xmpp_router_core::config::{load_from_path, LoggingConfig};
use xmpp_router_core::router::RouterActor;

#[derive(Parser, Debug)]
#[command(author, version, about = "Federated component routing hub")]
struct Cli {
    /// Path to configuration TOML file
    #[arg(short, long, value_name = "FILE", default_value = "demos/basic.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);
    info!(listen = %config.listen, legacy = config.local_secret.is_some(), "configuration loaded");
    let config = Arc::new(config);

    let (actor, handle) = RouterActor::new(&config);
    tokio::spawn(actor.run());

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, signaling shutdown");
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(err) = net::run(config, handle, &mut shutdown_rx).await {
        error!(%err, "accept loop exited with error");
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(logging.show_target)
        .init();
}
