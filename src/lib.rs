pub mod cli;
pub mod client;
pub mod config;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use config::RelayConfig;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = RelayConfig::from_args(&args);

    info!("--- Core Configuration ---");
    info!("Listen Port: {}", config.port);
    info!("Chat Model: {}", config.model);
    if let Some(base_url) = &config.base_url {
        info!("Chat Base URL: {}", base_url);
    }
    info!("Upstream Credential: {}", if config.api_key.is_some() {
        "configured"
    } else {
        "missing"
    });
    info!("Allowed Origins: {}", config.allowed_origins.join(", "));
    info!("-------------------------");

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
