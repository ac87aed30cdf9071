pub mod api;
pub mod error;

use std::error::Error;
use std::net::SocketAddr;

use log::info;

use crate::config::RelayConfig;

pub struct Server {
    config: RelayConfig,
}

impl Server {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = api::build_state(&self.config)?;
        let app = api::router(state, &self.config.allowed_origins);

        let addr = format!("0.0.0.0:{}", self.config.port).parse::<SocketAddr>()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Relay listening on http://{}", addr);

        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
