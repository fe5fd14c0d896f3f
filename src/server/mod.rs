pub mod api;

use crate::config::RelayConfig;
use crate::llm::new_client;
use crate::relay::Relay;
use log::{ info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Server {
    addr: SocketAddr,
    relay: Arc<Relay>,
}

impl Server {
    pub fn new(addr: SocketAddr, config: RelayConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if config.api_key.is_none() {
            warn!("Warning: OPENAI_API_KEY not set. Set it before running the server.");
        }
        let client = new_client(&config)?;
        info!("Relay configured for model {} at {}", config.model, config.base_url);

        Ok(Self { addr, relay: Arc::new(Relay::new(config, client)) })
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.addr, self.relay.clone()).await
    }
}
