pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod widget;

use cli::Args;
use config::RelayConfig;
use log::info;
use server::Server;
use std::error::Error;
use std::net::SocketAddr;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = RelayConfig::from(&args);

    info!("--- Relay Configuration ---");
    info!("Listen Address: {}:{}", args.host, args.port);
    info!("Model: {}", config.model);
    info!("Provider URL: {}", config.base_url);
    info!("Max Tokens: {}", config.max_tokens);
    info!("Default Temperature: {}", config.default_temperature);
    info!("Request Timeout: {:?}", config.request_timeout);
    info!("API Key Set: {}", config.api_key.is_some());
    info!("---------------------------");

    let addr = format!("{}:{}", args.host, args.port).parse::<SocketAddr>()?;
    let server = Server::new(addr, config)?;
    server.run().await?;

    Ok(())
}
