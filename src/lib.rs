pub mod cli;
pub mod config;
pub mod history;
pub mod models;
pub mod repl;
pub mod transport;

use cli::Args;
use config::TransportConfig;
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = TransportConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Chat Endpoint: {}", config.chat_url());
    info!("Health Endpoint: {}", config.health_url());
    info!("Chat Timeout: {:?}", config.chat_timeout);
    info!("Health Timeout: {:?}", config.health_timeout);
    info!("History Limit: {}", config.history_limit);
    info!("Extra Headers: {}", config.headers.len());
    info!("-------------------------");

    let messages = config.messages.clone();
    let client = transport::new_client(config);

    if args.check {
        let health = client.check_health().await;
        println!(
            "{} (status {}): {}",
            if health.is_healthy { "healthy" } else { "unhealthy" },
            health.status,
            health.message
        );
        if !health.is_healthy {
            return Err(format!("backend is unhealthy: {}", health.message).into());
        }
        return Ok(());
    }

    repl::run(client, messages).await
}
