use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use impfbot::{Config, LoggingReceiver, Poller, RequestClient, all_plugins, init_logging};
use log::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Don't throw an error if .env file doesn't exist.
    dotenv().ok();

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;
    init_logging(&config.log_format).context("failed to install logger")?;
    debug!(
        "admin chat {}, database {}",
        config.admin_chat_id, config.database_spec
    );

    let client = RequestClient::new().context("failed to build HTTP client")?;
    let mut poller = Poller::new(config.check_period());
    poller.plugins.extend(all_plugins(Arc::new(client)));
    poller.receivers.push(Box::new(LoggingReceiver));

    info!(
        "Checking {} plugin(s) every {}s",
        poller.plugins.len(),
        config.check_period
    );
    poller.run().await;
    Ok(())
}
