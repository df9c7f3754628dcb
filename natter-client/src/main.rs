//! natter client - line-based chat over TCP
//!
//! This is the main entry point for the natter console client.

use natter_client::cli::Args;
use natter_client::config::load_config;
use natter_client::console;
use natter_utils::{init_logging_with_config, LogConfig, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    // Log to file, stdout is the chat display
    init_logging_with_config(LogConfig::client())?;
    tracing::info!("natter client starting");
    tracing::debug!("CLI args: {:?}", args);

    let file_config = load_config(&args.config_path());
    let config = args.session_config(&file_config);

    match console::run(config).await {
        Ok(()) => {
            tracing::info!("natter client exiting normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("natter client error: {}", e);
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}
