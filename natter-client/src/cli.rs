//! Command-line argument parsing for the natter client
//!
//! Uses clap for argument parsing with derive macros.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::session::SessionConfig;

/// natter - minimal line-based chat client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Chat server host (overrides the config file)
    #[arg(long, env = "NATTER_HOST")]
    pub host: Option<String>,

    /// Chat server port (overrides the config file)
    #[arg(long, short = 'p', env = "NATTER_PORT")]
    pub port: Option<u16>,

    /// Username announced to the server
    #[arg(long, short = 'u', env = "NATTER_USER")]
    pub user: Option<String>,

    /// Connect timeout in milliseconds
    ///
    /// By default connect waits as long as the operating system does.
    /// 0 also means no timeout.
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Custom config file path
    ///
    /// Override the default `~/.config/natter/config.toml`.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file to read
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(natter_utils::config_file)
    }

    /// Merge flags over the file config
    pub fn session_config(&self, file: &ClientConfig) -> SessionConfig {
        let mut config = file.session_config();

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(user) = &self.user {
            config.username = user.clone();
        }
        if let Some(ms) = self.connect_timeout {
            config.connect_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        config
    }
}
