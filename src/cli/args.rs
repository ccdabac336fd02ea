use clap::{Parser, Subcommand};

/// AIChatty settings - API credentials and premium subscription
#[derive(Parser)]
#[command(name = "aichatty")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory to store settings (settings.json). Defaults to ~/.aichatty
    #[arg(long, global = true, env = "AICHATTY_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Timeout for credential validation requests, in seconds
    #[arg(long, global = true, env = "AICHATTY_PROBE_TIMEOUT_SECS")]
    pub probe_timeout_secs: Option<u64>,

    /// Product id of the monthly premium subscription
    #[arg(long, global = true, hide = true, env = "AICHATTY_PRODUCT_ID")]
    pub product_id: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an API key and save it on success
    ValidateKey {
        /// The API key to validate
        key: String,
    },
    /// Validate an API host and save it on success
    ValidateHost {
        /// Base URL of an OpenAI-compatible API
        host: String,
    },
    /// Delete the saved API key
    ClearKey,
    /// Restore the default API host
    ResetHost,
    /// Subscribe to AIChatty Premium
    Subscribe,
    /// Restore previous purchases
    Restore,
    /// Show saved credentials and premium status
    Status,
    /// Interactive session with process-lifetime state (modes, toasts)
    Shell,
}
