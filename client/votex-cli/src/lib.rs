//! Terminal front-end for the VoteX API: the dashboard, results, voting and
//! admin views as subcommands.
//!
//! Input is validated locally before any request is sent, and every failure
//! is reported with the message from [`votex_client::messages`].

pub mod render;
pub mod workflows;

pub use clap;
use tracing_subscriber::EnvFilter;
use votex_client::DEFAULT_API_URL;
pub use workflows::Workflows;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the VoteX API
    #[arg(long, env = "VOTEX_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    #[command(subcommand)]
    pub workflow: Workflows,
}

/// Logs go to stderr so they never mix with command output. Failed attempts
/// are logged at `warn`, which keeps retries visible by default.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
