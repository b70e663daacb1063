use std::fs::File;
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use votex_gateway::GatewayConfig;

/// Port used when neither the command line, the environment nor the
/// configuration file provide one.
pub const DEFAULT_PORT: u16 = 5000;

/// Deployment mode. Selects the default log level and the startup banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

/// Command line of the `votex-api` binary. Every option can also be given
/// through the environment variable named next to it.
#[derive(Debug, Parser)]
#[clap(version, about = "HTTP API relaying election operations to the VoteX contract")]
pub struct Args {
    /// Optional TOML file. Command line and environment values take precedence.
    #[clap(long, env = "VOTEX_CONFIG")]
    pub config: Option<PathBuf>,
    /// JSON-RPC endpoint of an Ethereum node.
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// Hex-encoded private key of the contract owner.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
    /// Address of the deployed election contract.
    #[clap(long, env = "CONTRACT_ADDRESS")]
    pub contract_address: Option<String>,
    /// Port to listen on.
    #[clap(long, env = "PORT")]
    pub port: Option<u16>,
    #[clap(long = "env", env = "VOTEX_ENV", value_enum)]
    pub environment: Option<Environment>,
}

/// Contents of the optional configuration file. Every field may be omitted.
///
/// ```toml
/// environment = "production"
///
/// [http]
/// bind_host = "127.0.0.1"
/// port = 8080
///
/// [gateway]
/// rpc_url = "http://localhost:8545"
/// private_key = "0x..."
/// contract_address = "0x..."
/// confirmations = 2
/// ```
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub environment: Option<Environment>,
    #[serde(default)]
    pub http: HttpFileConfig,
    #[serde(default)]
    pub gateway: GatewayFileConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpFileConfig {
    pub bind_host: Option<IpAddr>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayFileConfig {
    pub rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub contract_address: Option<String>,
    pub confirmations: Option<usize>,
}

/// Where the server listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub bind: SocketAddr,
}

/// Fully resolved configuration of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub environment: Environment,
    pub gateway: GatewayConfig,
}

impl Args {
    /// Merges the arguments with the configuration file, if any, and
    /// validates the result.
    pub fn resolve(self) -> anyhow::Result<ServerConfig> {
        let file = match &self.config {
            Some(path) => from_toml_path(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: FileConfig) -> anyhow::Result<ServerConfig> {
        let rpc_url = self.rpc_url.or(file.gateway.rpc_url);
        let private_key = self.private_key.or(file.gateway.private_key);
        let contract_address = self.contract_address.or(file.gateway.contract_address);

        let mut gateway = GatewayConfig::from_parts(
            rpc_url.as_deref(),
            private_key.as_deref(),
            contract_address.as_deref(),
        )
        .context("Invalid gateway configuration")?;
        if let Some(confirmations) = file.gateway.confirmations {
            gateway.confirmations = confirmations;
        }

        let host = file
            .http
            .bind_host
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = self.port.or(file.http.port).unwrap_or(DEFAULT_PORT);

        Ok(ServerConfig {
            http: HttpConfig {
                bind: SocketAddr::new(host, port),
            },
            environment: self.environment.or(file.environment).unwrap_or_default(),
            gateway,
        })
    }
}

/// Reads a TOML file and deserializes it into `R`.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let mut contents = String::new();
    {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    }
    debug!("Config file size: {} bytes", contents.len());

    let result: R = toml::from_str(&contents)?;
    Ok(result)
}

/// Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
/// the default level of `environment`.
pub fn init_logging(environment: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(environment.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
