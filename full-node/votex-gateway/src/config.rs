use core::fmt;
use core::str::FromStr;

use ethers_core::types::Address;
use ethers_signers::LocalWallet;
use serde::Deserialize;
use url::Url;

/// Blocks to wait for after a transaction is included.
pub const DEFAULT_CONFIRMATIONS: usize = 1;

/// Hex-encoded secp256k1 private key of the account that signs transactions.
///
/// The key never appears in `Debug` output, so configuration structs holding
/// it can be logged.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    /// Builds a wallet from the key.
    pub fn wallet(&self) -> Result<LocalWallet, ConfigError> {
        self.0
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| ConfigError::InvalidSigningKey(e.to_string()))
    }
}

impl FromStr for SigningKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = SigningKey(s.to_string());
        key.wallet()?;
        Ok(key)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Problems found while assembling a [`GatewayConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting has no value.
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    /// The RPC endpoint is not a valid URL.
    #[error("invalid RPC url: {0}")]
    InvalidRpcUrl(String),
    /// The private key could not be parsed.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),
    /// The contract address is not a 20-byte hex string.
    #[error("invalid contract address `{0}`")]
    InvalidContractAddress(String),
}

/// Everything the gateway needs to reach the contract. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint of an Ethereum node.
    pub rpc_url: Url,
    /// Key of the account that signs every write.
    pub signing_key: SigningKey,
    /// Address of the deployed election contract.
    pub contract_address: Address,
    /// Blocks to wait for after inclusion before a write is reported.
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

fn default_confirmations() -> usize {
    DEFAULT_CONFIRMATIONS
}

impl GatewayConfig {
    /// Validates raw settings, typically read from the environment.
    ///
    /// Absent or blank values are reported as [`ConfigError::Missing`] using
    /// the environment variable name.
    pub fn from_parts(
        rpc_url: Option<&str>,
        signing_key: Option<&str>,
        contract_address: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let rpc_url = require("RPC_URL", rpc_url)?;
        let signing_key = require("PRIVATE_KEY", signing_key)?;
        let contract_address = require("CONTRACT_ADDRESS", contract_address)?;

        Ok(Self {
            rpc_url: Url::parse(rpc_url).map_err(|e| ConfigError::InvalidRpcUrl(e.to_string()))?,
            signing_key: signing_key.parse()?,
            contract_address: contract_address
                .parse()
                .map_err(|_| ConfigError::InvalidContractAddress(contract_address.to_string()))?,
            confirmations: DEFAULT_CONFIRMATIONS,
        })
    }
}

fn require<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

#[cfg(test)]
mod tests {
    use ethers_signers::Signer;

    use super::*;

    // Well-known first development account of Hardhat and Anvil.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn builds_from_valid_parts() {
        let config = GatewayConfig::from_parts(
            Some("http://localhost:8545"),
            Some(DEV_KEY),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        )
        .unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(config.confirmations, DEFAULT_CONFIRMATIONS);
        let wallet = config.signing_key.wallet().unwrap();
        assert_eq!(wallet.address(), DEV_ADDRESS.parse::<Address>().unwrap());
    }

    #[test]
    fn key_without_prefix_is_accepted() {
        let key: SigningKey = DEV_KEY.trim_start_matches("0x").parse().unwrap();
        assert!(key.wallet().is_ok());
    }

    #[test]
    fn missing_values_fail_fast() {
        let err = GatewayConfig::from_parts(None, Some(DEV_KEY), Some("0x00")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("RPC_URL")));

        let err = GatewayConfig::from_parts(Some("http://localhost:8545"), Some("  "), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("PRIVATE_KEY")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = GatewayConfig::from_parts(Some("not a url"), Some(DEV_KEY), Some("0x00"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRpcUrl(_)));

        let err = GatewayConfig::from_parts(Some("http://localhost:8545"), Some("0x1234"), Some("0x00"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSigningKey(_)));

        let err = GatewayConfig::from_parts(Some("http://localhost:8545"), Some(DEV_KEY), Some("0x1234"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContractAddress(_)));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let key: SigningKey = DEV_KEY.parse().unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("ac0974"));
    }
}
