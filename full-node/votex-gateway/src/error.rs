use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::TxHash;

use crate::ConfigError;

/// Selector of Solidity's `Error(string)`, the payload of `require` failures.
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Failures of a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The contract rejected the call. Holds the revert reason.
    #[error("{0}")]
    Reverted(String),
    /// The transaction was sent but the node stopped tracking it.
    #[error("transaction {0:?} was dropped before being mined")]
    Dropped(TxHash),
    /// The node could not be reached, or answered with something other than
    /// a revert.
    #[error("{0}")]
    Chain(String),
    /// The gateway could not be set up from its configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    /// The revert reason, if the contract rejected the call.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            GatewayError::Reverted(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Decodes the reason string out of ABI-encoded revert data.
pub(crate) fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR[..])?;
    match abi::decode(&[ParamType::String], payload).ok()?.pop()? {
        Token::String(reason) => Some(reason),
        _ => None,
    }
}

/// Extracts the reason from a node message such as
/// `execution reverted: Already voted`.
pub(crate) fn reason_from_message(message: &str) -> Option<String> {
    let (_, rest) = message.split_once("execution reverted")?;
    let reason = rest.trim_start_matches(':').trim();
    if reason.is_empty() {
        Some(message.to_string())
    } else {
        Some(reason.to_string())
    }
}
