//! The gateway is the only component that talks to the election contract.
//!
//! Access is split into two capabilities: [`ElectionReader`] runs `view`
//! calls, which need no signature, and [`ElectionWriter`] submits signed
//! transactions and waits for them to be mined. [`EthersGateway`] implements
//! both against a JSON-RPC node. With the `mocks` feature enabled,
//! [`mocks::MockElection`] implements them in memory.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod contract;
mod error;
#[cfg(feature = "mocks")]
pub mod mocks;

use async_trait::async_trait;
pub use config::{ConfigError, GatewayConfig, SigningKey, DEFAULT_CONFIRMATIONS};
pub use contract::EthersGateway;
pub use error::GatewayError;
use ethers_core::types::{Address, TransactionReceipt, TxHash, U256};

/// Authorization state of a single address, as stored in the contract's
/// `voters` mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoterRecord {
    /// Set by the owner through `authorizeVoter`.
    pub authorized: bool,
    /// Set once the voter cast a vote in the current round.
    pub voted: bool,
}

/// A mined transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TxOutcome {
    /// Hash of the transaction.
    pub tx_hash: TxHash,
    /// Receipt returned by the node once the transaction was included.
    pub receipt: TransactionReceipt,
}

/// Read-only view of the election contract.
#[async_trait]
pub trait ElectionReader: Send + Sync {
    /// Number of registered candidates.
    async fn candidate_count(&self) -> Result<U256, GatewayError>;

    /// Name and vote count of the candidate at `index`.
    async fn candidate(&self, index: U256) -> Result<(String, U256), GatewayError>;

    /// Account that deployed the contract.
    async fn owner(&self) -> Result<Address, GatewayError>;

    /// Name the election was created with.
    async fn election_name(&self) -> Result<String, GatewayError>;

    /// Whether the current round has been ended.
    async fn election_ended(&self) -> Result<bool, GatewayError>;

    /// Votes cast in the current round.
    async fn total_votes(&self) -> Result<U256, GatewayError>;

    /// Number of times the election was restarted.
    async fn election_round(&self) -> Result<U256, GatewayError>;

    /// Whether a restart password has been configured.
    async fn restart_password_set(&self) -> Result<bool, GatewayError>;

    /// Whether `voter` voted in the current round.
    async fn has_voted(&self, voter: Address) -> Result<bool, GatewayError>;

    /// The full authorization record of `voter`.
    async fn voter(&self, voter: Address) -> Result<VoterRecord, GatewayError>;
}

/// Signed, state-changing calls. Every method returns once the transaction is
/// mined, and fails if it was reverted.
#[async_trait]
pub trait ElectionWriter: Send + Sync {
    /// Registers a new candidate.
    async fn add_candidate(&self, name: &str) -> Result<TxOutcome, GatewayError>;

    /// Allows `voter` to vote.
    async fn authorize_voter(&self, voter: Address) -> Result<TxOutcome, GatewayError>;

    /// Ends the current round.
    async fn end_election(&self) -> Result<TxOutcome, GatewayError>;

    /// Starts a new round, clearing candidates and voters.
    async fn restart_election(&self, password: &str) -> Result<TxOutcome, GatewayError>;

    /// Sets the password required by [`ElectionWriter::restart_election`].
    async fn set_restart_password(&self, password: &str) -> Result<TxOutcome, GatewayError>;

    /// Casts a vote for the candidate at `candidate_index`, signed by the
    /// gateway's account.
    async fn vote(&self, candidate_index: U256) -> Result<TxOutcome, GatewayError>;
}

/// Both halves of the contract.
pub trait ElectionContract: ElectionReader + ElectionWriter {}

impl<T: ElectionReader + ElectionWriter> ElectionContract for T {}
