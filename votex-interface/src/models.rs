use ethers_core::types::{Address, TransactionReceipt, TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::tally;

/// One entry of `GET /candidates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Position of the candidate in the contract's list.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Votes received so far.
    #[serde(with = "crate::u256_decimal")]
    pub votes: U256,
}

/// One entry of the `candidates` array in `GET /results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCandidate {
    /// Position of the candidate in the contract's list.
    pub index: u64,
    /// Display name.
    pub name: String,
    /// Votes received so far.
    #[serde(with = "crate::u256_decimal")]
    pub votes: U256,
}

/// Response of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionStatus {
    /// Account that deployed the contract and may administer it.
    pub owner: Address,
    /// Name the election was created with.
    pub election_name: String,
    /// Whether the owner has ended the current round.
    pub election_ended: bool,
    /// Votes cast in the current round.
    #[serde(with = "crate::u256_decimal")]
    pub total_votes: U256,
    /// Number of times the election was restarted.
    #[serde(with = "crate::u256_decimal")]
    pub election_round: U256,
    /// Whether a restart password has been configured.
    pub restart_password_set: bool,
}

/// Response of `GET /results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    /// Sum of the votes of all candidates.
    #[serde(with = "crate::u256_decimal")]
    pub total_votes: U256,
    /// Every candidate, in contract order.
    pub candidates: Vec<ResultCandidate>,
    /// Name of the leading candidate, `None` when there are no candidates.
    pub winner: Option<String>,
}

impl ElectionResults {
    /// Tallies `candidates`, computing the total and the winner.
    pub fn from_candidates(candidates: Vec<ResultCandidate>) -> Self {
        let total_votes = tally::total_votes(&candidates);
        let winner = tally::winner(&candidates).map(|c| c.name.clone());
        Self {
            total_votes,
            candidates,
            winner,
        }
    }
}

/// Response of `GET /has-voted/:address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    /// The address that was queried.
    pub address: Address,
    /// Whether it voted in the current round.
    pub voted: bool,
}

/// Response of every endpoint that submits a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    /// Always `true`; failures are reported with an [`crate::ErrorBody`].
    pub success: bool,
    /// Hash of the submitted transaction.
    pub tx_hash: TxHash,
    /// Receipt of the mined transaction.
    pub receipt: TransactionReceipt,
    /// Confirmation text for operations that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /add-candidate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCandidateRequest {
    /// Name of the candidate to register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `POST /authorize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    /// `0x`-prefixed address of the voter to authorize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body of `POST /restart` and `POST /set-restart-password`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRequest {
    /// Restart password, in clear text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `POST /vote`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// Index of the chosen candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_index: Option<u64>,
    /// `0x`-prefixed address of the voter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voter_address: Option<String>,
}
