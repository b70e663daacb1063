use core::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable reason attached to every error response.
///
/// The set is closed: clients match on these values instead of searching
/// error messages for known phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A required field was absent or empty.
    MissingField,
    /// The request body could not be parsed.
    InvalidInput,
    /// An address is not `0x` followed by 40 hex digits.
    InvalidAddress,
    /// The voter has not been authorized by the election owner.
    VoterNotAuthorized,
    /// The voter already cast a vote in this round.
    AlreadyVoted,
    /// The election is over; no more votes or candidates are accepted.
    ElectionEnded,
    /// The election was asked to end a second time.
    AlreadyEnded,
    /// The voter was authorized before.
    AlreadyAuthorized,
    /// The candidate index does not exist.
    InvalidCandidate,
    /// A candidate with the same name is already registered.
    DuplicateCandidate,
    /// The contract refused to restart the election (wrong password, election
    /// still running, or no password set).
    RestartRejected,
    /// The contract reverted for a reason outside of the known set.
    ContractReverted,
    /// Network, provider or any other unexpected failure.
    Internal,
}

impl ErrorCode {
    /// Maps a contract revert reason onto a code. Reasons are matched
    /// case-insensitively against the strings the election contract emits.
    pub fn from_revert_reason(reason: &str) -> Self {
        let reason = reason.to_ascii_lowercase();
        if reason.contains("already authorized") {
            ErrorCode::AlreadyAuthorized
        } else if reason.contains("already voted") {
            ErrorCode::AlreadyVoted
        } else if reason.contains("already ended") {
            ErrorCode::AlreadyEnded
        } else if reason.contains("election ended") {
            ErrorCode::ElectionEnded
        } else if reason.contains("not authorized") {
            ErrorCode::VoterNotAuthorized
        } else if reason.contains("invalid candidate") {
            ErrorCode::InvalidCandidate
        } else if reason.contains("already exists") {
            ErrorCode::DuplicateCandidate
        } else {
            ErrorCode::ContractReverted
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    /// The wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidAddress => "INVALID_ADDRESS",
            ErrorCode::VoterNotAuthorized => "VOTER_NOT_AUTHORIZED",
            ErrorCode::AlreadyVoted => "ALREADY_VOTED",
            ErrorCode::ElectionEnded => "ELECTION_ENDED",
            ErrorCode::AlreadyEnded => "ALREADY_ENDED",
            ErrorCode::AlreadyAuthorized => "ALREADY_AUTHORIZED",
            ErrorCode::InvalidCandidate => "INVALID_CANDIDATE",
            ErrorCode::DuplicateCandidate => "DUPLICATE_CANDIDATE",
            ErrorCode::RestartRejected => "RESTART_REJECTED",
            ErrorCode::ContractReverted => "CONTRACT_REVERTED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable message. For chain failures this is the provider's
    /// message, passed through verbatim.
    pub error: String,
    /// Structured reason.
    pub code: ErrorCode,
}

impl ErrorBody {
    /// Creates a new error body.
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}
