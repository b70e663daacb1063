//! Turns client errors into messages for the person using the app.

use votex_interface::ErrorCode;

use crate::ClientError;

/// What the user was trying to do when a request failed. Selects the
/// message shown when the failure has no specific explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadElection,
    CastVote,
    CheckVoteStatus,
    AddCandidate,
    AuthorizeVoter,
    EndElection,
    RestartElection,
    SetRestartPassword,
}

impl Operation {
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::LoadElection => {
                "Failed to connect to blockchain. Please check your network connection and try again."
            }
            Operation::CastVote => "Failed to cast vote. Please try again.",
            Operation::CheckVoteStatus => "Failed to check vote status. Please try again.",
            Operation::AddCandidate => "Failed to add candidate. Please try again.",
            Operation::AuthorizeVoter => "Failed to authorize voter. Please try again.",
            Operation::EndElection => "Failed to end election. Please try again.",
            Operation::RestartElection => "Failed to restart election. Please check your password.",
            Operation::SetRestartPassword => "Failed to update restart password",
        }
    }
}

/// Explanation for a server error code, when there is one worth showing.
pub fn code_message(code: ErrorCode) -> Option<&'static str> {
    let message = match code {
        ErrorCode::AlreadyAuthorized => "This voter is already authorized",
        ErrorCode::VoterNotAuthorized => "You are not authorized to perform this action",
        ErrorCode::ElectionEnded => "The election has ended",
        ErrorCode::AlreadyVoted => "You have already voted in this election",
        ErrorCode::InvalidAddress => "Please enter a valid Ethereum address",
        ErrorCode::InvalidCandidate => "Please select a valid candidate",
        ErrorCode::DuplicateCandidate => "A candidate with this name already exists",
        ErrorCode::AlreadyEnded => "The election has already ended",
        ErrorCode::MissingField
        | ErrorCode::InvalidInput
        | ErrorCode::RestartRejected
        | ErrorCode::ContractReverted
        | ErrorCode::Internal => return None,
    };
    Some(message)
}

/// The message to show when `operation` failed with `err`.
pub fn user_message(err: &ClientError, operation: Operation) -> String {
    if let ClientError::Validation(invalid) = err {
        return invalid.to_string();
    }
    if operation == Operation::LoadElection {
        let message = match err {
            ClientError::Timeout => {
                "Blockchain connection timed out. The network may be slow. Please try again."
            }
            ClientError::Network(_) => {
                "Network error. Please check your internet connection and try again."
            }
            ClientError::Decode(_) => "Invalid data received from blockchain. Please try again.",
            _ => operation.fallback_message(),
        };
        return message.to_string();
    }
    err.code()
        .and_then(code_message)
        .unwrap_or_else(|| operation.fallback_message())
        .to_string()
}
