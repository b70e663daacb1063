//! In-memory stand-in for the election contract.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use ethers_core::types::{Address, TransactionReceipt, H256, U256, U64};
use ethers_core::utils::keccak256;

use crate::{ElectionReader, ElectionWriter, GatewayError, TxOutcome, VoterRecord};

/// Message returned by every call while the mock is offline.
pub const OFFLINE_MESSAGE: &str = "error sending request: connection refused";

#[derive(Debug)]
struct State {
    name: String,
    ended: bool,
    round: U256,
    total_votes: U256,
    restart_password: Option<String>,
    candidates: Vec<(String, U256)>,
    voters: HashMap<Address, VoterRecord>,
    block: u64,
    offline: bool,
}

/// An election held in memory, following the rules the deployed contract
/// enforces and rejecting calls with the same revert reasons.
///
/// Every write is sent by [`MockElection::signer`], which is also the owner.
/// In particular [`ElectionWriter::vote`] checks and updates the signer's own
/// voter record.
#[derive(Debug)]
pub struct MockElection {
    signer: Address,
    contract: Address,
    state: Mutex<State>,
}

impl Default for MockElection {
    fn default() -> Self {
        Self::new("Mock Election")
    }
}

impl MockElection {
    /// Creates an active election with no candidates.
    pub fn new(name: &str) -> Self {
        Self {
            signer: Address::repeat_byte(0x11),
            contract: Address::repeat_byte(0xee),
            state: Mutex::new(State {
                name: name.to_string(),
                ended: false,
                round: U256::one(),
                total_votes: U256::zero(),
                restart_password: None,
                candidates: Vec::new(),
                voters: HashMap::new(),
                block: 0,
                offline: false,
            }),
        }
    }

    /// Account that owns the contract and signs every write.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Makes every following call fail as if the node were unreachable.
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    /// Undoes [`MockElection::go_offline`].
    pub fn go_online(&self) {
        self.lock().offline = false;
    }

    /// Overwrites the vote count of a candidate, keeping the total consistent.
    /// Does nothing if `index` is out of range.
    pub fn set_votes(&self, index: usize, votes: u64) {
        let mut state = self.lock();
        let votes = U256::from(votes);
        let previous = match state.candidates.get_mut(index) {
            Some(candidate) => std::mem::replace(&mut candidate.1, votes),
            None => return,
        };
        state.total_votes = state.total_votes - previous + votes;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Locks the state, failing if the mock is offline.
    fn connect(&self) -> Result<MutexGuard<'_, State>, GatewayError> {
        let state = self.lock();
        if state.offline {
            return Err(GatewayError::Chain(OFFLINE_MESSAGE.to_string()));
        }
        Ok(state)
    }

    fn mine(&self, state: &mut State) -> TxOutcome {
        state.block += 1;
        let tx_hash = H256::from(keccak256(state.block.to_be_bytes()));
        let receipt = TransactionReceipt {
            transaction_hash: tx_hash,
            block_number: Some(U64::from(state.block)),
            from: self.signer,
            to: Some(self.contract),
            status: Some(U64::one()),
            ..Default::default()
        };
        TxOutcome { tx_hash, receipt }
    }
}

fn revert(reason: &str) -> GatewayError {
    GatewayError::Reverted(reason.to_string())
}

#[async_trait]
impl ElectionReader for MockElection {
    async fn candidate_count(&self) -> Result<U256, GatewayError> {
        Ok(U256::from(self.connect()?.candidates.len()))
    }

    async fn candidate(&self, index: U256) -> Result<(String, U256), GatewayError> {
        let state = self.connect()?;
        if index >= U256::from(state.candidates.len()) {
            return Err(revert("Invalid candidate"));
        }
        Ok(state.candidates[index.as_usize()].clone())
    }

    async fn owner(&self) -> Result<Address, GatewayError> {
        self.connect()?;
        Ok(self.signer)
    }

    async fn election_name(&self) -> Result<String, GatewayError> {
        Ok(self.connect()?.name.clone())
    }

    async fn election_ended(&self) -> Result<bool, GatewayError> {
        Ok(self.connect()?.ended)
    }

    async fn total_votes(&self) -> Result<U256, GatewayError> {
        Ok(self.connect()?.total_votes)
    }

    async fn election_round(&self) -> Result<U256, GatewayError> {
        Ok(self.connect()?.round)
    }

    async fn restart_password_set(&self) -> Result<bool, GatewayError> {
        Ok(self.connect()?.restart_password.is_some())
    }

    async fn has_voted(&self, voter: Address) -> Result<bool, GatewayError> {
        let state = self.connect()?;
        Ok(state.voters.get(&voter).map_or(false, |r| r.voted))
    }

    async fn voter(&self, voter: Address) -> Result<VoterRecord, GatewayError> {
        let state = self.connect()?;
        Ok(state.voters.get(&voter).copied().unwrap_or_default())
    }
}

#[async_trait]
impl ElectionWriter for MockElection {
    async fn add_candidate(&self, name: &str) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        if state.ended {
            return Err(revert("Election ended"));
        }
        if state.candidates.iter().any(|(existing, _)| existing == name) {
            return Err(revert("Candidate already exists"));
        }
        state.candidates.push((name.to_string(), U256::zero()));
        Ok(self.mine(&mut state))
    }

    async fn authorize_voter(&self, voter: Address) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        let record = state.voters.entry(voter).or_default();
        if record.authorized {
            return Err(revert("Already authorized"));
        }
        record.authorized = true;
        Ok(self.mine(&mut state))
    }

    async fn end_election(&self) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        if state.ended {
            return Err(revert("Already ended"));
        }
        state.ended = true;
        Ok(self.mine(&mut state))
    }

    async fn restart_election(&self, password: &str) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        if !state.ended {
            return Err(revert("Election still active"));
        }
        match state.restart_password.as_deref() {
            None => return Err(revert("Restart password not set")),
            Some(expected) if expected != password => return Err(revert("Invalid password")),
            Some(_) => {}
        }
        state.ended = false;
        state.round += U256::one();
        state.total_votes = U256::zero();
        state.candidates.clear();
        state.voters.clear();
        Ok(self.mine(&mut state))
    }

    async fn set_restart_password(&self, password: &str) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        if password.is_empty() {
            return Err(revert("Password cannot be empty"));
        }
        state.restart_password = Some(password.to_string());
        Ok(self.mine(&mut state))
    }

    async fn vote(&self, candidate_index: U256) -> Result<TxOutcome, GatewayError> {
        let mut state = self.connect()?;
        if state.ended {
            return Err(revert("Election ended"));
        }
        let record = state.voters.get(&self.signer).copied().unwrap_or_default();
        if !record.authorized {
            return Err(revert("Not authorized"));
        }
        if record.voted {
            return Err(revert("Already voted"));
        }
        if candidate_index >= U256::from(state.candidates.len()) {
            return Err(revert("Invalid candidate"));
        }

        state.candidates[candidate_index.as_usize()].1 += U256::one();
        state.total_votes += U256::one();
        state.voters.insert(
            self.signer,
            VoterRecord {
                authorized: true,
                voted: true,
            },
        );
        Ok(self.mine(&mut state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn vote_requires_authorization_once() {
        let election = MockElection::default();
        election.add_candidate("Alice").await.unwrap();

        let err = election.vote(U256::zero()).await.unwrap_err();
        assert_eq!(err.revert_reason(), Some("Not authorized"));

        election.authorize_voter(election.signer()).await.unwrap();
        election.vote(U256::zero()).await.unwrap();
        assert!(election.has_voted(election.signer()).await.unwrap());
        assert_eq!(election.candidate(U256::zero()).await.unwrap().1, U256::one());

        let err = election.vote(U256::zero()).await.unwrap_err();
        assert_eq!(err.revert_reason(), Some("Already voted"));
    }

    #[tokio::test]
    async fn restart_needs_end_and_matching_password() {
        let election = MockElection::default();
        election.add_candidate("Alice").await.unwrap();

        let err = election.restart_election("secret").await.unwrap_err();
        assert_eq!(err.revert_reason(), Some("Election still active"));

        election.end_election().await.unwrap();
        let err = election.restart_election("secret").await.unwrap_err();
        assert_eq!(err.revert_reason(), Some("Restart password not set"));

        election.set_restart_password("secret").await.unwrap();
        let err = election.restart_election("guess").await.unwrap_err();
        assert_eq!(err.revert_reason(), Some("Invalid password"));

        election.restart_election("secret").await.unwrap();
        assert_eq!(election.election_round().await.unwrap(), U256::from(2));
        assert_eq!(election.candidate_count().await.unwrap(), U256::zero());
        assert!(!election.election_ended().await.unwrap());
    }

    #[tokio::test]
    async fn every_write_gets_a_distinct_receipt() {
        let election = MockElection::default();
        let first = election.add_candidate("Alice").await.unwrap();
        let second = election.add_candidate("Bob").await.unwrap();

        assert_ne!(first.tx_hash, second.tx_hash);
        assert_eq!(first.receipt.transaction_hash, first.tx_hash);
        assert_eq!(second.receipt.block_number, Some(U64::from(2)));
        assert_eq!(second.receipt.status, Some(U64::one()));
    }

    #[tokio::test]
    async fn offline_calls_fail_with_chain_errors() {
        let election = MockElection::default();
        election.go_offline();
        assert!(matches!(
            election.candidate_count().await,
            Err(GatewayError::Chain(_))
        ));
        election.go_online();
        assert!(election.candidate_count().await.is_ok());
    }
}
