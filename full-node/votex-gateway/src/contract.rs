use std::sync::Arc;

use async_trait::async_trait;
use ethers_contract::{Contract, ContractError};
use ethers_core::abi::{Abi, AbiError, Detokenize, Tokenize};
use ethers_core::types::{Address, U256, U64};
use ethers_middleware::SignerMiddleware;
use ethers_providers::{Http, Middleware, Provider};
use ethers_signers::{LocalWallet, Signer};
use tracing::{debug, info};

use crate::error::{decode_revert_reason, reason_from_message};
use crate::{
    ElectionReader, ElectionWriter, GatewayConfig, GatewayError, TxOutcome, VoterRecord,
};

const ELECTION_ABI: &str = include_str!("../abi/Election.json");

type ReadClient = Provider<Http>;
type WriteClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Gateway backed by a JSON-RPC node.
///
/// Reads go through a plain provider. Writes go through a signer middleware
/// holding the configured key, which fills in nonce, gas and chain id.
pub struct EthersGateway {
    reader: Contract<ReadClient>,
    writer: Contract<WriteClient>,
    signer: Address,
    confirmations: usize,
}

impl EthersGateway {
    /// Connects to the node and binds the election contract.
    ///
    /// The chain id is queried once here so that signed transactions carry
    /// it, which means the node must be reachable at startup.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let abi: Abi = serde_json::from_str(ELECTION_ABI)
            .map_err(|e| GatewayError::Chain(format!("bad contract ABI: {}", e)))?;
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| GatewayError::Chain(e.to_string()))?;
        let wallet = config.signing_key.wallet()?;
        let client = SignerMiddleware::new_with_provider_chain(provider.clone(), wallet)
            .await
            .map_err(|e| GatewayError::Chain(e.to_string()))?;
        let signer = client.address();

        info!(
            contract = ?config.contract_address,
            signer = ?signer,
            chain_id = client.signer().chain_id(),
            "Connected to election contract"
        );

        Ok(Self {
            reader: Contract::new(config.contract_address, abi.clone(), Arc::new(provider)),
            writer: Contract::new(config.contract_address, abi, Arc::new(client)),
            signer,
            confirmations: config.confirmations,
        })
    }

    /// Account that signs every write.
    pub fn signer(&self) -> Address {
        self.signer
    }

    async fn read<T, D>(&self, method: &str, args: T) -> Result<D, GatewayError>
    where
        T: Tokenize,
        D: Detokenize,
    {
        self.reader
            .method::<T, D>(method, args)
            .map_err(abi_error)?
            .call()
            .await
            .map_err(classify)
    }

    async fn write<T: Tokenize>(&self, method: &str, args: T) -> Result<TxOutcome, GatewayError> {
        let call = self.writer.method::<T, ()>(method, args).map_err(abi_error)?;
        let pending = call.send().await.map_err(classify)?;
        let tx_hash = *pending;
        debug!(method, tx_hash = ?tx_hash, "Transaction submitted");

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| GatewayError::Chain(e.to_string()))?
            .ok_or(GatewayError::Dropped(tx_hash))?;

        if receipt.status == Some(U64::zero()) {
            return Err(GatewayError::Reverted(format!(
                "transaction {:?} reverted",
                tx_hash
            )));
        }

        info!(
            method,
            tx_hash = ?tx_hash,
            block = ?receipt.block_number,
            "Transaction mined"
        );
        Ok(TxOutcome { tx_hash, receipt })
    }
}

fn abi_error(err: AbiError) -> GatewayError {
    GatewayError::Chain(err.to_string())
}

/// Separates contract rejections from transport failures.
fn classify<M: Middleware>(err: ContractError<M>) -> GatewayError {
    if let Some(reason) = err.as_revert().and_then(|data| decode_revert_reason(data.as_ref())) {
        return GatewayError::Reverted(reason);
    }
    let message = err.to_string();
    match reason_from_message(&message) {
        Some(reason) => GatewayError::Reverted(reason),
        None => GatewayError::Chain(message),
    }
}

#[async_trait]
impl ElectionReader for EthersGateway {
    async fn candidate_count(&self) -> Result<U256, GatewayError> {
        self.read("getNumCandidates", ()).await
    }

    async fn candidate(&self, index: U256) -> Result<(String, U256), GatewayError> {
        self.read("getCandidate", index).await
    }

    async fn owner(&self) -> Result<Address, GatewayError> {
        self.read("owner", ()).await
    }

    async fn election_name(&self) -> Result<String, GatewayError> {
        self.read("electionName", ()).await
    }

    async fn election_ended(&self) -> Result<bool, GatewayError> {
        self.read("electionEnded", ()).await
    }

    async fn total_votes(&self) -> Result<U256, GatewayError> {
        self.read("totalVotes", ()).await
    }

    async fn election_round(&self) -> Result<U256, GatewayError> {
        self.read("getElectionRound", ()).await
    }

    async fn restart_password_set(&self) -> Result<bool, GatewayError> {
        self.read("isRestartPasswordSet", ()).await
    }

    async fn has_voted(&self, voter: Address) -> Result<bool, GatewayError> {
        self.read("hasVoted", voter).await
    }

    async fn voter(&self, voter: Address) -> Result<VoterRecord, GatewayError> {
        let (authorized, voted): (bool, bool) = self.read("voters", voter).await?;
        Ok(VoterRecord { authorized, voted })
    }
}

#[async_trait]
impl ElectionWriter for EthersGateway {
    async fn add_candidate(&self, name: &str) -> Result<TxOutcome, GatewayError> {
        self.write("addCandidate", name.to_string()).await
    }

    async fn authorize_voter(&self, voter: Address) -> Result<TxOutcome, GatewayError> {
        self.write("authorizeVoter", voter).await
    }

    async fn end_election(&self) -> Result<TxOutcome, GatewayError> {
        self.write("endElection", ()).await
    }

    async fn restart_election(&self, password: &str) -> Result<TxOutcome, GatewayError> {
        self.write("restartElection", password.to_string()).await
    }

    async fn set_restart_password(&self, password: &str) -> Result<TxOutcome, GatewayError> {
        self.write("setRestartPassword", password.to_string()).await
    }

    async fn vote(&self, candidate_index: U256) -> Result<TxOutcome, GatewayError> {
        self.write("vote", candidate_index).await
    }
}
