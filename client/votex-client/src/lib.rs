//! Client for the VoteX HTTP API.
//!
//! Every call goes through a [`RetryPolicy`]: failed requests are sent again
//! with exponential backoff unless the server refused them as malformed,
//! unauthenticated or forbidden.

mod error;
pub mod messages;
mod retry;
pub mod validation;

use std::time::Duration;

pub use error::ClientError;
use reqwest::RequestBuilder;
pub use retry::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
pub use validation::ValidationError;
use votex_interface::{
    AddCandidateRequest, AuthorizeRequest, CandidateEntry, ElectionResults, ElectionStatus,
    ErrorBody, PasswordRequest, TxResponse, VoteRequest, VoteStatus,
};

/// API location used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
/// Upper bound for a single request. Writes wait for the transaction to be
/// mined, so this is generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<VotexClient, ClientError> {
        let mut base_url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(self.base_url));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(VotexClient {
            base_url,
            http,
            retry: self.retry,
        })
    }
}

/// Handle to a VoteX API server. Cheap to clone.
#[derive(Debug, Clone)]
pub struct VotexClient {
    base_url: Url,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl VotexClient {
    /// Client with the default timeout and retry policy.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn candidates(&self) -> Result<Vec<CandidateEntry>, ClientError> {
        self.retry
            .run("Fetching candidates", || self.get("candidates"))
            .await
    }

    pub async fn add_candidate(&self, name: &str) -> Result<TxResponse, ClientError> {
        let body = AddCandidateRequest {
            name: Some(name.to_string()),
        };
        self.retry
            .run("Adding candidate", || self.post("add-candidate", Some(&body)))
            .await
    }

    pub async fn authorize_voter(&self, address: &str) -> Result<TxResponse, ClientError> {
        let body = AuthorizeRequest {
            address: Some(address.to_string()),
        };
        self.retry
            .run("Authorizing voter", || self.post("authorize", Some(&body)))
            .await
    }

    pub async fn end_election(&self) -> Result<TxResponse, ClientError> {
        self.retry
            .run("Ending election", || self.post::<(), _>("end", None))
            .await
    }

    pub async fn restart_election(&self, password: &str) -> Result<TxResponse, ClientError> {
        let body = PasswordRequest {
            password: Some(password.to_string()),
        };
        self.retry
            .run("Restarting election", || self.post("restart", Some(&body)))
            .await
    }

    pub async fn set_restart_password(&self, password: &str) -> Result<TxResponse, ClientError> {
        let body = PasswordRequest {
            password: Some(password.to_string()),
        };
        self.retry
            .run("Setting restart password", || {
                self.post("set-restart-password", Some(&body))
            })
            .await
    }

    pub async fn status(&self) -> Result<ElectionStatus, ClientError> {
        self.retry
            .run("Fetching election status", || self.get("status"))
            .await
    }

    pub async fn results(&self) -> Result<ElectionResults, ClientError> {
        self.retry
            .run("Fetching election results", || self.get("results"))
            .await
    }

    pub async fn has_voted(&self, address: &str) -> Result<VoteStatus, ClientError> {
        let path = format!("has-voted/{}", address);
        self.retry
            .run("Checking vote status", || self.get(&path))
            .await
    }

    pub async fn cast_vote(
        &self,
        candidate_index: u64,
        voter_address: &str,
    ) -> Result<TxResponse, ClientError> {
        let body = VoteRequest {
            candidate_index: Some(candidate_index),
            voter_address: Some(voter_address.to_string()),
        };
        self.retry
            .run("Casting vote", || self.post("vote", Some(&body)))
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        send(self.http.get(url)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let request = self.http.post(url);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()));
    }
    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => Err(ClientError::Api { status, body }),
        Err(_) => Err(ClientError::UnexpectedStatus {
            status,
            message: String::from_utf8_lossy(&bytes).into_owned(),
        }),
    }
}
