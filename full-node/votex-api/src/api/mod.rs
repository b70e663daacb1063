mod error;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
pub use error::ApiError;
use futures::future::try_join_all;
use tracing::info;
use votex_gateway::{ElectionContract, GatewayError, TxOutcome};
use votex_interface::{
    AddCandidateRequest, Address, AuthorizeRequest, CandidateEntry, ElectionResults,
    ElectionStatus, ErrorCode, PasswordRequest, ResultCandidate, TxResponse, VoteRequest,
    VoteStatus, U256,
};

use crate::AppState;

type AxumState = State<AppState>;
type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/candidates", get(get_candidates))
        .route("/add-candidate", post(add_candidate))
        .route("/authorize", post(authorize_voter))
        .route("/end", post(end_election))
        .route("/restart", post(restart_election))
        .route("/set-restart-password", post(set_restart_password))
        .route("/status", get(get_status))
        .route("/results", get(get_results))
        .route("/has-voted", get(missing_address))
        .route("/has-voted/", get(missing_address))
        .route("/has-voted/:address", get(has_voted))
        .route("/vote", post(cast_vote))
        .with_state(app_state)
}

/// Unwraps a JSON body. A request without a JSON content type is treated as
/// an empty object, so that it fails on the missing field instead.
fn body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::InvalidInput(rejection.body_text())),
    }
}

fn required(value: Option<String>, message: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(message)),
    }
}

/// Parses a `0x`-prefixed, 20-byte hex address.
fn parse_address(raw: &str) -> Result<Address, ApiError> {
    let raw = raw.trim();
    let invalid = || ApiError::InvalidAddress(raw.to_string());
    if !(raw.starts_with("0x") || raw.starts_with("0X")) || raw.len() != 42 {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

fn tx_response(outcome: TxOutcome, message: Option<&str>) -> Json<TxResponse> {
    Json(TxResponse {
        success: true,
        tx_hash: outcome.tx_hash,
        receipt: outcome.receipt,
        message: message.map(str::to_string),
    })
}

/// Reads every candidate concurrently, in contract order.
async fn fetch_candidates(gateway: &dyn ElectionContract) -> Result<Vec<(String, U256)>, ApiError> {
    let count = gateway.candidate_count().await?;
    if count > U256::from(u64::MAX) {
        return Err(GatewayError::Chain(format!("candidate count {} out of range", count)).into());
    }
    let reads = (0..count.low_u64()).map(|index| gateway.candidate(U256::from(index)));
    Ok(try_join_all(reads).await?)
}

async fn get_candidates(State(state): AxumState) -> ApiResult<Vec<CandidateEntry>> {
    let candidates = fetch_candidates(state.gateway.as_ref()).await?;
    Ok(Json(
        candidates
            .into_iter()
            .enumerate()
            .map(|(id, (name, votes))| CandidateEntry {
                id: id as u64,
                name,
                votes,
            })
            .collect(),
    ))
}

async fn get_results(State(state): AxumState) -> ApiResult<ElectionResults> {
    let candidates = fetch_candidates(state.gateway.as_ref()).await?;
    let candidates = candidates
        .into_iter()
        .enumerate()
        .map(|(index, (name, votes))| ResultCandidate {
            index: index as u64,
            name,
            votes,
        })
        .collect();
    Ok(Json(ElectionResults::from_candidates(candidates)))
}

async fn get_status(State(state): AxumState) -> ApiResult<ElectionStatus> {
    let gateway = &state.gateway;
    let (owner, election_name, election_ended, total_votes, election_round, restart_password_set) =
        futures::try_join!(
            gateway.owner(),
            gateway.election_name(),
            gateway.election_ended(),
            gateway.total_votes(),
            gateway.election_round(),
            gateway.restart_password_set(),
        )?;

    Ok(Json(ElectionStatus {
        owner,
        election_name,
        election_ended,
        total_votes,
        election_round,
        restart_password_set,
    }))
}

async fn missing_address() -> ApiError {
    ApiError::MissingField("Missing address param")
}

async fn has_voted(State(state): AxumState, Path(address): Path<String>) -> ApiResult<VoteStatus> {
    if address.trim().is_empty() {
        return Err(ApiError::MissingField("Missing address param"));
    }
    let address = parse_address(&address)?;
    let voted = state.gateway.has_voted(address).await?;
    Ok(Json(VoteStatus { address, voted }))
}

async fn add_candidate(
    State(state): AxumState,
    request: Result<Json<AddCandidateRequest>, JsonRejection>,
) -> ApiResult<TxResponse> {
    let name = required(body(request)?.name, "Missing 'name' in body")?;
    let outcome = state.gateway.add_candidate(&name).await?;
    info!(%name, tx_hash = ?outcome.tx_hash, "Candidate added");
    Ok(tx_response(outcome, None))
}

async fn authorize_voter(
    State(state): AxumState,
    request: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> ApiResult<TxResponse> {
    let address = required(body(request)?.address, "Missing 'address' in body")?;
    let voter = parse_address(&address)?;
    let outcome = state.gateway.authorize_voter(voter).await?;
    info!(voter = ?voter, tx_hash = ?outcome.tx_hash, "Voter authorized");
    Ok(tx_response(outcome, None))
}

async fn end_election(State(state): AxumState) -> ApiResult<TxResponse> {
    let outcome = state.gateway.end_election().await?;
    info!(tx_hash = ?outcome.tx_hash, "Election ended");
    Ok(tx_response(outcome, None))
}

async fn restart_election(
    State(state): AxumState,
    request: Result<Json<PasswordRequest>, JsonRejection>,
) -> ApiResult<TxResponse> {
    let password = required(body(request)?.password, "Missing 'password' in body")?;
    let outcome = state
        .gateway
        .restart_election(&password)
        .await
        .map_err(|err| match err.revert_reason() {
            Some(reason) => ApiError::RestartRejected(reason.to_string()),
            None => ApiError::Gateway(err),
        })?;
    info!(tx_hash = ?outcome.tx_hash, "Election restarted");
    Ok(tx_response(outcome, Some("Election restarted successfully")))
}

async fn set_restart_password(
    State(state): AxumState,
    request: Result<Json<PasswordRequest>, JsonRejection>,
) -> ApiResult<TxResponse> {
    let password = required(body(request)?.password, "Missing 'password' in body")?;
    let outcome = state.gateway.set_restart_password(&password).await?;
    info!(tx_hash = ?outcome.tx_hash, "Restart password updated");
    Ok(tx_response(
        outcome,
        Some("Restart password updated successfully"),
    ))
}

async fn cast_vote(
    State(state): AxumState,
    request: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<TxResponse> {
    const MISSING: &str = "Missing candidateIndex or voterAddress";

    let request = body(request)?;
    let candidate_index = request
        .candidate_index
        .ok_or(ApiError::MissingField(MISSING))?;
    let voter = parse_address(&required(request.voter_address, MISSING)?)?;

    // Racy with other voters' transactions; the contract checks again.
    let record = state.gateway.voter(voter).await?;
    if !record.authorized {
        return Err(ApiError::Forbidden(
            ErrorCode::VoterNotAuthorized,
            "Voter not authorized",
        ));
    }
    if record.voted {
        return Err(ApiError::Forbidden(
            ErrorCode::AlreadyVoted,
            "Voter has already voted",
        ));
    }
    if state.gateway.election_ended().await? {
        return Err(ApiError::Forbidden(
            ErrorCode::ElectionEnded,
            "Election has ended",
        ));
    }

    let outcome = state.gateway.vote(U256::from(candidate_index)).await?;
    info!(
        voter = ?voter,
        candidate_index,
        tx_hash = ?outcome.tx_hash,
        "Vote cast"
    );
    Ok(tx_response(outcome, Some("Vote cast successfully")))
}
