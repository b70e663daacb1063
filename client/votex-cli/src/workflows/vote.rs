use std::io::Write;

use anyhow::bail;
use votex_client::messages::{code_message, Operation};
use votex_client::validation::{validate_address, validate_candidate};
use votex_client::VotexClient;
use votex_interface::ErrorCode;

use super::{fail, invalid};

#[derive(clap::Args)]
pub struct VoteArgs {
    /// Index of the candidate, as listed by `dashboard`
    #[arg(long)]
    pub candidate: u64,
    /// Address casting the vote
    #[arg(long)]
    pub voter: String,
}

impl VoteArgs {
    /// Checks eligibility against the API, then casts the vote.
    pub async fn run(self, client: &VotexClient, out: &mut impl Write) -> anyhow::Result<()> {
        let voter = validate_address(&self.voter).map_err(invalid(Operation::CastVote))?;
        let voter = format!("{:?}", voter);

        let (status, candidates, vote_status) = futures::try_join!(
            client.status(),
            client.candidates(),
            client.has_voted(&voter)
        )
        .map_err(fail(Operation::LoadElection))?;

        if status.election_ended {
            bail!(message(ErrorCode::ElectionEnded));
        }
        if vote_status.voted {
            bail!(message(ErrorCode::AlreadyVoted));
        }
        let candidate = validate_candidate(self.candidate, &candidates)
            .map_err(invalid(Operation::CastVote))?;

        let response = client
            .cast_vote(candidate.id, &voter)
            .await
            .map_err(fail(Operation::CastVote))?;

        writeln!(out, "Voted for {}", candidate.name)?;
        writeln!(out, "Transaction: {:?}", response.tx_hash)?;
        Ok(())
    }
}

fn message(code: ErrorCode) -> &'static str {
    code_message(code).unwrap_or_else(|| Operation::CastVote.fallback_message())
}
