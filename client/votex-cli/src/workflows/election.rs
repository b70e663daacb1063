//! Read-only views of the election.

use std::io::Write;

use votex_client::messages::Operation;
use votex_client::validation::validate_address;
use votex_client::VotexClient;

use super::{fail, invalid};
use crate::render;

pub async fn dashboard(client: &VotexClient, out: &mut impl Write) -> anyhow::Result<()> {
    let (status, candidates) = futures::try_join!(client.status(), client.candidates())
        .map_err(fail(Operation::LoadElection))?;

    write!(out, "{}", render::status_summary(&status))?;
    writeln!(out, "Candidates:")?;
    write!(out, "{}", render::candidate_table(&candidates))?;
    Ok(())
}

pub async fn results(client: &VotexClient, out: &mut impl Write) -> anyhow::Result<()> {
    let (status, results) = futures::try_join!(client.status(), client.results())
        .map_err(fail(Operation::LoadElection))?;

    let heading = if status.election_ended {
        "Final results"
    } else {
        "Live results"
    };
    writeln!(out, "{} for {}", heading, status.election_name)?;
    write!(out, "{}", render::results_table(&results))?;
    Ok(())
}

pub async fn has_voted(
    client: &VotexClient,
    address: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let address = validate_address(address).map_err(invalid(Operation::CheckVoteStatus))?;
    let status = client
        .has_voted(&format!("{:?}", address))
        .await
        .map_err(fail(Operation::CheckVoteStatus))?;

    if status.voted {
        writeln!(out, "{:?} has voted in this round", status.address)?;
    } else {
        writeln!(out, "{:?} has not voted yet", status.address)?;
    }
    Ok(())
}
