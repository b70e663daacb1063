//! Owner-only operations. Each one prints the refreshed election status once
//! its transaction is mined.

use std::io::Write;

use votex_client::messages::Operation;
use votex_client::validation::{
    validate_address, validate_candidate_name, validate_new_password, validate_restart_password,
};
use votex_client::VotexClient;
use votex_interface::TxResponse;

use super::{fail, invalid};
use crate::render;

#[derive(clap::Subcommand)]
pub enum AdminWorkflow {
    /// Register a new candidate
    AddCandidate {
        /// Display name of the candidate
        name: String,
    },
    /// Allow an address to vote
    Authorize {
        /// A 0x-prefixed Ethereum address
        address: String,
    },
    /// Close the current round
    End,
    /// Start a new round, clearing candidates and voters
    Restart {
        /// The restart password
        #[arg(long)]
        password: String,
    },
    /// Set the password required to restart the election
    SetRestartPassword {
        /// At least 6 characters
        #[arg(long)]
        password: String,
    },
}

impl AdminWorkflow {
    pub async fn run(self, client: &VotexClient, out: &mut impl Write) -> anyhow::Result<()> {
        let (operation, response) = match self {
            AdminWorkflow::AddCandidate { name } => {
                let op = Operation::AddCandidate;
                let name = validate_candidate_name(&name).map_err(invalid(op))?;
                let response = client.add_candidate(name).await.map_err(fail(op))?;
                writeln!(out, "Candidate \"{}\" added", name)?;
                (op, response)
            }
            AdminWorkflow::Authorize { address } => {
                let op = Operation::AuthorizeVoter;
                let address = validate_address(&address).map_err(invalid(op))?;
                let address = format!("{:?}", address);
                let response = client.authorize_voter(&address).await.map_err(fail(op))?;
                writeln!(out, "Voter {} authorized", address)?;
                (op, response)
            }
            AdminWorkflow::End => {
                let op = Operation::EndElection;
                let response = client.end_election().await.map_err(fail(op))?;
                writeln!(out, "Election ended")?;
                (op, response)
            }
            AdminWorkflow::Restart { password } => {
                let op = Operation::RestartElection;
                let password = validate_restart_password(&password).map_err(invalid(op))?;
                let response = client.restart_election(password).await.map_err(fail(op))?;
                (op, response)
            }
            AdminWorkflow::SetRestartPassword { password } => {
                let op = Operation::SetRestartPassword;
                let password = validate_new_password(&password).map_err(invalid(op))?;
                let response = client
                    .set_restart_password(password)
                    .await
                    .map_err(fail(op))?;
                (op, response)
            }
        };

        report(&response, out)?;
        tracing::debug!(?operation, "Refreshing election status");
        let status = client.status().await.map_err(fail(Operation::LoadElection))?;
        write!(out, "{}", render::status_summary(&status))?;
        Ok(())
    }
}

fn report(response: &TxResponse, out: &mut impl Write) -> std::io::Result<()> {
    if let Some(message) = &response.message {
        writeln!(out, "{}", message)?;
    }
    writeln!(out, "Transaction: {:?}", response.tx_hash)?;
    if let Some(block) = response.receipt.block_number {
        writeln!(out, "Mined in block {}", block)?;
    }
    Ok(())
}
