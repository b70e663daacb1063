mod admin;
mod election;
mod vote;

use std::io::Write;

pub use admin::AdminWorkflow;
pub use election::{dashboard, has_voted, results};
pub use vote::VoteArgs;
use votex_client::messages::{user_message, Operation};
use votex_client::validation::ValidationError;
use votex_client::{ClientError, VotexClient};

/// Everything the terminal front-end can do.
#[derive(clap::Subcommand)]
pub enum Workflows {
    /// Show the election status and the registered candidates
    Dashboard,
    /// Show the vote counts, shares and the leading candidate
    Results,
    /// Check whether an address has voted in the current round
    HasVoted {
        /// A 0x-prefixed Ethereum address
        address: String,
    },
    /// Cast a vote for a candidate
    Vote(VoteArgs),
    /// Administer the election
    #[clap(subcommand)]
    Admin(AdminWorkflow),
}

impl Workflows {
    pub async fn run(self, client: &VotexClient, out: &mut impl Write) -> anyhow::Result<()> {
        match self {
            Workflows::Dashboard => dashboard(client, out).await,
            Workflows::Results => results(client, out).await,
            Workflows::HasVoted { address } => has_voted(client, &address, out).await,
            Workflows::Vote(args) => args.run(client, out).await,
            Workflows::Admin(workflow) => workflow.run(client, out).await,
        }
    }
}

/// Replaces a client error with the message meant for the user.
fn fail(operation: Operation) -> impl FnOnce(ClientError) -> anyhow::Error {
    move |err| {
        tracing::debug!(?operation, error = %err, "Request failed");
        anyhow::anyhow!(user_message(&err, operation))
    }
}

/// Like [`fail`], for input refused before any request was sent.
fn invalid(operation: Operation) -> impl FnOnce(ValidationError) -> anyhow::Error {
    move |err| fail(operation)(ClientError::from(err))
}
