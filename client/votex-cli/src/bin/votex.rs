use clap::Parser;
use votex_cli::{init_logging, Cli};
use votex_client::VotexClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let Cli { api_url, workflow } = Cli::parse();

    let client = VotexClient::new(&api_url)?;
    workflow.run(&client, &mut std::io::stdout()).await
}
