use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use votex_api::config::init_logging;
use votex_api::{app, AppStateInner, Args, Environment, ServerConfig};
use votex_gateway::EthersGateway;
use votex_interface::API_PREFIX;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().resolve()?;
    init_logging(config.environment);

    let gateway = EthersGateway::connect(&config.gateway)
        .await
        .context("Failed to connect to the election contract")?;
    let app_state = Arc::new(AppStateInner::new(Arc::new(gateway)));

    print_banner(&config);
    info!(socket_addr = config.http.bind.to_string(), "Serving requests...");

    axum::Server::bind(&config.http.bind)
        .serve(app(app_state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn print_banner(config: &ServerConfig) {
    match config.environment {
        Environment::Development => {
            info!("VoteX API (development)");
            info!(
                rpc_url = %config.gateway.rpc_url,
                contract = ?config.gateway.contract_address,
                "Gateway configured"
            );
            info!(
                "API available at http://localhost:{}{}",
                config.http.bind.port(),
                API_PREFIX
            );
        }
        Environment::Production => {
            info!(port = config.http.bind.port(), "VoteX API started");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
