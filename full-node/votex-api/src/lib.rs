//! HTTP front of the VoteX election contract.
//!
//! Every route under [`API_PREFIX`] maps to one contract operation: the
//! handler validates the request, calls the gateway, waits for the
//! transaction to be mined when the call is a write, and turns the outcome
//! into JSON. Nothing is cached; each request reads the chain again.

pub mod api;
pub mod config;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use votex_gateway::ElectionContract;
use votex_interface::API_PREFIX;

pub use crate::config::{Args, Environment, HttpConfig, ServerConfig};

pub type AppState = Arc<AppStateInner>;

/// The application state, to which every request handler has access.
pub struct AppStateInner {
    pub gateway: Arc<dyn ElectionContract>,
}

impl AppStateInner {
    pub fn new(gateway: Arc<dyn ElectionContract>) -> Self {
        Self { gateway }
    }
}

/// The complete application: API routes mounted under [`API_PREFIX`],
/// request tracing, and CORS open to every origin.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, api::router(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests;
