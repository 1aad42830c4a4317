//! HTTP surface: form-encoded endpoints answering with a JSON envelope.

pub mod health;
pub mod invoices;
pub mod provinces;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{self, Database};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// `{status, message[, data]}` wrapper returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Envelope<()> {
    pub fn ok(message: &'static str) -> Self {
        Self {
            status: true,
            message,
            data: None,
        }
    }
}

impl<T> Envelope<T> {
    pub fn with_data(message: &'static str, data: T) -> Self {
        Self {
            status: true,
            message,
            data: Some(data),
        }
    }
}

/// `?id=` query parameter of the update endpoints
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/customer/store", post(invoices::store))
        .route("/api/customer/update", post(invoices::update))
        .route("/api/provinces", get(provinces::index))
        .route("/api/provinces/update", post(provinces::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect to the store and serve the API until the process is stopped
pub async fn serve(config: &Config) -> Result<()> {
    let db = db::init(config).await?;
    let app = build_router(AppState::new(db));

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
