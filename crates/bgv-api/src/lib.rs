//! BGV API: in-memory development backend
//!
//! Serves the REST contract the wizard and the HR review client speak, so both can
//! run end to end without the production service. State lives in memory and is
//! lost on restart.
//!
//! ```text
//! /api/bgv/submission                          GET   candidate bundle
//! /api/bgv/:section                            POST  save one section
//! /api/bgv/submit, /api/bgv/final-submit       POST  lifecycle
//! /api/bgv/hr/verification/:fresher_id         GET   submission + decisions
//! /api/bgv/hr/verify                           POST  one decision
//! /api/bgv/hr/upload-verification-document     POST  multipart evidence
//! /api/bgv/hr/send-email                       POST  notify candidate
//! /api/blob/view-token, /api/blob/:id          signed document access
//! ```
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, FresherRecord, Principal, Store, StoredBlob};

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/bgv/submission", get(handlers::get_submission))
        .route("/bgv/submit", post(handlers::submit))
        .route("/bgv/final-submit", post(handlers::final_submit))
        .route("/bgv/:section", post(handlers::save_section))
        .route("/bgv/hr/verification/:fresher_id", get(handlers::get_verification))
        .route("/bgv/hr/verify", post(handlers::verify))
        .route(
            "/bgv/hr/upload-verification-document",
            post(handlers::upload_verification_document),
        )
        .route("/bgv/hr/send-email", post(handlers::send_email))
        .route("/blob/view-token", post(handlers::view_token))
        .route("/blob/:id", get(handlers::get_blob))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
}

pub async fn run(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("BGV dev API listening on {}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await
}

/// Serve on a random local port; used by integration tests
pub async fn serve_ephemeral(state: AppState) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_app(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Dev API stopped");
        }
    });
    Ok((addr, handle))
}
