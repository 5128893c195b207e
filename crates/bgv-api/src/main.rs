//! Binary entrypoint for the BGV development backend.
use bgv_api::{run, AppState};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Listen address can be overridden with BGV_DEV_ADDR
    let addr = std::env::var("BGV_DEV_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    let fresher_id = std::env::var("BGV_DEV_FRESHER").unwrap_or_else(|_| "fresher-001".to_string());

    let state = AppState::new();
    let candidate = state
        .register_candidate(
            fresher_id.as_str(),
            Some(json!({
                "firstName": "Asha",
                "lastName": "Verma",
                "email": "asha.verma@example.com",
                "dateOfBirth": "1999-04-12",
            })),
        )
        .await;
    let hr = state.register_hr("hr-dev").await;
    tracing::info!(fresher = %fresher_id, candidate_token = %candidate, hr_token = %hr, "Development tokens issued");

    run(&addr, state).await?;
    Ok(())
}
