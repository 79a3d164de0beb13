use std::env;

use anyhow::Result;
use buddy_api::build_app;
use buddy_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("buddy_api");

    let bind = env::var("BUDDY_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app()?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "travel buddy review api started");

    axum::serve(listener, app).await?;
    Ok(())
}
