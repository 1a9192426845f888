// ==========================================
// Order Batch Ingestion Service - Entry point
// ==========================================

use anyhow::Context;
use clap::Parser;
use order_ingest::api::{build_router, build_state};
use order_ingest::config::Settings;
use order_ingest::{db, logging};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();

    logging::init();

    let business_tz = settings.business_tz()?;

    // Database bootstrap
    if let Some(parent) = Path::new(&settings.database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
    }
    let conn = db::open_connection(&settings.database)
        .with_context(|| format!("could not open database at {}", settings.database))?;
    db::bootstrap_schema(&conn).context("schema bootstrap failed")?;
    let conn = Arc::new(Mutex::new(conn));

    // Explicit wiring
    let state = build_state(
        conn,
        settings.jwt_secret.clone(),
        business_tz,
        settings.batch_size_hint,
    )
    .context("could not wire application state")?;
    let app = build_router(state);

    tracing::info!(
        addr = %settings.listen,
        database = %settings.database,
        timezone = %settings.timezone,
        "order ingest service starting"
    );

    let listener = TcpListener::bind(settings.listen)
        .await
        .with_context(|| format!("could not bind {}", settings.listen))?;

    axum::serve(listener, app).await?;

    Ok(())
}
