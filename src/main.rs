use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use courtside::config::AppConfig;
use courtside::db;
use courtside::routes;
use courtside::services::seeding;
use courtside::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let mut conn = db::init_db(&config.database_url)?;

    if config.seed_schedules {
        let created = seeding::seed_schedules(&mut conn).context("failed to seed schedules")?;
        tracing::info!("seeded {created} schedules at startup");
    }

    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, admin routes are open");
    }

    let state = Arc::new(AppState::new(conn, config.clone()));
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
