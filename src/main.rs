//! Vacancy analytics service — binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hh_vacancy_analyzer::api::{self, AppState};
use hh_vacancy_analyzer::areas::AreaCache;
use hh_vacancy_analyzer::config::Settings;
use hh_vacancy_analyzer::fetch::HhClient;
use hh_vacancy_analyzer::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hh_vacancy_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::load()?;
    let metrics = Metrics::init();

    let client = Arc::new(HhClient::new(&settings)?);
    let areas = Arc::new(AreaCache::load(&settings.area_cache_path));
    let state = AppState::new(client, areas);

    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
