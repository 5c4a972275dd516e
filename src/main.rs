use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daily_dashboard::config::Config;
use daily_dashboard::dashboard::Dashboard;
use daily_dashboard::fetcher::Fetcher;
use daily_dashboard::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_dashboard=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load the built-in feed table
    let config = Config::builtin()?;
    let registry = config.registry();
    info!(
        "Loaded {} categories ({} sources)",
        registry.categories().len(),
        registry.source_count()
    );

    let dashboard = Dashboard::new(registry, Fetcher::new()?, config.owner.clone());

    let state = Arc::new(AppState {
        dashboard: Arc::new(dashboard),
    });

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("Server starting on http://{}", config.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
