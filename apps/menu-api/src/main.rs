use axum_helpers::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use menu_api::{AppState, Config};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState::connect(config).await?;
    let app = menu_api::app(&state)?;

    info!(
        backend = %state.config.backend,
        assets = %state.config.assets.dir.display(),
        "Starting Menu API with graceful shutdown (30s timeout)"
    );

    let store = state.store.clone();
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing the document store");
        store.close().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Menu API shutdown complete");
    Ok(())
}
