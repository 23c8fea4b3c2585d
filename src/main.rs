use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use taxfilter::catalog::MemoryCatalog;
use taxfilter::error::Result;
use taxfilter::server::{router, AppState};
use taxfilter::settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // optional first argument names the settings file
    let file = std::env::args().nth(1);
    let settings = Settings::load(file.as_deref())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = match &settings.catalog {
        Some(path) => MemoryCatalog::from_file(path)?,
        None => MemoryCatalog::new(),
    };
    let bind = settings.bind.clone();
    let state = Arc::new(AppState { settings, catalog });

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(%bind, "taxfilter listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
