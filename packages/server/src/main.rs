use std::sync::Arc;

use catalog_server::config::AppConfig;
use catalog_server::repository::SeaOrmItemRepository;
use catalog_server::state::AppState;
use common::storage::filesystem::FilesystemImageStore;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = catalog_server::database::init_db(&config.database.url).await?;
    info!("Connected to database");

    let images = FilesystemImageStore::new(config.storage.image_dir.clone()).await?;
    info!(dir = %config.storage.image_dir.display(), "Image store ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        repository: Arc::new(SeaOrmItemRepository::new(db)),
        images: Arc::new(images),
        config,
    };

    let app = catalog_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
