mod api;
mod models;
mod services;
mod storage;
mod store;
mod utils;

use std::sync::Arc;

use crate::api::AppState;
use crate::storage::SqliteStorage;
use crate::store::JournalStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::config::load_dotenv();
    env_logger::init();

    let data_dir = utils::config::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let storage = Arc::new(SqliteStorage::open(data_dir.join("mind-haven.db"))?);
    let store = Arc::new(JournalStore::new(storage));
    let state = AppState::new(store);

    let settings = state.store.settings()?;
    log::info!(
        "AI analysis: {}",
        if settings.ai.enabled && !settings.ai.api_key.trim().is_empty() {
            "enabled"
        } else {
            "demo mode (no API key configured)"
        }
    );

    let app = api::router(state);
    let addr = utils::config::server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Mind Haven listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
