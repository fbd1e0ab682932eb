pub mod auth;
pub mod cars;
pub mod config;
pub mod error;
pub mod offers;
pub mod rest;
pub mod seed;
pub mod storage;
pub mod users;

use std::sync::Arc;

use anyhow::Result;

use config::ServerConfig;
use storage::Storage;

/// Shared application state passed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    /// HMAC secret for signing auth tokens. Persisted in the data dir so
    /// issued tokens survive restarts.
    pub token_secret: String,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire together storage and the token secret for the given config.
    ///
    /// Creates the data dir (and the uploads dir served at `/uploads`) on
    /// first run.
    pub async fn init(config: ServerConfig) -> Result<Arc<Self>> {
        tokio::fs::create_dir_all(config.uploads_dir()).await?;

        let storage = Arc::new(Storage::new(&config.data_dir).await?);
        let token_secret = auth::get_or_create_secret(&config.data_dir)?;

        Ok(Arc::new(Self {
            config: Arc::new(config),
            storage,
            token_secret,
            started_at: std::time::Instant::now(),
        }))
    }
}
