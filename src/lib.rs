//! Client core for a stock & sector news insight app.
//!
//! Everything the UI shell needs that is not rendering: persisted on-device
//! flags, the session resolver that decides which top-level surface to show
//! (onboarding, auth, or the main app), the saved-bookmarks store, and the
//! typed client for the news backend.

pub mod api;
pub mod bookmarks;
pub mod db;
pub mod models;
pub mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

pub use api::ApiClient;
pub use bookmarks::BookmarkStore;
pub use db::Database;
pub use session::{FlagStore, SessionResolver, SessionState};

pub struct AppConfig {
    /// Directory holding the SQLite database and the flags file.
    pub data_dir: PathBuf,
    pub api_base_url: String,
}

/// Application root owning every store. The UI shell constructs one of these
/// at startup and injects the pieces into its surfaces; nothing here is a
/// module-level singleton, so tests run against isolated instances.
pub struct App {
    pub db: Database,
    pub flags: FlagStore,
    pub bookmarks: BookmarkStore,
    pub resolver: SessionResolver,
    pub api: ApiClient,
}

impl App {
    pub async fn init(config: AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let db = Database::new(config.data_dir.join("marketbrief.sqlite3"))?;
        let flags = FlagStore::new(config.data_dir.join("flags.json"))?;
        let bookmarks = BookmarkStore::load(db.clone()).await?;
        let api = ApiClient::new(config.api_base_url, flags.clone())?;
        let resolver = SessionResolver::spawn(flags.clone());

        info!("marketbrief core initialized in {}", config.data_dir.display());

        Ok(Self {
            db,
            flags,
            bookmarks,
            resolver,
            api,
        })
    }

    /// Stop background work. The resolver worker must not outlive the app
    /// session (spawned timers and callbacks would reference stale state).
    pub async fn shutdown(&self) {
        self.resolver.shutdown().await;
    }
}

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
