use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{ArchiveError, Result};
use crate::config::Config;
use crate::fetcher::download::HttpDownloader;
use crate::fetcher::http_fetcher::HttpArchiveClient;
use crate::fetcher::parallel::ParallelDownloader;
use crate::fetcher::{ArchiveClient, Endpoints};
use crate::session::Session;
use crate::store::{FavoriteStore, SqliteStore};

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub client: Arc<dyn ArchiveClient + Send + Sync>,
    pub endpoints: Endpoints,
    pub favorites: FavoriteStore,
    pub downloader: ParallelDownloader,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, config)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(store, config)
    }

    fn with_store(store: Arc<SqliteStore>, config: Config) -> Result<Self> {
        let http = HttpArchiveClient::new(&config.archive)?;
        let endpoints = http.endpoints().clone();
        let client: Arc<dyn ArchiveClient + Send + Sync> = Arc::new(http);
        let favorites = FavoriteStore::new(store.clone());

        let directory = config
            .download
            .resolve_directory()
            .map_err(|e| ArchiveError::Config(e.to_string()))?;
        let http_downloader =
            HttpDownloader::new(directory, config.download.user_agent.clone())?;
        let downloader =
            ParallelDownloader::with_workers(Arc::new(http_downloader), config.download.workers);

        Ok(Self {
            config,
            store,
            client,
            endpoints,
            favorites,
            downloader,
        })
    }

    /// Fresh browsing session sharing this context's client and favorites.
    pub fn session(&self) -> Session {
        Session::new(
            self.client.clone(),
            self.favorites.clone(),
            self.config.archive.rows,
        )
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ArchiveError::Config("Could not find data directory".into()))?;
        let archivist_dir = data_dir.join("archivist");
        std::fs::create_dir_all(&archivist_dir)?;
        Ok(archivist_dir.join("archivist.db"))
    }
}
