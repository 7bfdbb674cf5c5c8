use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{Result, RoostError};
use crate::config::Config;
use crate::extractor::TimelineExtractor;
use crate::feed::FeedStore;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::scheduler::Scheduler;
use crate::shell::Shell;
use crate::store::{KeyValueStore, SqliteStore};
use crate::viewer::{SystemViewer, Viewer};

/// Everything a command needs, built once at startup.
pub struct AppContext {
    pub config: Arc<Config>,
    pub feeds: Arc<FeedStore>,
    pub shell: Arc<Shell>,
}

impl AppContext {
    /// Wire up the real stack: SQLite in the data dir, HTTP, the system viewer.
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher = Arc::new(HttpFetcher::new(&config.source)?);
        Self::with_parts(config, fetcher, store, Arc::new(SystemViewer))
    }

    pub fn with_parts(
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        store: Arc<dyn KeyValueStore + Send + Sync>,
        viewer: Arc<dyn Viewer + Send + Sync>,
    ) -> Result<Self> {
        let extractor = TimelineExtractor::new(config.extractor.clone())?;
        let feeds = Arc::new(FeedStore::open(fetcher, store, extractor, &config.source)?);
        let shell = Arc::new(Shell::new(
            feeds.clone(),
            viewer,
            config.display.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            feeds,
            shell,
        })
    }

    pub fn scheduler(&self, period: Duration) -> Arc<Scheduler> {
        Arc::new(Scheduler::new(self.feeds.clone(), period))
    }

    pub fn default_db_path() -> Result<PathBuf> {
        let data_dir = Config::data_dir().map_err(|e| RoostError::Config(e.to_string()))?;
        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir.join("roost.db"))
    }
}
