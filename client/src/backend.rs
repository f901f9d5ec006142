//! Where the client's records live: the club backend or a local snapshot.

use crate::api::ApiStore;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use crate::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use swimtime_engine::{
    MemoryStore, RecordStore, StoreSnapshot, SwimmerDirectory, TimeRecord, TimeSubmission,
};

/// A record store the commands can run against.
#[derive(Debug)]
pub enum Backend {
    /// The club's REST API
    Remote(ApiStore),
    /// A JSON snapshot file loaded into memory
    Local { store: MemoryStore, path: PathBuf },
}

impl Backend {
    /// Pick the backend: a local snapshot when a path is given, otherwise
    /// the API configured in `config`.
    pub fn connect(config: &Config, snapshot: Option<&Path>) -> Result<Self> {
        match snapshot {
            Some(path) => Self::open_local(path),
            None => {
                let session = config
                    .token
                    .clone()
                    .map(Session::with_token)
                    .unwrap_or_else(Session::anonymous);
                if !session.is_authenticated() {
                    tracing::warn!("no SWIMTIME_TOKEN set; requests will be anonymous");
                }
                tracing::info!(url = %config.api_url, "using club backend");
                Ok(Backend::Remote(ApiStore::new(
                    config.api_url.clone(),
                    session,
                    config.timeout,
                )?))
            }
        }
    }

    /// Load a snapshot file, or start empty if it does not exist yet.
    pub fn open_local(path: &Path) -> Result<Self> {
        let store = if path.exists() {
            let json = fs::read_to_string(path)?;
            let store = MemoryStore::from_snapshot(StoreSnapshot::from_json(&json)?)?;
            tracing::info!(path = %path.display(), records = store.len(), "loaded snapshot");
            store
        } else {
            tracing::info!(path = %path.display(), "snapshot not found; starting empty");
            MemoryStore::new()
        };

        Ok(Backend::Local {
            store,
            path: path.to_path_buf(),
        })
    }

    /// Swimmer names for display.
    pub async fn directory(&self) -> Result<SwimmerDirectory> {
        match self {
            Backend::Remote(api) => Ok(api.swimmers().await?.into_iter().collect()),
            Backend::Local { store, .. } => Ok(store.directory()),
        }
    }

    /// Write local changes back to the snapshot file. No-op for the API.
    pub fn persist(&self) -> Result<()> {
        if let Backend::Local { store, path } = self {
            let json = store.export_state().to_json_pretty()?;
            fs::write(path, json)?;
            tracing::debug!(path = %path.display(), "saved snapshot");
        }
        Ok(())
    }
}

impl RecordStore for Backend {
    type Error = AppError;

    async fn list(&self) -> Result<Vec<TimeRecord>> {
        match self {
            Backend::Remote(api) => api.list().await,
            Backend::Local { store, .. } => Ok(store.list().await?),
        }
    }

    async fn create(&self, submission: TimeSubmission) -> Result<TimeRecord> {
        match self {
            Backend::Remote(api) => api.create(submission).await,
            Backend::Local { store, .. } => Ok(store.create(submission).await?),
        }
    }

    async fn update(&self, id: &str, submission: TimeSubmission) -> Result<TimeRecord> {
        match self {
            Backend::Remote(api) => api.update(id, submission).await,
            Backend::Local { store, .. } => Ok(store.update(id, submission).await?),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        match self {
            Backend::Remote(api) => api.delete(id).await,
            Backend::Local { store, .. } => Ok(store.delete(id).await?),
        }
    }
}
