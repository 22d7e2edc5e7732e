//! Video data sources.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use thiserror::Error;
use vidmap_core::{VideoRecord, video::parse_catalog};

/// Errors raised while fetching the video catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The catalog could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON of the expected shape.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Supplier of the full video collection.
pub trait VideoSource: Send + Sync + 'static {
    /// Fetch every video record.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<VideoRecord>, SourceError>> + Send;
}

/// Reads the catalog from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VideoSource for JsonFileSource {
    async fn fetch_all(&self) -> Result<Vec<VideoRecord>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.clone(),
                source,
            })?;

        let videos = parse_catalog(&text).map_err(|source| SourceError::Decode {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = ?self.path, count = videos.len(), "loaded video catalog");
        Ok(videos)
    }
}
