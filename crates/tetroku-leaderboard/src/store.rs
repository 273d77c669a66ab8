use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::RwLock};

/// Entries returned by a listing.
pub const MAX_LISTED: usize = 50;

/// Longer names are cut to this many characters.
pub const MAX_NAME_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
    /// ISO-8601 UTC timestamp with milliseconds.
    pub date: String,
}

impl ScoreEntry {
    /// Entry for a submission received at `at`, with the name truncated.
    #[must_use]
    pub fn new(name: &str, score: i64, at: DateTime<Utc>) -> Self {
        Self {
            name: name.chars().take(MAX_NAME_CHARS).collect(),
            score,
            date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum StoreError {
    #[display("failed to read score file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("failed to parse score file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("failed to encode scores: {source}")]
    Encode { source: serde_json::Error },
    #[display("failed to write score file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Every submitted score, best first; ties keep the newest first.
///
/// With a backing file the whole table is rewritten after each insert.
#[derive(Debug, Default)]
pub struct ScoreStore {
    entries: RwLock<Vec<ScoreEntry>>,
    path: Option<PathBuf>,
}

impl ScoreStore {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the table from `path`; a missing file starts an empty table.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_owned();
        let mut entries: Vec<ScoreEntry> = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => vec![],
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded scores");
        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// The best `limit` entries.
    pub async fn top(&self, limit: usize) -> Vec<ScoreEntry> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    /// Adds `entry` ahead of older entries with the same score.
    ///
    /// The entry stays in memory even if writing the backing file fails.
    pub async fn insert(&self, entry: ScoreEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let index = entries.partition_point(|e| e.score > entry.score);
        entries.insert(index, entry);

        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes =
            serde_json::to_vec_pretty(&*entries).map_err(|source| StoreError::Encode { source })?;
        fs::write(path, bytes)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })
    }
}
