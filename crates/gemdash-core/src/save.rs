use serde::{Deserialize, Serialize};

/// Persisted progress blob, stored by the host as a small JSON document
/// with camelCase keys: `{currentLevel, totalGems, score, unlockedLevels}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    pub current_level: u32,
    /// Banked gem currency across all runs.
    pub total_gems: u32,
    pub score: i64,
    pub unlocked_levels: Vec<u32>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            current_level: 1,
            total_gems: 0,
            score: 0,
            unlocked_levels: vec![1],
        }
    }
}

impl SaveData {
    pub fn is_unlocked(&self, level: u32) -> bool {
        level == 1 || self.unlocked_levels.contains(&level)
    }
}

#[derive(Debug)]
pub enum SaveError {
    Read(String),
    Write(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "save read failed: {e}"),
            Self::Write(e) => write!(f, "save write failed: {e}"),
        }
    }
}

impl std::error::Error for SaveError {}

/// Host-implemented key-value persistence for the save blob.
pub trait SaveStore {
    /// Returns the stored blob, or None if nothing was ever saved.
    fn read(&self) -> Result<Option<String>, SaveError>;
    fn write(&mut self, blob: &str) -> Result<(), SaveError>;
}

/// Load saved progress. Any failure (store error, corrupt blob) falls back
/// to defaults so a broken save can never take down a running session.
pub fn load_or_default(store: &dyn SaveStore) -> SaveData {
    match store.read() {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("corrupt save blob, using defaults: {e}");
                SaveData::default()
            },
        },
        Ok(None) => SaveData::default(),
        Err(e) => {
            tracing::warn!("{e}, using defaults");
            SaveData::default()
        },
    }
}

/// Persist progress, logging write failures instead of propagating them.
pub fn persist_or_warn(store: &mut dyn SaveStore, data: &SaveData) {
    let blob = match serde_json::to_string(data) {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!("save serialization failed: {e}");
            return;
        },
    };
    if let Err(e) = store.write(&blob) {
        tracing::warn!("{e}");
    }
}

/// In-memory store for tests and platforms without persistent storage.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    blob: Option<String>,
}

impl SaveStore for MemorySaveStore {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), SaveError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}
