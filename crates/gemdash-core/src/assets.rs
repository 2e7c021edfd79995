use serde::{Deserialize, Serialize};

/// Key identifying a sprite sheet, animation, or audio clip in the host
/// engine's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey(pub String);

impl AssetKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// Opaque handle to a loaded host-engine asset.
pub type AssetId = u64;

#[derive(Debug)]
pub enum AssetError {
    NotFound(String),
    Backend(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "asset not found: {key}"),
            Self::Backend(e) => write!(f, "asset backend error: {e}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Host-implemented asset lookup. Loads may fail; callers fall back to
/// placeholders rather than crashing the simulation.
pub trait AssetSource {
    fn load(&mut self, key: &AssetKey) -> Result<AssetId, AssetError>;
}

/// Resolved visual for an entity. `Placeholder` keeps the simulation
/// running when a load fails; position, collision, and score are
/// unaffected by which variant an entity renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualHandle {
    Loaded(AssetId),
    Placeholder,
}

/// Resolve an asset, substituting a placeholder on failure.
pub fn resolve_or_placeholder(source: &mut dyn AssetSource, key: &AssetKey) -> VisualHandle {
    match source.load(key) {
        Ok(id) => VisualHandle::Loaded(id),
        Err(e) => {
            tracing::warn!("{e}, substituting placeholder");
            VisualHandle::Placeholder
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource {
        assets: HashMap<AssetKey, AssetId>,
    }

    impl AssetSource for MapSource {
        fn load(&mut self, key: &AssetKey) -> Result<AssetId, AssetError> {
            self.assets
                .get(key)
                .copied()
                .ok_or_else(|| AssetError::NotFound(key.0.clone()))
        }
    }

    #[test]
    fn present_asset_resolves_loaded() {
        let mut source = MapSource {
            assets: HashMap::from([(AssetKey::new("player_run"), 7)]),
        };
        assert_eq!(
            resolve_or_placeholder(&mut source, &AssetKey::new("player_run")),
            VisualHandle::Loaded(7)
        );
    }

    #[test]
    fn missing_asset_falls_back_to_placeholder() {
        let mut source = MapSource {
            assets: HashMap::new(),
        };
        assert_eq!(
            resolve_or_placeholder(&mut source, &AssetKey::new("gem_sparkle")),
            VisualHandle::Placeholder
        );
    }
}
