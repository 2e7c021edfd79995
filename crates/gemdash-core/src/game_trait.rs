use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::input::FrameInput;

/// Coarse session phase. The host engine reads this to pick a scene
/// (menu, HUD, game-over screen); the session controller owns transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Loading,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
}

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    TimeUp,
    Fall,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hazard => "hazard",
            Self::TimeUp => "time_up",
            Self::Fall => "fall",
        }
    }
}

/// Level loading failures. An unknown index must never produce garbage
/// output; the session stays in its previous valid state.
#[derive(Debug, PartialEq, Eq)]
pub enum LevelError {
    UnknownLevel(u32),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(n) => write!(f, "unknown level: {n}"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Game metadata for the menu / store listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub level_count: u32,
    pub estimated_level_duration: Duration,
}

/// Events emitted by a session during update. The host engine reacts with
/// HUD updates, sounds, and scene transitions; the simulation never waits
/// on any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: i64 },
    GemCollected { collected: u32, total: u32 },
    CheckpointSaved,
    PlayerDamaged { health: i32 },
    PlayerDied { cause: DeathCause, lives_left: u32 },
    LevelComplete { score: i64 },
    LevelUnlocked { level: u32 },
    GameOver,
}

/// Core trait the host engine drives once per rendered frame.
///
/// The engine owns rendering, input dispatch, audio, and persistence I/O;
/// the session only handles simulation and bookkeeping. One `update` call
/// per frame, no interleaving: all of a frame's state changes complete
/// before the next frame's input is sampled.
pub trait GemDashGame {
    /// Metadata for menus.
    fn metadata(&self) -> GameMetadata;

    /// Load (or reload) a level. Validates the index before any teardown:
    /// on error the previous level, if any, remains fully playable.
    fn load_level(&mut self, level: u32) -> Result<(), LevelError>;

    /// Advance the simulation by `dt` seconds. Returns the frame's events.
    /// A no-op outside the playing phase.
    fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent>;

    /// Serialize the full session state for suspend/resume.
    fn serialize_state(&self) -> Vec<u8>;

    /// Restore a snapshot produced by `serialize_state`.
    fn apply_state(&mut self, state: &[u8]);

    /// Suspend timer and simulation without discarding state.
    fn pause(&mut self);

    /// Resume exactly where pause left off.
    fn resume(&mut self);

    /// Current coarse phase.
    fn phase(&self) -> GamePhase;

    /// Session score so far.
    fn score(&self) -> i64;

    /// Whether the session reached its terminal phase.
    fn is_over(&self) -> bool {
        self.phase() == GamePhase::GameOver
    }
}
