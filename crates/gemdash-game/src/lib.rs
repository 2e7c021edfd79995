pub mod animation;
pub mod collision;
pub mod config;
pub mod level;
pub mod physics;
pub mod scoring;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gemdash_core::assets::{self, AssetSource};
use gemdash_core::events::{self, AnalyticsEvent, AnalyticsSink, EventName, NullSink};
use gemdash_core::game_trait::{
    DeathCause, GameEvent, GameMetadata, GamePhase, GemDashGame, LevelError,
};
use gemdash_core::geometry::Vec2;
use gemdash_core::input::FrameInput;
use gemdash_core::save::{self, SaveData, SaveStore};

use animation::AnimState;
use collision::Contact;
use config::GemDashConfig;
use level::{Level, generate_level};
use physics::PlayerState;

/// Seed used when the host doesn't supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Serializable session state: everything needed to suspend the app
/// mid-level and resume exactly where it left off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    /// 1-based level index; 0 while no level was ever loaded.
    pub level_index: u32,
    pub score: i64,
    /// Score at level entry; restarts roll back to it.
    pub score_at_level_start: i64,
    pub gems_collected: u32,
    pub total_gems: u32,
    /// Gem currency banked across levels (persisted).
    pub banked_gems: u32,
    pub lives: u32,
    pub time_remaining: f32,
    pub last_checkpoint: Option<Vec2>,
    pub player: Option<PlayerState>,
    pub entities: Vec<level::Entity>,
    pub anim: AnimState,
    pub unlocked_levels: Vec<u32>,
    /// Whether the rewarded continue was spent this level attempt.
    pub continue_used: bool,
}

impl SessionState {
    fn new(config: &GemDashConfig) -> Self {
        Self {
            phase: GamePhase::Menu,
            level_index: 0,
            score: 0,
            score_at_level_start: 0,
            gems_collected: 0,
            total_gems: 0,
            banked_gems: 0,
            lives: config.max_lives,
            time_remaining: 0.0,
            last_checkpoint: None,
            player: None,
            entities: Vec::new(),
            anim: AnimState::Idle,
            unlocked_levels: vec![1],
            continue_used: false,
        }
    }
}

/// The GemDash session controller.
///
/// Owns the loaded level's entities and all score/timer/lives bookkeeping.
/// The host engine drives `update` once per frame in a strict order: input
/// is sampled, the integrator and resolver run, the animation state is
/// derived, and the controller reacts to resolver signals. Collaborators
/// (analytics, assets) are injected at construction; entities never reach
/// back into the session.
pub struct GemDashSession {
    config: GemDashConfig,
    seed: u64,
    session_id: String,
    state: SessionState,
    level: Option<Level>,
    analytics: Box<dyn AnalyticsSink>,
    asset_source: Option<Box<dyn AssetSource>>,
}

impl GemDashSession {
    pub fn new(seed: u64) -> Self {
        Self::with_config(GemDashConfig::default(), seed)
    }

    pub fn with_config(config: GemDashConfig, seed: u64) -> Self {
        Self {
            state: SessionState::new(&config),
            config,
            seed,
            session_id: uuid::Uuid::new_v4().to_string(),
            level: None,
            analytics: Box::new(NullSink),
            asset_source: None,
        }
    }

    /// Inject the host analytics sink.
    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = sink;
        self
    }

    /// Inject the host asset catalog. Entities spawned without one render
    /// as placeholders.
    pub fn with_assets(mut self, source: Box<dyn AssetSource>) -> Self {
        self.asset_source = Some(source);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn config(&self) -> &GemDashConfig {
        &self.config
    }

    /// Mark the session as loading while the host's async asset work runs.
    /// Frame updates stay gated until `load_level` completes, so a tick can
    /// never run against a half-built level.
    pub fn begin_loading(&mut self) {
        if self.state.phase != GamePhase::Playing {
            self.state.phase = GamePhase::Loading;
        }
    }

    /// Explicit restart of the current level attempt: lives refilled,
    /// score rolled back to its value at level entry.
    pub fn restart_level(&mut self) -> Result<(), LevelError> {
        self.state.score = self.state.score_at_level_start;
        self.state.lives = self.config.max_lives;
        let index = self.state.level_index.max(1);
        self.load_level(index)
    }

    /// Advance to the next level, carrying score and lives forward.
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        self.load_level(self.state.level_index + 1)
    }

    /// Rewarded-ad continue from game over: one extra life, respawn at the
    /// last checkpoint. At most one continue per level attempt; declining
    /// the ad is simply not calling this.
    pub fn grant_rewarded_continue(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver || self.state.continue_used {
            return false;
        }
        self.state.continue_used = true;
        self.state.lives = 1;
        self.state.phase = GamePhase::Playing;
        self.respawn();
        self.emit(
            EventName::RewardedAdCompleted,
            &[("level", self.state.level_index.to_string())],
        );
        true
    }

    /// Persist progress through the host store. Write failures are logged
    /// and swallowed; losing a save never takes down the session.
    pub fn save_progress(&self, store: &mut dyn SaveStore) {
        let data = SaveData {
            current_level: self.state.level_index.max(1),
            total_gems: self.state.banked_gems,
            score: self.state.score,
            unlocked_levels: self.state.unlocked_levels.clone(),
        };
        save::persist_or_warn(store, &data);
    }

    /// Restore persisted progress. Read failures fall back to defaults.
    /// Ignored mid-level so a background read can't clobber a live run.
    pub fn restore_progress(&mut self, store: &dyn SaveStore) {
        if matches!(self.state.phase, GamePhase::Playing | GamePhase::Paused) {
            tracing::warn!("restore_progress ignored during a live level");
            return;
        }
        let data = save::load_or_default(store);
        self.state.banked_gems = data.total_gems;
        self.state.score = data.score;
        self.state.score_at_level_start = data.score;
        self.state.unlocked_levels = data.unlocked_levels;
        if !self.state.unlocked_levels.contains(&1) {
            self.state.unlocked_levels.push(1);
        }
        self.state.level_index = data.current_level;
    }

    fn emit(&mut self, name: EventName, params: &[(&str, String)]) {
        let mut event = AnalyticsEvent::new(name, &self.session_id);
        for (key, value) in params {
            event.params.insert((*key).to_string(), value.clone());
        }
        events::emit_or_warn(self.analytics.as_mut(), event);
    }

    /// Resolve entity sprites through the injected asset catalog. Failed
    /// loads keep their placeholder; the simulation doesn't care.
    fn decorate_entities(&mut self) {
        let Some(source) = self.asset_source.as_mut() else {
            return;
        };
        for e in &mut self.state.entities {
            e.visual = assets::resolve_or_placeholder(source.as_mut(), &level::asset_key_for(&e.kind));
        }
    }

    fn respawn(&mut self) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let spawn = self.state.last_checkpoint.unwrap_or(level.spawn);
        if let Some(player) = self.state.player.as_mut() {
            player.respawn_at(spawn, &self.config);
        }
        // Rescue bonus, clamped to the level's own limit
        self.state.time_remaining =
            (self.state.time_remaining + self.config.rescue_time_bonus).min(level.time_limit);
        self.state.anim = AnimState::Idle;
    }

    fn handle_death(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        self.state.lives = self.state.lives.saturating_sub(1);
        self.emit(
            EventName::LevelFail,
            &[
                ("level", self.state.level_index.to_string()),
                ("cause", cause.as_str().to_string()),
            ],
        );
        events.push(GameEvent::PlayerDied {
            cause,
            lives_left: self.state.lives,
        });
        if self.state.lives > 0 {
            self.respawn();
        } else {
            self.state.phase = GamePhase::GameOver;
            events.push(GameEvent::GameOver);
            if !self.state.continue_used {
                self.emit(
                    EventName::RewardedAdOffered,
                    &[("level", self.state.level_index.to_string())],
                );
            }
            tracing::debug!("game over on level {}", self.state.level_index);
        }
    }

    fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        let bonus = scoring::time_bonus(self.state.time_remaining) + scoring::COMPLETION_BONUS;
        self.state.score += bonus;
        self.state.banked_gems += self.state.gems_collected + scoring::COMPLETION_GEM_BONUS;
        self.state.phase = GamePhase::LevelComplete;
        events.push(GameEvent::ScoreChanged {
            score: self.state.score,
        });
        events.push(GameEvent::LevelComplete {
            score: self.state.score,
        });
        self.emit(
            EventName::LevelComplete,
            &[
                ("level", self.state.level_index.to_string()),
                ("score", self.state.score.to_string()),
                ("gems", self.state.gems_collected.to_string()),
            ],
        );

        let next = self.state.level_index + 1;
        if next <= level::LEVEL_COUNT && !self.state.unlocked_levels.contains(&next) {
            self.state.unlocked_levels.push(next);
            events.push(GameEvent::LevelUnlocked { level: next });
            self.emit(EventName::LevelUnlocked, &[("level", next.to_string())]);
        }
        tracing::debug!("level {} complete", self.state.level_index);
    }

    fn apply_contacts(&mut self, contacts: Vec<Contact>, events: &mut Vec<GameEvent>) {
        // At most one death per frame: a lethal hazard and the kill plane
        // reported together must not cost two lives.
        let mut died_this_frame = false;
        for contact in contacts {
            if self.state.phase != GamePhase::Playing {
                // A terminal transition consumed the rest of the frame
                break;
            }
            match contact {
                Contact::Landed => {},
                Contact::Damaged { remaining_health } => {
                    events.push(GameEvent::PlayerDamaged {
                        health: remaining_health,
                    });
                },
                Contact::Died { cause } => {
                    if !died_this_frame {
                        died_this_frame = true;
                        self.handle_death(cause, events);
                    }
                },
                Contact::GemCollected { value } => {
                    self.state.gems_collected =
                        (self.state.gems_collected + 1).min(self.state.total_gems);
                    self.state.score += scoring::gem_score(value);
                    events.push(GameEvent::GemCollected {
                        collected: self.state.gems_collected,
                        total: self.state.total_gems,
                    });
                    events.push(GameEvent::ScoreChanged {
                        score: self.state.score,
                    });
                    self.emit(
                        EventName::GemCollected,
                        &[
                            ("level", self.state.level_index.to_string()),
                            ("collected", self.state.gems_collected.to_string()),
                            ("total", self.state.total_gems.to_string()),
                        ],
                    );
                    if self.state.total_gems > 0
                        && self.state.gems_collected >= self.state.total_gems
                    {
                        self.complete_level(events);
                    }
                },
                Contact::CheckpointReached { pos } => {
                    self.state.last_checkpoint = Some(pos);
                    events.push(GameEvent::CheckpointSaved);
                },
                Contact::ExitReached => self.complete_level(events),
            }
        }
    }
}

impl Default for GemDashSession {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl GemDashGame for GemDashSession {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "GemDash".to_string(),
            description: "Dash, jump, and grab every gem before the clock runs out.".to_string(),
            level_count: level::LEVEL_COUNT,
            estimated_level_duration: Duration::from_secs(120),
        }
    }

    fn load_level(&mut self, index: u32) -> Result<(), LevelError> {
        // Validate before any teardown: a bad index leaves the previous
        // level fully playable.
        let new_level = generate_level(index, self.seed)?;

        self.state.entities = level::spawn_entities(&new_level);
        self.state.level_index = index;
        self.state.gems_collected = 0;
        self.state.total_gems = new_level.total_gems;
        self.state.time_remaining = new_level.time_limit;
        self.state.last_checkpoint = None;
        self.state.continue_used = false;
        self.state.score_at_level_start = self.state.score;
        if self.state.lives == 0 {
            self.state.lives = self.config.max_lives;
        }
        self.state.player = Some(PlayerState::spawn(new_level.spawn, &self.config));
        self.state.anim = AnimState::Idle;
        self.state.phase = GamePhase::Playing;
        self.level = Some(new_level);
        self.decorate_entities();
        self.emit(
            EventName::LevelStart,
            &[
                ("level", index.to_string()),
                ("lives", self.state.lives.to_string()),
            ],
        );
        tracing::debug!("level {index} loaded");
        Ok(())
    }

    fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }
        // Frame updates are gated on a fully built level
        if self.level.is_none() || self.state.player.is_none() {
            return Vec::new();
        }

        let mut events = Vec::new();

        self.state.time_remaining = (self.state.time_remaining - dt).max(0.0);
        if self.state.time_remaining <= 0.0 {
            self.handle_death(DeathCause::TimeUp, &mut events);
            return events;
        }

        level::advance_entities(&mut self.state.entities, dt);

        let cfg = &self.config;
        let state = &mut self.state;
        let Some(player) = state.player.as_mut() else {
            return events;
        };
        physics::tick_invulnerability(player, dt);
        if input.jump {
            physics::try_jump(player, &cfg.physics);
        }
        let prev_bottom = player.bottom(&cfg.physics);
        physics::integrate(player, input, &cfg.physics, dt);
        let contacts = collision::resolve_frame(player, prev_bottom, &mut state.entities, cfg);
        state.anim = animation::derive_state(player);

        self.apply_contacts(contacts, &mut events);
        events
    }

    fn serialize_state(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).expect("session state serialization must succeed")
    }

    fn apply_state(&mut self, state: &[u8]) {
        if let Ok(s) = rmp_serde::from_slice::<SessionState>(state) {
            // Static level data is regenerated from (index, seed); the
            // snapshot carries all runtime entity state.
            self.level = generate_level(s.level_index, self.seed).ok();
            self.state = s;
        }
    }

    fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
        }
    }

    fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
        }
    }

    fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn score(&self) -> i64 {
        self.state.score
    }
}
