pub mod assets;
pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod save;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::assets::{AssetError, AssetKey, AssetId, AssetSource};
    use crate::events::{AnalyticsEvent, AnalyticsSink, EventName, SinkError};
    use crate::game_trait::{GameEvent, GemDashGame};
    use crate::input::FrameInput;
    use crate::save::{SaveError, SaveStore};

    /// Sink that records every event for later assertions. Clone the
    /// handle before boxing the sink into a session.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Rc<RefCell<Vec<AnalyticsEvent>>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn handle(&self) -> RecordingHandle {
            RecordingHandle(Rc::clone(&self.events))
        }
    }

    impl AnalyticsSink for RecordingSink {
        fn emit(&mut self, event: AnalyticsEvent) -> Result<(), SinkError> {
            self.events.borrow_mut().push(event);
            Ok(())
        }
    }

    /// Shared view into a `RecordingSink`'s captured events.
    #[derive(Debug, Clone)]
    pub struct RecordingHandle(Rc<RefCell<Vec<AnalyticsEvent>>>);

    impl RecordingHandle {
        pub fn events(&self) -> Vec<AnalyticsEvent> {
            self.0.borrow().clone()
        }

        pub fn names(&self) -> Vec<EventName> {
            self.0.borrow().iter().map(|e| e.name).collect()
        }

        pub fn count(&self, name: EventName) -> usize {
            self.0.borrow().iter().filter(|e| e.name == name).count()
        }
    }

    /// Store whose reads and writes always fail, for failure-path tests.
    #[derive(Debug, Default)]
    pub struct FailingSaveStore;

    impl SaveStore for FailingSaveStore {
        fn read(&self) -> Result<Option<String>, SaveError> {
            Err(SaveError::Read("test store is broken".to_string()))
        }

        fn write(&mut self, _blob: &str) -> Result<(), SaveError> {
            Err(SaveError::Write("test store is broken".to_string()))
        }
    }

    /// Asset source whose loads always fail, for placeholder-path tests.
    #[derive(Debug, Default)]
    pub struct FailingAssetSource;

    impl AssetSource for FailingAssetSource {
        fn load(&mut self, key: &AssetKey) -> Result<AssetId, AssetError> {
            Err(AssetError::NotFound(key.0.clone()))
        }
    }

    /// Run N frames with default input, returning all accumulated events.
    pub fn run_frames(game: &mut dyn GemDashGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let input = FrameInput::default();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, &input));
        }
        all_events
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // A generic suite every GemDashGame implementation must pass. Callers
    // provide a session that already has a level loaded and is playing.

    /// update(dt>0) while playing must change the serialized state
    /// (at minimum the level timer advances).
    pub fn contract_update_advances_state(game: &mut dyn GemDashGame) {
        let before = game.serialize_state();
        game.update(1.0, &FrameInput::default());
        let after = game.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance session state");
    }

    /// pause() must freeze the serialized state; resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn GemDashGame) {
        game.pause();
        let before = game.serialize_state();
        game.update(1.0, &FrameInput::default());
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(1.0, &FrameInput::default());
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// serialize -> apply -> serialize must be stable after one roundtrip.
    pub fn contract_snapshot_roundtrip_stable(game: &mut dyn GemDashGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        game.apply_state(&state_b);
        let state_c = game.serialize_state();
        assert_eq!(
            state_b, state_c,
            "State must be stable after serialize -> apply -> serialize roundtrip"
        );
    }

    /// Loading an out-of-range level must fail and leave the session
    /// exactly as it was.
    pub fn contract_bad_level_preserves_state(game: &mut dyn GemDashGame, bad_index: u32) {
        let before = game.serialize_state();
        let phase_before = game.phase();
        assert!(
            game.load_level(bad_index).is_err(),
            "Level index {bad_index} must be rejected"
        );
        assert_eq!(game.phase(), phase_before, "Phase must survive a bad load");
        assert_eq!(
            before,
            game.serialize_state(),
            "State must survive a bad load untouched"
        );
    }
}
