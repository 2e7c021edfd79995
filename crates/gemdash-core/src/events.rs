use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Analytics event names understood by the host sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    #[serde(rename = "level_start")]
    LevelStart,
    #[serde(rename = "level_complete")]
    LevelComplete,
    #[serde(rename = "level_fail")]
    LevelFail,
    #[serde(rename = "gem_collected")]
    GemCollected,
    #[serde(rename = "rewarded_ad_offered")]
    RewardedAdOffered,
    #[serde(rename = "rewarded_ad_completed")]
    RewardedAdCompleted,
    #[serde(rename = "level_unlocked")]
    LevelUnlocked,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LevelStart => "level_start",
            Self::LevelComplete => "level_complete",
            Self::LevelFail => "level_fail",
            Self::GemCollected => "gem_collected",
            Self::RewardedAdOffered => "rewarded_ad_offered",
            Self::RewardedAdCompleted => "rewarded_ad_completed",
            Self::LevelUnlocked => "level_unlocked",
        }
    }
}

/// A fire-and-forget analytics event with a flat string parameter map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub name: EventName,
    /// Per-run session id, stamped by the session controller.
    pub session: String,
    pub timestamp: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl AnalyticsEvent {
    pub fn new(name: EventName, session: &str) -> Self {
        Self {
            name,
            session: session.to_string(),
            timestamp: crate::time::timestamp_now(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Sink delivery failure. Carried as a message string; the concrete cause
/// lives on the host side.
#[derive(Debug)]
pub struct SinkError(pub String);

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "analytics sink error: {}", self.0)
    }
}

impl std::error::Error for SinkError {}

/// Host-implemented analytics sink. Fire-and-forget: no response is
/// expected and failures must never affect gameplay.
pub trait AnalyticsSink {
    fn emit(&mut self, event: AnalyticsEvent) -> Result<(), SinkError>;
}

/// Sink that drops every event. Default when the host wires nothing up.
#[derive(Debug, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn emit(&mut self, _event: AnalyticsEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Emit an event, swallowing sink failures with a log line.
pub fn emit_or_warn(sink: &mut dyn AnalyticsSink, event: AnalyticsEvent) {
    let name = event.name.as_str();
    if let Err(e) = sink.emit(event) {
        tracing::warn!("dropping analytics event {name}: {e}");
    }
}
