//! Timeline events recorded across evaluation cycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::risk::UrgencyBand;

/// Unique identifier for a timeline event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimelineEventId(Uuid);

impl TimelineEventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TimelineEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TimelineEventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded decision event on the monitoring timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Event identifier
    pub id: TimelineEventId,
    /// When the event was recorded
    pub at: DateTime<Utc>,
    /// Short human-readable label
    pub label: String,
    /// Urgency band at the time of the event
    pub urgency: UrgencyBand,
}

impl TimelineEvent {
    /// Create a new event stamped with the current time
    pub fn new(label: impl Into<String>, urgency: UrgencyBand) -> Self {
        Self {
            id: TimelineEventId::new(),
            at: Utc::now(),
            label: label.into(),
            urgency,
        }
    }
}

/// Find the most recent event whose urgency is above Low.
///
/// Events are expected in chronological order (oldest first).
pub fn most_recent_elevated(events: &[TimelineEvent]) -> Option<&TimelineEvent> {
    events.iter().rev().find(|e| e.urgency.is_elevated())
}
