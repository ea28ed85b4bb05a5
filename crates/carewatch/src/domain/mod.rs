//! Domain value objects for the monitoring decision pipeline.

pub mod baseline;
pub mod intervention;
pub mod risk;
pub mod state;
pub mod timeline;

pub use baseline::{Deviations, ResidentBaseline, SignalBaseline, SleepWindow};
pub use intervention::{InterventionLevel, InterventionPlan};
pub use risk::{clamp_score, RecentHighCount, RiskScores, UrgencyBand};
pub use state::{format_hhmm, CurrentState};
pub use timeline::{most_recent_elevated, TimelineEvent, TimelineEventId};
