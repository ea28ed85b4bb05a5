//! Snapshot of behavioral signals at one instant.

use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of the monitored signals.
///
/// The UI or simulator mutates this in place between cycles; the engine
/// only ever reads a snapshot. Heart rate and SpO2 are meaningful only
/// while `use_wearables` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    /// Time of day in fractional hours (0-24)
    pub time_of_day: f64,
    /// Mobility level (0-100, higher = more mobile)
    pub mobility: f64,
    /// Restlessness level (0-100)
    pub restlessness: f64,
    /// Speech pattern drift (0-100)
    pub speech_drift: f64,
    /// Social isolation level (0-100)
    pub social_isolation: f64,
    /// Whether wearable vitals are being reported
    pub use_wearables: bool,
    /// Heart rate in BPM (40-140), valid only with wearables
    pub heart_rate: f64,
    /// Blood oxygen saturation in percent (85-100), valid only with wearables
    pub spo2: f64,
    /// Current staff workload (0-100)
    pub staff_load: f64,
}

impl Default for CurrentState {
    fn default() -> Self {
        Self {
            time_of_day: 10.0,
            mobility: 70.0,
            restlessness: 25.0,
            speech_drift: 20.0,
            social_isolation: 30.0,
            use_wearables: false,
            heart_rate: 72.0,
            spo2: 97.0,
            staff_load: 40.0,
        }
    }
}

/// Render a fractional hour of day as zero-padded `HH:MM`.
pub fn format_hhmm(hour: f64) -> String {
    let h = hour.rem_euclid(24.0);
    let mut hh = h.floor() as u32;
    let mut mm = ((h - h.floor()) * 60.0).round() as u32;
    if mm == 60 {
        mm = 0;
        hh = (hh + 1) % 24;
    }
    format!("{:02}:{:02}", hh, mm)
}
