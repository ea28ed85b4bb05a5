//! Per-resident baseline model and normalized signal deviations.

use serde::{Deserialize, Serialize};

use super::state::CurrentState;

/// Added to the variance before taking the square root, so a
/// zero-variance baseline never divides by zero.
const VARIANCE_EPSILON: f64 = 1.0;

/// Expected mean and variance for a single behavioral signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalBaseline {
    /// Expected mean value (0-100 scale)
    pub mean: f64,
    /// Expected variance
    pub variance: f64,
}

impl SignalBaseline {
    /// Create a new signal baseline; negative variance is clamped to zero
    pub fn new(mean: f64, variance: f64) -> Self {
        Self {
            mean,
            variance: variance.max(0.0),
        }
    }

    /// Normalized deviation of a current value from this baseline
    pub fn deviation(&self, current: f64) -> f64 {
        (current - self.mean) / (self.variance + VARIANCE_EPSILON).sqrt()
    }
}

/// A resident's habitual sleep window, in fractional hours of the day.
///
/// The window may wrap past midnight: a window of 22.0-6.0 covers the
/// hours 22:00 through 05:59.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepWindow {
    /// Hour sleep usually begins (0-24)
    pub start_hour: f64,
    /// Hour sleep usually ends (0-24)
    pub end_hour: f64,
}

impl SleepWindow {
    /// Create a new sleep window
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Check whether an hour of the day falls inside the window
    pub fn contains(&self, hour: f64) -> bool {
        let h = hour.rem_euclid(24.0);
        if self.start_hour > self.end_hour {
            h >= self.start_hour || h < self.end_hour
        } else {
            h >= self.start_hour && h < self.end_hour
        }
    }
}

impl Default for SleepWindow {
    fn default() -> Self {
        Self {
            start_hour: 22.0,
            end_hour: 6.0,
        }
    }
}

/// Per-resident expected signal baselines plus the sleep window.
///
/// Immutable after load; every computation takes it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentBaseline {
    /// Expected mobility profile
    pub mobility: SignalBaseline,
    /// Expected restlessness profile
    pub restlessness: SignalBaseline,
    /// Expected speech drift profile
    pub speech: SignalBaseline,
    /// Expected social isolation profile
    pub social: SignalBaseline,
    /// Habitual sleep window
    pub sleep: SleepWindow,
}

impl ResidentBaseline {
    /// Check whether an hour falls in this resident's sleep window
    pub fn is_night_hour(&self, hour: f64) -> bool {
        self.sleep.contains(hour)
    }

    /// Compute normalized deviations for a state snapshot.
    ///
    /// Mobility's sign is flipped so that a positive deviation uniformly
    /// means elevated risk across all four signals; the scorer relies on
    /// this convention.
    pub fn deviations(&self, state: &CurrentState) -> Deviations {
        Deviations {
            mobility: -self.mobility.deviation(state.mobility),
            restlessness: self.restlessness.deviation(state.restlessness),
            speech: self.speech.deviation(state.speech_drift),
            social: self.social.deviation(state.social_isolation),
        }
    }
}

impl Default for ResidentBaseline {
    fn default() -> Self {
        Self {
            mobility: SignalBaseline::new(70.0, 64.0),
            restlessness: SignalBaseline::new(25.0, 64.0),
            speech: SignalBaseline::new(20.0, 49.0),
            social: SignalBaseline::new(30.0, 81.0),
            sleep: SleepWindow::default(),
        }
    }
}

/// Normalized deviations for one evaluation cycle.
///
/// Positive always means "more risk"; derived each cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Deviations {
    /// Mobility deviation (sign-flipped: positive = less mobile than usual)
    pub mobility: f64,
    /// Restlessness deviation
    pub restlessness: f64,
    /// Speech drift deviation
    pub speech: f64,
    /// Social isolation deviation
    pub social: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deviation_with_zero_variance() {
        let baseline = SignalBaseline::new(50.0, 0.0);
        // Epsilon keeps the division finite
        assert!((baseline.deviation(60.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_normalizes_by_spread() {
        let tight = SignalBaseline::new(50.0, 3.0);
        let wide = SignalBaseline::new(50.0, 99.0);
        assert!((tight.deviation(60.0) - 5.0).abs() < 1e-9);
        assert!((wide.deviation(60.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sleep_window_wraps_midnight() {
        let window = SleepWindow::new(22.0, 6.0);
        assert!(window.contains(23.0));
        assert!(window.contains(5.0));
        assert!(window.contains(0.0));
        assert!(!window.contains(12.0));
        assert!(!window.contains(6.0));
    }

    #[test]
    fn test_sleep_window_same_day() {
        let window = SleepWindow::new(13.0, 15.0);
        assert!(window.contains(13.0));
        assert!(window.contains(14.5));
        assert!(!window.contains(15.0));
        assert!(!window.contains(2.0));
    }

    #[test]
    fn test_sleep_window_normalizes_hour() {
        let window = SleepWindow::new(22.0, 6.0);
        assert!(window.contains(23.0 + 24.0));
        assert!(window.contains(-1.0)); // 23:00 the previous day
    }

    #[test]
    fn test_mobility_deviation_sign_flipped() {
        let baseline = ResidentBaseline::default();
        let mut state = CurrentState::default();
        state.mobility = baseline.mobility.mean - 20.0;

        let deviations = baseline.deviations(&state);
        assert!(
            deviations.mobility > 0.0,
            "low mobility must read as elevated risk"
        );
    }
}
