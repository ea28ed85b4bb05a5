//! Risk scores, urgency bands, and cross-cycle high-risk memory.

use serde::{Deserialize, Serialize};

/// Clamp a score into the [0, 100] range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// The four bounded risk scores produced each evaluation cycle.
///
/// Invariant: every field lies in [0, 100] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskScores {
    /// Fall risk score
    pub fall: f64,
    /// Cognitive risk score
    pub cognitive: f64,
    /// Loneliness risk score
    pub loneliness: f64,
    /// Weighted overall score
    pub overall: f64,
}

impl RiskScores {
    /// Assemble scores from the three specific components.
    ///
    /// The overall score is the fixed weighted blend
    /// `0.40 * fall + 0.30 * cognitive + 0.30 * loneliness`, clamped.
    pub fn from_components(fall: f64, cognitive: f64, loneliness: f64) -> Self {
        let fall = clamp_score(fall);
        let cognitive = clamp_score(cognitive);
        let loneliness = clamp_score(loneliness);
        let overall = clamp_score(0.40 * fall + 0.30 * cognitive + 0.30 * loneliness);
        Self {
            fall,
            cognitive,
            loneliness,
            overall,
        }
    }

    /// Band of the fall score
    pub fn fall_band(&self) -> UrgencyBand {
        UrgencyBand::classify(self.fall)
    }

    /// Band of the cognitive score
    pub fn cognitive_band(&self) -> UrgencyBand {
        UrgencyBand::classify(self.cognitive)
    }

    /// Band of the loneliness score
    pub fn loneliness_band(&self) -> UrgencyBand {
        UrgencyBand::classify(self.loneliness)
    }

    /// Band of the overall score
    pub fn overall_band(&self) -> UrgencyBand {
        UrgencyBand::classify(self.overall)
    }
}

/// Urgency classification of a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UrgencyBand {
    /// Score below 40
    Low,
    /// Score in [40, 70)
    Medium,
    /// Score of 70 or above
    High,
}

impl UrgencyBand {
    /// Classify a score by the fixed 40/70 thresholds.
    ///
    /// Total over all inputs; callers normally pre-clamp to [0, 100] but
    /// out-of-range values classify by the same thresholds.
    pub fn classify(score: f64) -> Self {
        if score < 40.0 {
            UrgencyBand::Low
        } else if score < 70.0 {
            UrgencyBand::Medium
        } else {
            UrgencyBand::High
        }
    }

    /// Lowercase label used in signatures and narratives
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyBand::Low => "low",
            UrgencyBand::Medium => "medium",
            UrgencyBand::High => "high",
        }
    }

    /// Check whether this band is Medium or High
    pub fn is_elevated(&self) -> bool {
        matches!(self, UrgencyBand::Medium | UrgencyBand::High)
    }
}

impl std::fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Running count of consecutive-ish high-risk cycles.
///
/// The only cross-cycle memory the decision logic depends on. The caller
/// threads it through explicitly: incremented when the overall band is
/// High, decayed by one (floor zero) otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecentHighCount(u32);

impl RecentHighCount {
    /// Create a counter with an explicit value
    pub fn new(count: u32) -> Self {
        Self(count)
    }

    /// Current count
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Fold one cycle's overall band into the counter
    pub fn update(self, overall: UrgencyBand) -> Self {
        match overall {
            UrgencyBand::High => Self(self.0 + 1),
            _ => Self(self.0.saturating_sub(1)),
        }
    }
}
