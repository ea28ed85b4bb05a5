//! Priority-ordered intervention selection.

use crate::domain::{CurrentState, InterventionLevel, RecentHighCount, RiskScores, UrgencyBand};

/// Everything the decision table reads for one cycle.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    /// Current state snapshot
    pub state: &'a CurrentState,
    /// Scores computed for the same snapshot
    pub scores: &'a RiskScores,
    /// Whether the snapshot falls in the resident's sleep window
    pub night: bool,
    /// Caller-threaded cross-cycle high-risk counter
    pub recent_high_count: RecentHighCount,
}

impl<'a> DecisionInputs<'a> {
    /// Wearable vitals outside the safe envelope
    pub fn vitals_abnormal(&self) -> bool {
        self.state.use_wearables
            && (self.state.heart_rate > 120.0 || self.state.spo2 < 90.0)
    }
}

/// The escalation ladder decision table.
///
/// Evaluated top to bottom, first match wins; this is not a linear
/// combination. The final branch is an explicit default so the ladder
/// never produces "no intervention".
pub struct InterventionSelector;

impl InterventionSelector {
    /// Select the escalation level for one evaluation cycle.
    pub fn select(inputs: &DecisionInputs<'_>) -> InterventionLevel {
        let scores = inputs.scores;
        let overall = scores.overall_band();
        let fall = scores.fall_band();

        if (overall == UrgencyBand::High && inputs.vitals_abnormal())
            || inputs.recent_high_count.value() >= 3
        {
            return InterventionLevel::Escalate;
        }

        if fall == UrgencyBand::High
            || (overall == UrgencyBand::Medium && inputs.state.staff_load > 65.0)
        {
            return InterventionLevel::StaffSoftAlert;
        }

        if fall == UrgencyBand::Medium
            || scores.loneliness_band().is_elevated()
            || scores.cognitive_band() == UrgencyBand::Medium
        {
            return InterventionLevel::GentlePrompt;
        }

        if inputs.night && fall != UrgencyBand::High {
            return InterventionLevel::AmbientCue;
        }

        InterventionLevel::AmbientCue
    }
}
