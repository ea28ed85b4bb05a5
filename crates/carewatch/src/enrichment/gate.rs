//! Change-gate: suppresses redundant enrichment calls.

use crate::domain::{InterventionLevel, TimelineEvent, UrgencyBand};
use crate::scoring::Factor;

/// Decision-relevant inputs for one gate check.
#[derive(Debug, Clone, Copy)]
pub struct GateInputs<'a> {
    /// Selected escalation level
    pub level: InterventionLevel,
    /// Overall urgency band
    pub overall_band: UrgencyBand,
    /// Ranked contributing factors (top two enter the signature)
    pub top_factors: &'a [Factor],
    /// Most recent elevated timeline event, if any
    pub recent_event: Option<&'a TimelineEvent>,
    /// Whether a full-day simulation is currently running
    pub simulation_running: bool,
    /// Whether enrichment is enabled and configured
    pub enrichment_available: bool,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// A full-day simulation is running; do nothing
    SkipSimulationRunning,
    /// Enrichment is disabled or unconfigured; do nothing
    SkipDisabled,
    /// Level is below 2: cancel outstanding work and clear cached output
    CancelAndClear,
    /// Signature unchanged since the last check; no call
    SkipUnchanged,
    /// Signature changed; issue a request
    Proceed,
}

/// Compact fingerprint comparator over decision-relevant state.
#[derive(Debug, Default)]
pub struct ChangeGate {
    prev_signature: Option<String>,
}

impl ChangeGate {
    /// Create a gate with no stored signature
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an enrichment request should be issued.
    ///
    /// Updates the stored signature only on [`GateDecision::Proceed`].
    /// A [`GateDecision::CancelAndClear`] also forgets the signature so
    /// that returning above level 2 always issues a fresh request.
    pub fn check(&mut self, inputs: &GateInputs<'_>) -> GateDecision {
        if inputs.simulation_running {
            return GateDecision::SkipSimulationRunning;
        }
        if !inputs.enrichment_available {
            return GateDecision::SkipDisabled;
        }
        if inputs.level.level() < 2 {
            self.prev_signature = None;
            return GateDecision::CancelAndClear;
        }

        let signature = Self::signature(inputs);
        if self.prev_signature.as_deref() == Some(signature.as_str()) {
            return GateDecision::SkipUnchanged;
        }

        self.prev_signature = Some(signature);
        GateDecision::Proceed
    }

    /// Forget the stored signature.
    ///
    /// Used by force-refresh paths so the next automatic check still
    /// compares against fresh state.
    pub fn reset(&mut self) {
        self.prev_signature = None;
    }

    fn signature(inputs: &GateInputs<'_>) -> String {
        let factors: Vec<&str> = inputs
            .top_factors
            .iter()
            .take(2)
            .map(|f| f.name.as_str())
            .collect();

        let event = inputs
            .recent_event
            .map(|e| format!("{}:{}", e.label, e.urgency))
            .unwrap_or_else(|| "none".to_string());

        format!(
            "L{}|{}|{}|{}",
            inputs.level.level(),
            inputs.overall_band,
            factors.join("+"),
            event
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(names: &[&str]) -> Vec<Factor> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Factor {
                name: name.to_string(),
                weight: 0.9 - i as f64 * 0.1,
            })
            .collect()
    }

    fn inputs<'a>(
        level: InterventionLevel,
        band: UrgencyBand,
        top_factors: &'a [Factor],
        recent_event: Option<&'a TimelineEvent>,
    ) -> GateInputs<'a> {
        GateInputs {
            level,
            overall_band: band,
            top_factors,
            recent_event,
            simulation_running: false,
            enrichment_available: true,
        }
    }

    #[test]
    fn test_identical_signatures_skip() {
        let mut gate = ChangeGate::new();
        let f = factors(&["Reduced mobility", "Night-time hours"]);

        let first = gate.check(&inputs(
            InterventionLevel::GentlePrompt,
            UrgencyBand::Medium,
            &f,
            None,
        ));
        assert_eq!(first, GateDecision::Proceed);

        let second = gate.check(&inputs(
            InterventionLevel::GentlePrompt,
            UrgencyBand::Medium,
            &f,
            None,
        ));
        assert_eq!(second, GateDecision::SkipUnchanged);
    }

    #[test]
    fn test_changed_top_factor_proceeds_once() {
        let mut gate = ChangeGate::new();
        let before = factors(&["Reduced mobility", "Night-time hours"]);
        let after = factors(&["Elevated restlessness", "Night-time hours"]);

        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::GentlePrompt,
                UrgencyBand::Medium,
                &before,
                None,
            )),
            GateDecision::Proceed
        );
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::GentlePrompt,
                UrgencyBand::Medium,
                &after,
                None,
            )),
            GateDecision::Proceed
        );
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::GentlePrompt,
                UrgencyBand::Medium,
                &after,
                None,
            )),
            GateDecision::SkipUnchanged
        );
    }

    #[test]
    fn test_third_factor_does_not_enter_signature() {
        let mut gate = ChangeGate::new();
        let before = factors(&["Reduced mobility", "Night-time hours", "High staff workload"]);
        let after = factors(&["Reduced mobility", "Night-time hours", "Social isolation"]);

        gate.check(&inputs(
            InterventionLevel::GentlePrompt,
            UrgencyBand::Medium,
            &before,
            None,
        ));
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::GentlePrompt,
                UrgencyBand::Medium,
                &after,
                None,
            )),
            GateDecision::SkipUnchanged
        );
    }

    #[test]
    fn test_recent_event_enters_signature() {
        let mut gate = ChangeGate::new();
        let f = factors(&["Reduced mobility"]);
        let event = TimelineEvent::new("fall risk rising", UrgencyBand::High);

        gate.check(&inputs(
            InterventionLevel::StaffSoftAlert,
            UrgencyBand::Medium,
            &f,
            None,
        ));
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::StaffSoftAlert,
                UrgencyBand::Medium,
                &f,
                Some(&event),
            )),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_low_level_cancels_and_clears() {
        let mut gate = ChangeGate::new();
        let f = factors(&["Reduced mobility"]);

        gate.check(&inputs(
            InterventionLevel::GentlePrompt,
            UrgencyBand::Medium,
            &f,
            None,
        ));
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::AmbientCue,
                UrgencyBand::Low,
                &f,
                None,
            )),
            GateDecision::CancelAndClear
        );

        // Returning to level 2 issues again even with the old signature
        assert_eq!(
            gate.check(&inputs(
                InterventionLevel::GentlePrompt,
                UrgencyBand::Medium,
                &f,
                None,
            )),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_simulation_and_disabled_skips() {
        let mut gate = ChangeGate::new();
        let f = factors(&["Reduced mobility"]);

        let mut sim = inputs(
            InterventionLevel::StaffSoftAlert,
            UrgencyBand::High,
            &f,
            None,
        );
        sim.simulation_running = true;
        assert_eq!(gate.check(&sim), GateDecision::SkipSimulationRunning);

        let mut disabled = inputs(
            InterventionLevel::StaffSoftAlert,
            UrgencyBand::High,
            &f,
            None,
        );
        disabled.enrichment_available = false;
        assert_eq!(gate.check(&disabled), GateDecision::SkipDisabled);
    }

    #[test]
    fn test_reset_forces_next_proceed() {
        let mut gate = ChangeGate::new();
        let f = factors(&["Reduced mobility"]);
        let check = inputs(
            InterventionLevel::GentlePrompt,
            UrgencyBand::Medium,
            &f,
            None,
        );

        assert_eq!(gate.check(&check), GateDecision::Proceed);
        gate.reset();
        assert_eq!(gate.check(&check), GateDecision::Proceed);
    }
}
