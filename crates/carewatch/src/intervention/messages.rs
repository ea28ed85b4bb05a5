//! Deterministic message templates per escalation level.

use crate::domain::{format_hhmm, InterventionLevel, InterventionPlan};

use super::selector::DecisionInputs;

/// Template renderer for the four escalation levels.
///
/// Output is always producible offline; enrichment may later replace
/// the wording but never the selected level.
pub struct MessageTemplates;

impl MessageTemplates {
    /// Render the message set for an already-selected level.
    pub fn plan(level: InterventionLevel, inputs: &DecisionInputs<'_>) -> InterventionPlan {
        match level {
            InterventionLevel::AmbientCue => Self::ambient_cue(inputs),
            InterventionLevel::GentlePrompt => Self::gentle_prompt(inputs),
            InterventionLevel::StaffSoftAlert => Self::staff_soft_alert(inputs),
            InterventionLevel::Escalate => Self::escalate(inputs),
        }
    }

    fn ambient_cue(inputs: &DecisionInputs<'_>) -> InterventionPlan {
        let cue = if inputs.night {
            "Soft warm floor-path lighting between bed and bathroom.".to_string()
        } else {
            "Neutral daylight balance in the main living area.".to_string()
        };

        InterventionPlan {
            level: InterventionLevel::AmbientCue,
            resident_message: None,
            staff_message: None,
            environment_cue: cue,
        }
    }

    fn gentle_prompt(inputs: &DecisionInputs<'_>) -> InterventionPlan {
        let time = format_hhmm(inputs.state.time_of_day);
        let scores = inputs.scores;

        let resident = if scores.loneliness > scores.fall {
            format!(
                "It's {}. Would you like to call someone close to you? \
                 A short chat often brightens the day.",
                time
            )
        } else {
            format!(
                "Just a gentle reminder to take your time when moving around. \
                 There's no rush at {}.",
                time
            )
        };

        InterventionPlan {
            level: InterventionLevel::GentlePrompt,
            resident_message: Some(resident),
            staff_message: None,
            environment_cue: "Calming ambient lighting with reduced background noise.".to_string(),
        }
    }

    fn staff_soft_alert(inputs: &DecisionInputs<'_>) -> InterventionPlan {
        let time = format_hhmm(inputs.state.time_of_day);
        let scores = inputs.scores;

        let staff = if scores.fall >= 70.0 {
            format!(
                "Fall risk at {}/100 as of {}. An in-person check within \
                 the next 15 minutes is recommended.",
                scores.fall.round(),
                time
            )
        } else {
            format!(
                "Combined risk is elevated (overall {}/100) while staffing is \
                 stretched. A brief look-in at {} is advised.",
                scores.overall.round(),
                time
            )
        };

        InterventionPlan {
            level: InterventionLevel::StaffSoftAlert,
            resident_message: Some(
                "A caregiver will check in with you shortly. Everything is okay.".to_string(),
            ),
            staff_message: Some(staff),
            environment_cue: "Calming light scene; walking paths clearly lit.".to_string(),
        }
    }

    fn escalate(inputs: &DecisionInputs<'_>) -> InterventionPlan {
        let time = format_hhmm(inputs.state.time_of_day);
        let scores = inputs.scores;
        let state = inputs.state;

        let staff = if state.use_wearables && state.spo2 < 90.0 {
            format!(
                "Escalation: SpO2 at {}% with overall risk {}/100 as of {}. \
                 Immediate response required.",
                state.spo2.round(),
                scores.overall.round(),
                time
            )
        } else {
            format!(
                "Escalation: risk has stayed high across {} recent checks \
                 (overall {}/100 as of {}). Immediate response required.",
                inputs.recent_high_count.value(),
                scores.overall.round(),
                time
            )
        };

        InterventionPlan {
            level: InterventionLevel::Escalate,
            resident_message: Some(
                "Help is on the way. Please stay where you are; someone is \
                 coming to see you."
                    .to_string(),
            ),
            staff_message: Some(staff),
            environment_cue: "High-alert: full room lighting and response team notified."
                .to_string(),
        }
    }
}
