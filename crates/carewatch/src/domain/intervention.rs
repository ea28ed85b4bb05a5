//! Intervention ladder types.

use serde::{Deserialize, Serialize};

/// The four discrete escalation levels, strictly ordered by severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum InterventionLevel {
    /// Level 1 - passive environment adjustment only
    AmbientCue = 1,
    /// Level 2 - a gentle prompt delivered to the resident
    GentlePrompt = 2,
    /// Level 3 - soft alert routed to staff
    StaffSoftAlert = 3,
    /// Level 4 - full escalation
    Escalate = 4,
}

impl InterventionLevel {
    /// Numeric level (1 = lowest severity)
    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            InterventionLevel::AmbientCue => "Ambient Cue",
            InterventionLevel::GentlePrompt => "Gentle Prompt",
            InterventionLevel::StaffSoftAlert => "Staff Soft Alert",
            InterventionLevel::Escalate => "Escalate",
        }
    }

    /// Whether this level warrants notifying staff
    pub fn involves_staff(&self) -> bool {
        matches!(
            self,
            InterventionLevel::StaffSoftAlert | InterventionLevel::Escalate
        )
    }
}

impl std::fmt::Display for InterventionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{} {}", self.level(), self.name())
    }
}

/// The concrete message set for one selected intervention.
///
/// Deterministic template output; always producible with zero network
/// connectivity. Enrichment may replace the text but never the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionPlan {
    /// Selected escalation level
    pub level: InterventionLevel,
    /// Message shown to the resident, if any
    pub resident_message: Option<String>,
    /// Message routed to staff, if any
    pub staff_message: Option<String>,
    /// Ambient environment adjustment cue
    pub environment_cue: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_strictly_ordered() {
        assert!(InterventionLevel::AmbientCue < InterventionLevel::GentlePrompt);
        assert!(InterventionLevel::GentlePrompt < InterventionLevel::StaffSoftAlert);
        assert!(InterventionLevel::StaffSoftAlert < InterventionLevel::Escalate);
    }

    #[test]
    fn test_staff_involvement() {
        assert!(!InterventionLevel::AmbientCue.involves_staff());
        assert!(!InterventionLevel::GentlePrompt.involves_staff());
        assert!(InterventionLevel::StaffSoftAlert.involves_staff());
        assert!(InterventionLevel::Escalate.involves_staff());
    }
}
