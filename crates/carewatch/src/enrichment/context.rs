//! Outbound message context and inbound generated-message parsing.

use serde::{Deserialize, Serialize};

use crate::domain::{format_hhmm, CurrentState, InterventionLevel, RiskScores, UrgencyBand};
use crate::scoring::Factor;

/// Maximum characters kept from a generated resident message
pub const RESIDENT_MESSAGE_CAP: usize = 200;

/// Maximum characters kept from a generated staff message
pub const STAFF_MESSAGE_CAP: usize = 300;

/// Maximum characters kept from a generated explanation
pub const EXPLANATION_CAP: usize = 500;

/// Fallback explanation used when the payload omits or mangles one
pub const DEFAULT_EXPLANATION: &str =
    "Support was adjusted based on the latest monitoring signals.";

/// Fixed system rules sent with every generation request.
pub const SYSTEM_PROMPT: &str = "\
You write short, warm, plain-language messages for an ambient care \
assistant in a senior residence. Reply ONLY with a JSON object of the \
form {\"residentMessage\": string|null, \"staffMessage\": string|null, \
\"explanationText\": string}. Resident messages are calm and reassuring, \
at most two sentences, and never mention risk scores or monitoring. \
Staff messages are factual and actionable. The explanation summarizes \
the reasoning in one or two sentences. Do not add any text outside the \
JSON object.";

/// Sanitized, size-bounded view of one decision, sent to the generator.
///
/// Carries no credentials and no raw signal history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    /// Selected escalation level
    pub level: InterventionLevel,
    /// Rounded overall risk score
    pub overall: u32,
    /// Rounded fall risk score
    pub fall: u32,
    /// Rounded cognitive risk score
    pub cognitive: u32,
    /// Rounded loneliness risk score
    pub loneliness: u32,
    /// Overall urgency band
    pub overall_band: UrgencyBand,
    /// Names of the top contributing factors (at most three)
    pub top_factors: Vec<String>,
    /// Zero-padded HH:MM time of day
    pub time_hhmm: String,
    /// Whether the snapshot falls in the sleep window
    pub night: bool,
    /// Rounded staff workload
    pub staff_load: u32,
}

impl MessageContext {
    /// Assemble a context from one cycle's outputs.
    pub fn new(
        level: InterventionLevel,
        scores: &RiskScores,
        factors: &[Factor],
        state: &CurrentState,
        night: bool,
    ) -> Self {
        Self {
            level,
            overall: scores.overall.round() as u32,
            fall: scores.fall.round() as u32,
            cognitive: scores.cognitive.round() as u32,
            loneliness: scores.loneliness.round() as u32,
            overall_band: scores.overall_band(),
            top_factors: factors
                .iter()
                .take(3)
                .map(|f| truncate_chars(&f.name, 64))
                .collect(),
            time_hhmm: format_hhmm(state.time_of_day),
            night,
            staff_load: state.staff_load.round() as u32,
        }
    }

    /// Render the user prompt for the generation request.
    pub fn user_prompt(&self) -> String {
        format!(
            "Situation at {}: intervention level {} ({}). Overall risk {} \
             ({} band); fall {}, cognitive {}, loneliness {}. Contributing \
             factors: {}. It is {}. Staff workload {}/100. Write the \
             resident message (null if level 1), the staff message (null \
             below level 3), and the explanation.",
            self.time_hhmm,
            self.level.level(),
            self.level.name(),
            self.overall,
            self.overall_band,
            self.fall,
            self.cognitive,
            self.loneliness,
            self.top_factors.join(", "),
            if self.night { "night" } else { "daytime" },
            self.staff_load,
        )
    }
}

/// Parsed result of one enrichment call, already sanitized and capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMessages {
    /// Replacement resident message, if the generator produced one
    pub resident_message: Option<String>,
    /// Replacement staff message, if the generator produced one
    pub staff_message: Option<String>,
    /// Natural-language explanation of the decision
    pub explanation_text: String,
}

impl Default for GeneratedMessages {
    fn default() -> Self {
        Self {
            resident_message: None,
            staff_message: None,
            explanation_text: DEFAULT_EXPLANATION.to_string(),
        }
    }
}

/// Raw wire shape before caps and fallbacks are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGenerated {
    resident_message: Option<String>,
    staff_message: Option<String>,
    explanation_text: Option<String>,
}

/// Parse generated content into a safe `GeneratedMessages`.
///
/// Code fences are stripped first; a payload that does not parse at all
/// degrades to the defaults rather than propagating an error.
pub fn parse_generated(content: &str) -> GeneratedMessages {
    let stripped = strip_code_fences(content);

    let raw: RawGenerated = match serde_json::from_str(stripped) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(%error, "unparseable enrichment payload, using defaults");
            return GeneratedMessages::default();
        }
    };

    GeneratedMessages {
        resident_message: raw
            .resident_message
            .map(|s| truncate_chars(&s, RESIDENT_MESSAGE_CAP)),
        staff_message: raw
            .staff_message
            .map(|s| truncate_chars(&s, STAFF_MESSAGE_CAP)),
        explanation_text: match raw.explanation_text {
            Some(text) if !text.trim().is_empty() => truncate_chars(&text, EXPLANATION_CAP),
            _ => DEFAULT_EXPLANATION.to_string(),
        },
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line itself (possibly "```json")
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Truncate at a character boundary, never mid-codepoint.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
