//! # Carewatch
//!
//! Ambient monitoring decision pipeline for a senior residence: turns
//! continuous behavioral signals into bounded risk scores, selects an
//! escalating intervention, explains the decision, and optionally
//! enriches the output with messages from a remote text-generation
//! service.
//!
//! ## Features
//!
//! - **Baseline Model**: per-resident expected signal profiles and a
//!   wrap-around sleep window
//! - **Risk Scorer**: four bounded scores (fall, cognitive, loneliness,
//!   overall) with urgency-band classification
//! - **Explanation Builder**: ranked contributing factors plus a
//!   band-appropriate narrative
//! - **Intervention Selector**: a four-level escalation ladder with
//!   deterministic message templates
//! - **Adaptive Message Controller**: debounced, supersede-on-new,
//!   cancellation-safe enrichment calls
//! - **Change-Gate**: signature comparison that suppresses redundant
//!   enrichment requests
//!
//! Every decision is producible offline; enrichment is best-effort and
//! always falls back to the deterministic templates.
//!
//! ## Example
//!
//! ```rust
//! use carewatch::prelude::*;
//!
//! let engine = CareEngine::new(EngineConfig::default());
//! let baseline = ResidentBaseline::default();
//! let state = CurrentState::default();
//!
//! let output = engine.evaluate(&baseline, &state, RecentHighCount::default());
//! assert!(output.scores.overall <= 100.0);
//! let _next = RecentHighCount::default().update(output.scores.overall_band());
//! ```

#![warn(missing_docs)]

pub mod domain;
pub mod enrichment;
pub mod intervention;
pub mod scoring;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use domain::{
    clamp_score, format_hhmm, most_recent_elevated, CurrentState, Deviations, InterventionLevel,
    InterventionPlan, RecentHighCount, ResidentBaseline, RiskScores, SignalBaseline, SleepWindow,
    TimelineEvent, TimelineEventId, UrgencyBand,
};
pub use enrichment::{
    ChangeGate, ControllerState, EnrichmentConfig, EnrichmentPipeline, EnrichmentSink,
    GateDecision, GateInputs, GeneratedMessages, LlmClient, MessageContext, MessageController,
    MessageGenerator,
};
pub use intervention::{DecisionInputs, InterventionSelector, MessageTemplates};
pub use scoring::{ExplanationBuilder, ExplanationOutput, Factor, RiskScorer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for carewatch operations
pub type Result<T> = std::result::Result<T, CareError>;

/// Unified error type for carewatch operations
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Enrichment endpoint rejected the request
    #[error("enrichment endpoint returned {status}: {body}")]
    Enrichment {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Network failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Payload serialization failure
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Engine-level configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed debounce delay before an enrichment call is issued
    pub debounce: Duration,
    /// Enrichment endpoint configuration
    pub enrichment: EnrichmentConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(600),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the debounce delay in milliseconds (floored at 50)
    pub fn debounce_ms(mut self, millis: u64) -> Self {
        self.config.debounce = Duration::from_millis(millis.max(50));
        self
    }

    /// Set the enrichment configuration
    pub fn enrichment(mut self, enrichment: EnrichmentConfig) -> Self {
        self.config.enrichment = enrichment;
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// One evaluation cycle's complete output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutput {
    /// Whether the snapshot fell in the resident's sleep window
    pub night: bool,
    /// Normalized deviations from the baseline
    pub deviations: Deviations,
    /// The four bounded risk scores
    pub scores: RiskScores,
    /// Selected escalation level
    pub level: InterventionLevel,
    /// Deterministic message set for the level
    pub plan: InterventionPlan,
    /// Ranked factors and narrative
    pub explanation: ExplanationOutput,
}

impl EvaluationOutput {
    /// Build the sanitized context for an enrichment request.
    pub fn message_context(&self, state: &CurrentState) -> MessageContext {
        MessageContext::new(
            self.level,
            &self.scores,
            &self.explanation.factors,
            state,
            self.night,
        )
    }

    /// Assemble change-gate inputs for this cycle.
    pub fn gate_inputs<'a>(
        &'a self,
        recent_event: Option<&'a TimelineEvent>,
        simulation_running: bool,
        enrichment_available: bool,
    ) -> GateInputs<'a> {
        GateInputs {
            level: self.level,
            overall_band: self.scores.overall_band(),
            top_factors: &self.explanation.factors,
            recent_event,
            simulation_running,
            enrichment_available,
        }
    }

    /// Short label suitable for a timeline entry.
    pub fn timeline_label(&self) -> String {
        format!("{} ({} overall)", self.level.name(), self.scores.overall_band())
    }
}

/// The decision engine: a pure function of its inputs per cycle.
///
/// Cross-cycle memory ([`RecentHighCount`], timeline events, the gate
/// signature) is threaded explicitly by the caller, which keeps every
/// evaluation referentially transparent and independently testable.
pub struct CareEngine {
    config: EngineConfig,
}

impl CareEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Access the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one evaluation cycle over a state snapshot.
    pub fn evaluate(
        &self,
        baseline: &ResidentBaseline,
        state: &CurrentState,
        recent_high_count: RecentHighCount,
    ) -> EvaluationOutput {
        let night = baseline.is_night_hour(state.time_of_day);
        let deviations = baseline.deviations(state);
        let scores = RiskScorer::score(state, &deviations, night);

        let inputs = DecisionInputs {
            state,
            scores: &scores,
            night,
            recent_high_count,
        };
        let level = InterventionSelector::select(&inputs);
        let plan = MessageTemplates::plan(level, &inputs);
        let explanation =
            ExplanationBuilder::build(state, &deviations, night, scores.overall_band());

        tracing::debug!(
            overall = scores.overall,
            band = %scores.overall_band(),
            level = level.level(),
            "evaluation cycle complete"
        );

        EvaluationOutput {
            night,
            deviations,
            scores,
            level,
            plan,
            explanation,
        }
    }

    /// Build an enrichment pipeline against the configured endpoint.
    pub fn enrichment_pipeline(&self) -> EnrichmentPipeline {
        let client = Arc::new(LlmClient::new(self.config.enrichment.clone()));
        EnrichmentPipeline::new(client, self.config.debounce)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CareEngine, CareError, ChangeGate, ControllerState, CurrentState, Deviations,
        EngineConfig, EnrichmentConfig, EnrichmentPipeline, EvaluationOutput, ExplanationBuilder,
        Factor, GateDecision, GeneratedMessages, InterventionLevel, InterventionPlan, LlmClient,
        MessageContext, MessageController, RecentHighCount, ResidentBaseline, Result, RiskScorer,
        RiskScores, SleepWindow, TimelineEvent, UrgencyBand,
    };
}
