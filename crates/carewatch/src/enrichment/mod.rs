//! Optional enrichment of deterministic templates via a remote
//! text-generation endpoint.
//!
//! The deterministic intervention output is always available; everything
//! in this module is best-effort on top of it.

pub mod client;
pub mod config;
pub mod context;
pub mod controller;
pub mod gate;

pub use client::{ChatMessage, ChatRequest, LlmClient, MessageGenerator};
pub use config::{EnrichmentConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use context::{
    parse_generated, GeneratedMessages, MessageContext, DEFAULT_EXPLANATION, SYSTEM_PROMPT,
};
pub use controller::{ControllerState, EnrichmentSink, MessageController};
pub use gate::{ChangeGate, GateDecision, GateInputs};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::CareError;

/// Caching sink: remembers the last delivered messages and the last
/// failure. A failure never discards previously delivered messages.
#[derive(Default)]
struct EnrichmentStore {
    latest: Mutex<Option<GeneratedMessages>>,
    last_error: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl EnrichmentSink for EnrichmentStore {
    async fn deliver(&self, messages: GeneratedMessages) {
        *self.latest.lock() = Some(messages);
        *self.last_error.lock() = None;
    }

    async fn failed(&self, error: CareError) {
        *self.last_error.lock() = Some(error.to_string());
    }
}

/// Glue between the change-gate, the controller, and the cached result.
///
/// One pipeline per monitored resident session. Each evaluation cycle
/// calls [`EnrichmentPipeline::evaluate`]; the UI reads
/// [`EnrichmentPipeline::latest`] whenever it renders.
pub struct EnrichmentPipeline {
    controller: MessageController,
    gate: Mutex<ChangeGate>,
    store: Arc<EnrichmentStore>,
}

impl EnrichmentPipeline {
    /// Create a pipeline over a generator with the given debounce delay.
    pub fn new(generator: Arc<dyn MessageGenerator>, debounce: Duration) -> Self {
        Self {
            controller: MessageController::new(generator, debounce),
            gate: Mutex::new(ChangeGate::new()),
            store: Arc::new(EnrichmentStore::default()),
        }
    }

    /// Run the gate for one cycle and apply its decision.
    ///
    /// Returns the decision so callers can log or count it.
    pub fn evaluate(&self, inputs: &GateInputs<'_>, ctx: MessageContext) -> GateDecision {
        let decision = self.gate.lock().check(inputs);

        match decision {
            GateDecision::Proceed => {
                self.controller.request(ctx, self.store.clone());
            }
            GateDecision::CancelAndClear => {
                self.controller.stop_all();
                *self.store.latest.lock() = None;
            }
            GateDecision::SkipSimulationRunning
            | GateDecision::SkipDisabled
            | GateDecision::SkipUnchanged => {}
        }

        decision
    }

    /// Bypass the signature comparison and refresh immediately.
    pub fn force_refresh(&self, ctx: MessageContext) {
        self.gate.lock().reset();
        self.controller.force_request(ctx, self.store.clone());
    }

    /// Cancel all outstanding work
    pub fn stop_all(&self) {
        self.controller.stop_all();
    }

    /// Last successfully delivered messages, if any
    pub fn latest(&self) -> Option<GeneratedMessages> {
        self.store.latest.lock().clone()
    }

    /// Description of the most recent failure, cleared by a later success
    pub fn last_error(&self) -> Option<String> {
        self.store.last_error.lock().clone()
    }

    /// Controller lifecycle state
    pub fn status(&self) -> ControllerState {
        self.controller.status()
    }

    /// Number of delivered enrichment calls
    pub fn call_count(&self) -> u64 {
        self.controller.call_count()
    }
}
