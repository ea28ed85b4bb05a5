//! Adaptive message controller: debounce, supersession, cancellation.
//!
//! At most one enrichment call is ever in flight. Issuing a new one
//! (via `request`, `force_request`, or `stop_all`) always cancels the
//! predecessor first, so a stale response can never overwrite a fresher
//! one. Cancellation is cooperative: a per-call flag is checked before
//! delivery, which also covers calls that complete after being
//! cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{CareError, Result};

use super::client::MessageGenerator;
use super::context::{GeneratedMessages, MessageContext};

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// No call pending or in flight
    #[default]
    Idle,
    /// A call is in flight
    Generating,
    /// The most recent call failed
    Error,
}

/// Receiver for controller outcomes.
#[async_trait::async_trait]
pub trait EnrichmentSink: Send + Sync {
    /// A call completed and was still relevant on completion
    async fn deliver(&self, messages: GeneratedMessages);

    /// A call failed for a reason other than cancellation
    async fn failed(&self, error: CareError);
}

struct ControllerInner {
    state: ControllerState,
    /// Bumped on every request/force/stop; lets a stale debounce timer
    /// detect that it has been superseded even if its abort was missed.
    epoch: u64,
    /// Pending debounce timer, at most one
    pending: Option<JoinHandle<()>>,
    /// Cancellation flag of the in-flight call, at most one
    inflight: Option<Arc<AtomicBool>>,
    /// Calls that completed successfully and were delivered
    delivered: u64,
}

/// Manages the lifecycle of zero-or-one in-flight enrichment call.
#[derive(Clone)]
pub struct MessageController {
    generator: Arc<dyn MessageGenerator>,
    debounce: Duration,
    inner: Arc<Mutex<ControllerInner>>,
}

impl MessageController {
    /// Create a controller over a generator with a fixed debounce delay.
    pub fn new(generator: Arc<dyn MessageGenerator>, debounce: Duration) -> Self {
        Self {
            generator,
            debounce,
            inner: Arc::new(Mutex::new(ControllerInner {
                state: ControllerState::Idle,
                epoch: 0,
                pending: None,
                inflight: None,
                delivered: 0,
            })),
        }
    }

    /// Schedule a debounced call, superseding any pending or in-flight one.
    pub fn request(&self, ctx: MessageContext, sink: Arc<dyn EnrichmentSink>) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        let epoch = inner.epoch;
        Self::abort_pending(&mut inner);
        Self::cancel_inflight(&mut inner);

        let this = self.clone();
        let delay = self.debounce;
        inner.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire(epoch, ctx, sink).await;
        }));
    }

    /// Issue a call immediately, skipping the debounce delay.
    pub fn force_request(&self, ctx: MessageContext, sink: Arc<dyn EnrichmentSink>) {
        let cancelled = {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            Self::abort_pending(&mut inner);
            Self::cancel_inflight(&mut inner);

            let flag = Arc::new(AtomicBool::new(false));
            inner.inflight = Some(flag.clone());
            inner.state = ControllerState::Generating;
            flag
        };

        let this = self.clone();
        tokio::spawn(async move {
            this.run_call(ctx, sink, cancelled).await;
        });
    }

    /// Cancel everything and return to idle.
    ///
    /// No sink callback fires for work cancelled here, even if the
    /// underlying call later completes.
    pub fn stop_all(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        Self::abort_pending(&mut inner);
        Self::cancel_inflight(&mut inner);
        inner.state = ControllerState::Idle;
        debug!("message controller stopped");
    }

    /// Current lifecycle state
    pub fn status(&self) -> ControllerState {
        self.inner.lock().state
    }

    /// Number of calls that completed successfully and were delivered
    pub fn call_count(&self) -> u64 {
        self.inner.lock().delivered
    }

    fn abort_pending(inner: &mut ControllerInner) {
        if let Some(handle) = inner.pending.take() {
            handle.abort();
            debug!("superseded pending debounce timer");
        }
    }

    fn cancel_inflight(inner: &mut ControllerInner) {
        if let Some(flag) = inner.inflight.take() {
            flag.store(true, Ordering::SeqCst);
            debug!("cancelled in-flight enrichment call");
        }
    }

    /// Debounce timer expiry: promote the pending request to in-flight.
    async fn fire(&self, epoch: u64, ctx: MessageContext, sink: Arc<dyn EnrichmentSink>) {
        let cancelled = {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                // Superseded between expiry and this point
                return;
            }
            inner.pending = None;
            Self::cancel_inflight(&mut inner);

            let flag = Arc::new(AtomicBool::new(false));
            inner.inflight = Some(flag.clone());
            inner.state = ControllerState::Generating;
            flag
        };

        self.run_call(ctx, sink, cancelled).await;
    }

    async fn run_call(
        &self,
        ctx: MessageContext,
        sink: Arc<dyn EnrichmentSink>,
        cancelled: Arc<AtomicBool>,
    ) {
        let result = self.generator.generate(&ctx).await;
        let outcome = self.settle(result, &cancelled);

        match outcome {
            Some(Ok(messages)) => sink.deliver(messages).await,
            Some(Err(error)) => {
                warn!(%error, "enrichment call failed");
                sink.failed(error).await;
            }
            None => debug!("discarding cancelled enrichment result"),
        }
    }

    /// Record the outcome of a completed call; `None` means the call was
    /// cancelled between completion and delivery and must stay silent.
    fn settle(
        &self,
        result: Result<GeneratedMessages>,
        cancelled: &Arc<AtomicBool>,
    ) -> Option<Result<GeneratedMessages>> {
        let mut inner = self.inner.lock();
        if cancelled.load(Ordering::SeqCst) {
            return None;
        }

        if inner
            .inflight
            .as_ref()
            .is_some_and(|flag| Arc::ptr_eq(flag, cancelled))
        {
            inner.inflight = None;
        }

        match result {
            Ok(messages) => {
                inner.state = ControllerState::Idle;
                inner.delivered += 1;
                Some(Ok(messages))
            }
            Err(error) => {
                inner.state = ControllerState::Error;
                Some(Err(error))
            }
        }
    }
}
