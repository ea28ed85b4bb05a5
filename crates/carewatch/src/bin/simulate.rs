//! Carewatch synthetic day simulator.
//!
//! Feeds a random-walk day of signals through the decision engine and
//! prints each cycle's decision. Enrichment is configured through the
//! `CAREWATCH_*` environment variables and stays off without an API key.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use carewatch::most_recent_elevated;
use carewatch::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Carewatch synthetic day simulator")]
struct Args {
    /// Number of evaluation cycles to run
    #[arg(long, default_value = "96")]
    cycles: u32,

    /// Simulated minutes between cycles
    #[arg(long, default_value = "15")]
    step_minutes: u32,

    /// Wall-clock delay between cycles in milliseconds (0 = fast replay)
    #[arg(long, default_value = "0")]
    tick_ms: u64,

    /// RNG seed for a reproducible day
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Hour of day the simulation starts at
    #[arg(long, default_value = "8.0")]
    start_hour: f64,

    /// Report wearable vitals in the synthetic stream
    #[arg(long)]
    wearables: bool,
}

/// One random-walk step, clamped to the signal's range.
fn drift(rng: &mut StdRng, value: f64, spread: f64, lo: f64, hi: f64) -> f64 {
    (value + rng.gen_range(-spread..=spread)).clamp(lo, hi)
}

fn step_state(rng: &mut StdRng, state: &mut CurrentState, step_minutes: u32) {
    state.time_of_day = (state.time_of_day + step_minutes as f64 / 60.0).rem_euclid(24.0);
    state.mobility = drift(rng, state.mobility, 6.0, 0.0, 100.0);
    state.restlessness = drift(rng, state.restlessness, 6.0, 0.0, 100.0);
    state.speech_drift = drift(rng, state.speech_drift, 4.0, 0.0, 100.0);
    state.social_isolation = drift(rng, state.social_isolation, 5.0, 0.0, 100.0);
    state.staff_load = drift(rng, state.staff_load, 8.0, 0.0, 100.0);
    if state.use_wearables {
        state.heart_rate = drift(rng, state.heart_rate, 4.0, 40.0, 140.0);
        state.spo2 = drift(rng, state.spo2, 0.6, 85.0, 100.0);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let enrichment = EnrichmentConfig::from_env();
    let config = EngineConfig::builder()
        .debounce_ms(600)
        .enrichment(enrichment.clone())
        .build();
    let engine = CareEngine::new(config);
    let pipeline = engine.enrichment_pipeline();

    if enrichment.is_available() {
        let client = LlmClient::new(enrichment.clone());
        if client.probe().await {
            info!(base_url = %enrichment.base_url, "enrichment endpoint reachable");
        } else {
            warn!(base_url = %enrichment.base_url, "enrichment endpoint not reachable, templates only");
        }
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let baseline = ResidentBaseline::default();
    let mut state = CurrentState {
        time_of_day: args.start_hour.rem_euclid(24.0),
        use_wearables: args.wearables,
        ..CurrentState::default()
    };

    let mut recent = RecentHighCount::default();
    let mut timeline: Vec<TimelineEvent> = Vec::new();
    let mut level_counts = [0u32; 4];
    // Fast replay counts as a running simulation and suppresses enrichment
    let fast_replay = args.tick_ms == 0;

    for cycle in 0..args.cycles {
        step_state(&mut rng, &mut state, args.step_minutes);

        let output = engine.evaluate(&baseline, &state, recent);
        recent = recent.update(output.scores.overall_band());
        level_counts[(output.level.level() - 1) as usize] += 1;

        if output.scores.overall_band().is_elevated() {
            timeline.push(TimelineEvent::new(
                output.timeline_label(),
                output.scores.overall_band(),
            ));
        }

        let recent_event = most_recent_elevated(&timeline);
        let decision = pipeline.evaluate(
            &output.gate_inputs(recent_event, fast_replay, enrichment.is_available()),
            output.message_context(&state),
        );

        info!(
            cycle,
            time = %carewatch::format_hhmm(state.time_of_day),
            overall = output.scores.overall,
            band = %output.scores.overall_band(),
            level = %output.level,
            gate = ?decision,
            "{}",
            output.explanation.narrative
        );

        if args.tick_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.tick_ms)).await;
        }
    }

    // Let any debounced enrichment call settle before reporting
    if !fast_replay {
        tokio::time::sleep(engine.config().debounce + Duration::from_millis(250)).await;
    }
    pipeline.stop_all();

    info!(
        ambient = level_counts[0],
        prompt = level_counts[1],
        staff = level_counts[2],
        escalate = level_counts[3],
        enrichment_calls = pipeline.call_count(),
        "simulation complete"
    );
    if let Some(messages) = pipeline.latest() {
        info!(explanation = %messages.explanation_text, "latest enrichment");
    }

    Ok(())
}
