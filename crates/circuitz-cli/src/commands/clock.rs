//! Clock command: sample a clock-driven light on a simulated timebase.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use circuitz_core::{ManualTimebase, NodeGraph, PowerState, POWER_LABEL};

use crate::config::Config;

pub fn execute(
    config: &Config,
    period: Option<u64>,
    samples: Option<usize>,
    step: Option<u64>,
) -> Result<()> {
    let period_ms = period.unwrap_or(config.clock_period_ms);
    let samples = samples.unwrap_or(config.clock_samples);
    let (period_ms, step_ms, trace) = sample(config, period_ms, samples, step)?;

    println!("clock period {period_ms}ms, sampled every {step_ms}ms");
    for (elapsed_ms, state) in trace {
        println!("t={elapsed_ms:>6}ms  {state}");
    }
    Ok(())
}

/// Returns the applied period, the step, and `(elapsed_ms, light)` pairs.
fn sample(
    config: &Config,
    period_ms: u64,
    samples: usize,
    step: Option<u64>,
) -> Result<(u64, u64, Vec<(u64, PowerState)>)> {
    let time = ManualTimebase::new();
    let mut graph =
        NodeGraph::with_config(config.graph_config()).with_timebase(Arc::new(time.clone()));

    let clock = graph.create_node("Clock")?;
    let light = graph.create_node("Light")?;
    graph.wire(clock, light, POWER_LABEL)?;
    let period_ms = graph.set_clock_period(clock, period_ms)?;
    let step_ms = step.unwrap_or(period_ms / 2).max(1);

    let mut trace = Vec::with_capacity(samples);
    for index in 0..samples as u64 {
        let elapsed_ms = index * step_ms;
        time.set_elapsed(Duration::from_millis(elapsed_ms));
        trace.push((elapsed_ms, graph.state(light)?));
    }

    Ok((period_ms, step_ms, trace))
}
