//! Demo command: the two-switch And walkthrough.
//!
//! ```text
//! Switch 1 --A--\
//!                And --Power-- Light
//! Switch 2 --B--/
//! ```

use anyhow::Result;
use circuitz_core::{NodeGraph, PowerState, POWER_LABEL};
use tracing::info;

use crate::config::Config;

/// One printed step of the walkthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoStep {
    pub description: &'static str,
    pub light: PowerState,
}

pub fn execute(config: &Config) -> Result<()> {
    let steps = run(config)?;

    println!("circuitz demo: two switches into an And gate into a light");
    println!("{:-<60}", "");
    for (number, step) in steps.iter().enumerate() {
        println!("{:>2}. {:<46} light={}", number + 1, step.description, step.light);
    }
    Ok(())
}

/// Build the circuit and record the light after each change.
pub fn run(config: &Config) -> Result<Vec<DemoStep>> {
    let mut graph = NodeGraph::with_config(config.graph_config());
    let mut steps = Vec::new();

    let first = graph.create_node("Switch")?;
    let second = graph.create_node("Switch")?;
    let and = graph.create_node("And")?;
    let light = graph.create_node("Light")?;
    graph.wire(and, light, POWER_LABEL)?;

    let mut record = |graph: &NodeGraph, description: &'static str| {
        let state = graph.display_state(light);
        info!(step = description, light = %state, "demo_step");
        steps.push(DemoStep {
            description,
            light: state,
        });
    };

    graph.set_powered(first, true)?;
    graph.wire(first, and, "A")?;
    record(&graph, "switch 1 on, wired to And.A only");

    graph.wire(second, and, "B")?;
    record(&graph, "switch 2 off, wired to And.B");

    graph.set_powered(first, false)?;
    record(&graph, "switch 1 turned off");

    graph.toggle(first)?;
    graph.toggle(second)?;
    record(&graph, "both switches on");

    graph.delete_node(second)?;
    record(&graph, "switch 2 deleted");

    graph.check_consistency()?;
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_sequence() {
        let lights: Vec<PowerState> = run(&Config::default())
            .unwrap()
            .into_iter()
            .map(|step| step.light)
            .collect();
        assert_eq!(
            lights,
            [
                PowerState::Broken,
                PowerState::Off,
                PowerState::Off,
                PowerState::On,
                PowerState::Broken,
            ]
        );
    }
}
