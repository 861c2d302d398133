//! Table command: exhaustive truth table of one gate.

use anyhow::{Context, Result};
use circuitz_core::{GateKind, NodeGraph, NodeId, PowerState, POWER_LABEL};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;

/// Widest table the command will enumerate.
pub const MAX_TABLE_INPUTS: usize = 16;

#[derive(Debug, Serialize)]
struct TruthTable {
    gate: String,
    inputs: Vec<String>,
    rows: Vec<TableRow>,
}

#[derive(Debug, Serialize)]
struct TableRow {
    inputs: Vec<PowerState>,
    output: PowerState,
}

pub fn execute(config: &Config, gate: &str, inputs: Option<usize>, json: bool) -> Result<()> {
    let kind: GateKind = gate.parse().map_err(anyhow::Error::msg)?;
    let table = build(config, kind, inputs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{} | Out", table.inputs.join(" "));
    println!("{:-<width$}", "", width = table.inputs.len() * 2 + 4);
    for row in &table.rows {
        let bits: Vec<&str> = row.inputs.iter().map(|s| s.symbol()).collect();
        println!("{} | {}", bits.join(" "), row.output.symbol());
    }
    Ok(())
}

fn build(config: &Config, kind: GateKind, inputs: Option<usize>) -> Result<TruthTable> {
    let mut graph = NodeGraph::with_config(config.graph_config());
    let gate = graph.create_node(kind.name())?;
    if let Some(requested) = inputs {
        let applied = graph.resize_input_slots(gate, requested)?;
        if applied != requested {
            debug!(requested, applied, "table_inputs_clamped");
        }
    }

    let labels: Vec<String> = graph
        .node(gate)?
        .input_slots()
        .iter()
        .map(|slot| slot.label().to_string())
        .collect();
    if labels.len() > MAX_TABLE_INPUTS {
        anyhow::bail!(
            "{} inputs would need {} rows; use at most {MAX_TABLE_INPUTS} inputs",
            labels.len(),
            1u64 << labels.len()
        );
    }

    let switches = labels
        .iter()
        .map(|label| -> Result<NodeId> {
            let switch = graph.create_node("Switch")?;
            graph.wire(switch, gate, label)?;
            Ok(switch)
        })
        .collect::<Result<Vec<NodeId>>>()?;

    let light = graph.create_node("Light")?;
    graph.wire(gate, light, POWER_LABEL)?;

    let width = switches.len();
    let mut rows = Vec::with_capacity(1 << width);
    for combination in 0u32..(1 << width) {
        let mut row_inputs = Vec::with_capacity(width);
        for (position, &switch) in switches.iter().enumerate() {
            // First slot is the most significant bit.
            let powered = combination >> (width - 1 - position) & 1 == 1;
            graph.set_powered(switch, powered)?;
            row_inputs.push(PowerState::from_bool(powered));
        }
        let output = graph
            .state(light)
            .with_context(|| format!("Failed to evaluate {} output", kind.name()))?;
        rows.push(TableRow {
            inputs: row_inputs,
            output,
        });
    }

    Ok(TruthTable {
        gate: kind.name().to_string(),
        inputs: labels,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs(kind: GateKind, inputs: Option<usize>) -> Vec<PowerState> {
        build(&Config::default(), kind, inputs)
            .unwrap()
            .rows
            .into_iter()
            .map(|row| row.output)
            .collect()
    }

    #[test]
    fn test_nand_table() {
        use PowerState::{Off, On};
        assert_eq!(outputs(GateKind::Nand, None), [On, On, On, Off]);
    }

    #[test]
    fn test_three_input_xor() {
        let table = outputs(GateKind::Xor, Some(3));
        assert_eq!(table.len(), 8);
        // 0b111 has odd parity.
        assert_eq!(table[7], PowerState::On);
        assert_eq!(table[3], PowerState::Off);
    }

    #[test]
    fn test_not_is_clamped_to_one_input() {
        let table = build(&Config::default(), GateKind::Not, Some(4)).unwrap();
        assert_eq!(table.inputs, ["A"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_too_wide_rejected() {
        assert!(build(&Config::default(), GateKind::Or, Some(20)).is_err());
    }
}
