//! Logic-circuit graph with pull-based signal evaluation.
//!
//! A circuit is a set of nodes (sources, gates, sinks) wired output-to-input
//! through named slots. Node state is never stored: asking for a node's state
//! walks its inputs upstream and recomputes everything it reaches.
//!
//! ## Core Concepts
//!
//! - **Node**: a placeable element with lettered input slots and named output
//!   slots. Sources (Switch, Clock) have no inputs, the Light sink has no
//!   outputs, gates have one output labeled `Out`.
//! - **Connection**: an `(input node, input slot, output node, output slot)`
//!   tuple, recorded on both endpoints.
//! - **PowerState**: `off`, `on` or `broken`. Missing wiring, diagnostic
//!   probes and broken upstream all yield `broken`.
//! - **KindRegistry**: the name-to-constructor catalog used by
//!   [`NodeGraph::create_node`].
//!
//! ## Evaluation
//!
//! ```text
//! gate:   fold upstream states in connection order
//!         broken input      -> broken (remaining inputs skipped)
//!         wired != slots    -> broken
//!         otherwise         -> transform(accumulator)
//! light:  state of first input, broken if none
//! switch: its flag
//! clock:  on while floor(elapsed / period) is even
//! ```
//!
//! ## Example
//!
//! ```
//! use circuitz_core::{NodeGraph, PowerState};
//!
//! let mut graph = NodeGraph::new();
//! let a = graph.create_node("Switch").unwrap();
//! let b = graph.create_node("Switch").unwrap();
//! let and = graph.create_node("And").unwrap();
//! graph.wire(a, and, "A").unwrap();
//! graph.wire(b, and, "B").unwrap();
//!
//! graph.set_powered(a, true).unwrap();
//! graph.set_powered(b, true).unwrap();
//! assert_eq!(graph.state(and).unwrap(), PowerState::On);
//! ```

mod analysis;
pub mod config;
mod connection;
mod error;
mod eval;
mod gate;
mod graph;
mod node;
mod power;
mod registry;
mod slot;
mod source;

pub use config::GraphConfig;
pub use connection::Connection;
pub use error::{GraphError, GraphResult};
pub use eval::NodeEvaluation;
pub use gate::{Gate, GateFold, GateKind};
pub use graph::NodeGraph;
pub use node::{
    Node, NodeId, NodeKind, NodeSetting, NodeSettings, Point2D, GATE_OUTPUT_LABEL, POWER_LABEL,
    PROBE_SLOTS,
};
pub use power::PowerState;
pub use registry::{Catalog, FactoryContext, KindRegistry, NodeCategory, NodeConstructor};
pub use slot::{
    lettered_slots, numbered_slots, SlotDescriptor, SlotDirection, SlotKind, INPUT_LABELS,
    MAX_INPUT_SLOTS,
};
pub use source::{
    Clock, ManualTimebase, Switch, SystemTimebase, Timebase, DEFAULT_CLOCK_PERIOD_MS,
    MIN_CLOCK_PERIOD_MS,
};
