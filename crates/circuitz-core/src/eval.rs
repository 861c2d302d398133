//! Signal evaluation.
//!
//! A node's state is pulled on demand: each query re-walks the wiring
//! upstream and re-evaluates every node it reaches. Nothing is cached.
//!
//! The walk runs on an explicit heap stack instead of the call stack, and
//! tracks the nodes on the current path so a feedback loop surfaces as
//! [`GraphError::CyclicGraphDetected`] instead of unbounded recursion.

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{trace, warn};

use crate::error::{GraphError, GraphResult};
use crate::gate::GateFold;
use crate::graph::NodeGraph;
use crate::node::{NodeId, NodeKind};
use crate::power::PowerState;

/// Result of evaluating one node during a full pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEvaluation {
    pub node_id: NodeId,
    pub state: GraphResult<PowerState>,
}

/// Work left on a node whose upstream is still being evaluated.
enum Pending {
    Gate { fold: GateFold, expected: usize },
    /// Lights pass their first input through unchanged.
    Relay,
}

struct Frame {
    node: NodeId,
    upstream: Vec<NodeId>,
    next: usize,
    pending: Pending,
}

impl Frame {
    fn next_upstream(&mut self) -> Option<NodeId> {
        let id = self.upstream.get(self.next).copied()?;
        self.next += 1;
        Some(id)
    }

    /// Feed one upstream state. Returns the node's state if it is now known.
    fn accept(&mut self, upstream: PowerState) -> Option<PowerState> {
        match &mut self.pending {
            Pending::Gate { fold, .. } => match fold.push(upstream) {
                ControlFlow::Break(state) => Some(state),
                ControlFlow::Continue(()) => None,
            },
            Pending::Relay => Some(upstream),
        }
    }

    /// State once every upstream node has been folded in.
    fn resolve(&self) -> PowerState {
        match &self.pending {
            Pending::Gate { fold, expected } => fold.finish(*expected),
            Pending::Relay => PowerState::Broken,
        }
    }
}

enum Entered {
    Leaf(PowerState),
    Frame(Frame),
}

impl NodeGraph {
    /// Current state of a node.
    ///
    /// Fails with `NodeNotFound` for a dead handle and `CyclicGraphDetected`
    /// when the walk re-enters a node already on its path.
    pub fn state(&self, id: NodeId) -> GraphResult<PowerState> {
        self.state_at(id, self.now())
    }

    /// State for rendering. Errors collapse to `Broken`.
    pub fn display_state(&self, id: NodeId) -> PowerState {
        match self.state(id) {
            Ok(state) => state,
            Err(err) => {
                warn!(node = id.0, error = %err, "evaluation_failed");
                PowerState::Broken
            }
        }
    }

    /// Evaluate every live node in creation order. All clocks in the pass see
    /// the same instant.
    pub fn evaluate_all(&self) -> Vec<NodeEvaluation> {
        let now = self.now();
        self.node_ids()
            .into_iter()
            .map(|node_id| NodeEvaluation {
                node_id,
                state: self.state_at(node_id, now),
            })
            .collect()
    }

    fn state_at(&self, id: NodeId, now: Instant) -> GraphResult<PowerState> {
        let mut on_path = HashSet::new();
        let mut stack = match self.enter(id, now, &mut on_path)? {
            Entered::Leaf(state) => return Ok(state),
            Entered::Frame(frame) => vec![frame],
        };

        let mut carry: Option<PowerState> = None;
        while let Some(frame) = stack.last_mut() {
            let done = match carry.take() {
                Some(upstream) => frame.accept(upstream),
                None => None,
            };

            let done = match done {
                Some(state) => Some(state),
                None => match frame.next_upstream() {
                    Some(upstream) => {
                        match self.enter(upstream, now, &mut on_path)? {
                            Entered::Leaf(state) => carry = Some(state),
                            Entered::Frame(next) => stack.push(next),
                        }
                        None
                    }
                    None => Some(frame.resolve()),
                },
            };

            if let Some(state) = done {
                if let Some(finished) = stack.pop() {
                    on_path.remove(&finished.node);
                }
                carry = Some(state);
            }
        }

        let state = carry.unwrap_or(PowerState::Broken);
        trace!(node = id.0, state = %state, "node_evaluated");
        Ok(state)
    }

    /// Resolve a leaf immediately or open a frame for a node with inputs.
    fn enter(
        &self,
        id: NodeId,
        now: Instant,
        on_path: &mut HashSet<NodeId>,
    ) -> GraphResult<Entered> {
        if on_path.contains(&id) {
            return Err(GraphError::CyclicGraphDetected { node_id: id });
        }

        let node = self.node(id)?;
        let (upstream, pending) = match node.kind() {
            NodeKind::Switch(switch) => return Ok(Entered::Leaf(switch.state())),
            NodeKind::Clock(clock) => return Ok(Entered::Leaf(clock.state_at(now))),
            NodeKind::Probe => return Ok(Entered::Leaf(PowerState::Broken)),
            NodeKind::Gate(gate) => (
                node.input_connections().map(|c| c.output_node).collect(),
                Pending::Gate {
                    fold: GateFold::new(gate.kind),
                    expected: node.input_slots().len(),
                },
            ),
            NodeKind::Light => (
                node.input_connections()
                    .map(|c| c.output_node)
                    .take(1)
                    .collect(),
                Pending::Relay,
            ),
        };

        on_path.insert(id);
        Ok(Entered::Frame(Frame {
            node: id,
            upstream,
            next: 0,
            pending,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::node::{GATE_OUTPUT_LABEL, POWER_LABEL};

    fn graph() -> NodeGraph {
        NodeGraph::with_config(GraphConfig::strict())
    }

    /// Two switches into a gate of `kind`, gate into a light.
    fn two_input(kind: &str) -> (NodeGraph, NodeId, NodeId, NodeId, NodeId) {
        let mut graph = graph();
        let a = graph.create_node("Switch").unwrap();
        let b = graph.create_node("Switch").unwrap();
        let gate = graph.create_node(kind).unwrap();
        let light = graph.create_node("Light").unwrap();
        graph.wire(a, gate, "A").unwrap();
        graph.wire(b, gate, "B").unwrap();
        graph.wire(gate, light, POWER_LABEL).unwrap();
        (graph, a, b, gate, light)
    }

    fn table(kind: &str) -> Vec<PowerState> {
        let (mut graph, a, b, _, light) = two_input(kind);
        let mut out = Vec::new();
        for (x, y) in [(false, false), (false, true), (true, false), (true, true)] {
            graph.set_powered(a, x).unwrap();
            graph.set_powered(b, y).unwrap();
            out.push(graph.state(light).unwrap());
        }
        out
    }

    #[test]
    fn test_two_input_truth_tables() {
        use PowerState::{Off, On};
        assert_eq!(table("And"), [Off, Off, Off, On]);
        assert_eq!(table("Or"), [Off, On, On, On]);
        assert_eq!(table("Nand"), [On, On, On, Off]);
        assert_eq!(table("Nor"), [On, Off, Off, Off]);
        assert_eq!(table("Xor"), [Off, On, On, Off]);
        assert_eq!(table("Xnor"), [On, Off, Off, On]);
    }

    #[test]
    fn test_not() {
        let mut graph = graph();
        let s = graph.create_node("Switch").unwrap();
        let not = graph.create_node("Not").unwrap();
        graph.wire(s, not, "A").unwrap();

        assert_eq!(graph.state(not).unwrap(), PowerState::On);
        graph.toggle(s).unwrap();
        assert_eq!(graph.state(not).unwrap(), PowerState::Off);
    }

    #[test]
    fn test_unwired_input_is_broken() {
        let mut graph = graph();
        let s = graph.create_node("Switch").unwrap();
        let and = graph.create_node("And").unwrap();
        graph.wire(s, and, "A").unwrap();
        assert_eq!(graph.state(and).unwrap(), PowerState::Broken);
    }

    #[test]
    fn test_broken_propagates() {
        let (mut graph, _, b, gate, light) = two_input("Or");
        let probe = graph.create_node("Test").unwrap();
        let conn = graph
            .node(gate)
            .unwrap()
            .input_connections()
            .find(|c| c.output_node == b)
            .cloned()
            .unwrap();
        graph.remove_connection(&conn);
        graph.add_connection(gate, "B", probe, "1").unwrap();

        assert_eq!(graph.state(gate).unwrap(), PowerState::Broken);
        assert_eq!(graph.state(light).unwrap(), PowerState::Broken);
    }

    #[test]
    fn test_light_follows_first_input_only() {
        let mut graph = graph();
        let on = graph.create_node("Switch").unwrap();
        let off = graph.create_node("Switch").unwrap();
        let light = graph.create_node("Light").unwrap();
        graph.set_powered(on, true).unwrap();

        assert_eq!(graph.state(light).unwrap(), PowerState::Broken);
        graph.wire(on, light, POWER_LABEL).unwrap();
        graph.wire(off, light, POWER_LABEL).unwrap();
        assert_eq!(graph.state(light).unwrap(), PowerState::On);
    }

    #[test]
    fn test_duplicate_connection_counts_twice() {
        // Two wires into slot A of a two-input gate cover it as if both slots
        // were wired.
        let mut graph = graph();
        let s = graph.create_node("Switch").unwrap();
        let and = graph.create_node("And").unwrap();
        graph.set_powered(s, true).unwrap();
        graph.wire(s, and, "A").unwrap();
        graph.wire(s, and, "A").unwrap();
        assert_eq!(graph.state(and).unwrap(), PowerState::On);
    }

    #[test]
    fn test_two_node_loop_detected() {
        let mut graph = graph();
        let a = graph.create_node("Not").unwrap();
        let b = graph.create_node("Not").unwrap();
        graph.wire(a, b, "A").unwrap();
        graph.wire(b, a, "A").unwrap();

        assert_eq!(
            graph.state(a),
            Err(GraphError::CyclicGraphDetected { node_id: a })
        );
        assert_eq!(graph.display_state(b), PowerState::Broken);
    }

    #[test]
    fn test_self_loop_detected() {
        let mut graph = graph();
        let or = graph.create_node("Or").unwrap();
        graph.add_connection(or, "A", or, GATE_OUTPUT_LABEL).unwrap();
        assert_eq!(
            graph.state(or),
            Err(GraphError::CyclicGraphDetected { node_id: or })
        );
    }

    #[test]
    fn test_broken_short_circuit_hides_cycle() {
        // A broken first input stops the fold before the loop is reached.
        let mut graph = graph();
        let probe = graph.create_node("Test").unwrap();
        let or = graph.create_node("Or").unwrap();
        graph.add_connection(or, "A", probe, "1").unwrap();
        graph.add_connection(or, "B", or, GATE_OUTPUT_LABEL).unwrap();
        assert_eq!(graph.state(or).unwrap(), PowerState::Broken);
    }

    #[test]
    fn test_missing_node() {
        let graph = graph();
        assert_eq!(
            graph.state(NodeId(9)),
            Err(GraphError::NodeNotFound { node_id: NodeId(9) })
        );
        assert_eq!(graph.display_state(NodeId(9)), PowerState::Broken);
    }

    #[test]
    fn test_evaluate_all_in_creation_order() {
        let (graph, a, b, gate, light) = two_input("Nor");
        let results = graph.evaluate_all();
        let ids: Vec<NodeId> = results.iter().map(|r| r.node_id).collect();
        assert_eq!(ids, vec![a, b, gate, light]);
        assert_eq!(results[3].state, Ok(PowerState::On));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut graph = NodeGraph::with_config(GraphConfig::relaxed());
        let source = graph.create_node("Switch").unwrap();
        let mut tail = source;
        for _ in 0..10_000 {
            let not = graph.create_node("Not").unwrap();
            graph.wire(tail, not, "A").unwrap();
            tail = not;
        }
        // An even number of inversions.
        assert_eq!(graph.state(tail).unwrap(), PowerState::Off);
    }
}
