//! Structural analysis of the wiring via petgraph.

use std::collections::HashMap;

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::connection::Connection;
use crate::graph::NodeGraph;
use crate::node::NodeId;

impl NodeGraph {
    /// Project the wiring onto a petgraph StableDiGraph. Edges run in signal
    /// direction, from output node to input node.
    pub fn to_petgraph(&self) -> (StableDiGraph<NodeId, Connection>, HashMap<NodeId, NodeIndex>) {
        let mut graph = StableDiGraph::new();
        let mut id_to_index = HashMap::new();

        for id in self.node_ids() {
            let idx = graph.add_node(id);
            id_to_index.insert(id, idx);
        }

        for connection in self.connections() {
            if let (Some(&from_idx), Some(&to_idx)) = (
                id_to_index.get(&connection.output_node),
                id_to_index.get(&connection.input_node),
            ) {
                graph.add_edge(from_idx, to_idx, connection.clone());
            }
        }

        (graph, id_to_index)
    }

    /// Groups of nodes that feed back into themselves, each sorted, in
    /// ascending order of their first node.
    pub fn feedback_loops(&self) -> Vec<Vec<NodeId>> {
        let (graph, _) = self.to_petgraph();

        let mut loops: Vec<Vec<NodeId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => graph.find_edge(*single, *single).is_some(),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<NodeId> = component.iter().map(|&idx| graph[idx]).collect();
                ids.sort();
                ids
            })
            .collect();

        loops.sort();
        loops
    }

    /// True when no signal path leads back to where it started.
    pub fn is_acyclic(&self) -> bool {
        let (graph, _) = self.to_petgraph();
        !is_cyclic_directed(&graph)
    }
}
