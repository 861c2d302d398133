//! Error types for the circuit graph.

use thiserror::Error;

use crate::connection::Connection;
use crate::node::NodeId;
use crate::slot::SlotDirection;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or evaluating a circuit graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node kind requested by name is not in the registry.
    #[error("unknown node kind: {name:?}")]
    UnknownNodeKind { name: String },

    /// A node referenced by handle is not live in the graph.
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: NodeId },

    /// A slot label does not exist on the given side of a node.
    #[error("no {direction} slot {slot:?} on node {node_id}")]
    SlotNotFound {
        node_id: NodeId,
        slot: String,
        direction: SlotDirection,
    },

    /// A configuration setting was applied to a node kind that does not expose it.
    #[error("node {node_id} does not support setting {setting}")]
    SettingNotSupported {
        node_id: NodeId,
        setting: &'static str,
    },

    /// A connection is recorded on one endpoint but not the other.
    #[error("dangling connection {connection} (missing on node {missing_on})")]
    DanglingConnectionReference {
        connection: Connection,
        missing_on: NodeId,
    },

    /// Evaluation re-entered a node that was already being evaluated.
    #[error("cyclic graph detected at node {node_id}")]
    CyclicGraphDetected { node_id: NodeId },
}
