//! Connections between an output slot and an input slot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// A wire from `output_node.output_slot` into `input_node.input_slot`.
///
/// The same value is recorded in the connection lists of both endpoints.
/// Two connections are equal when all four fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Node receiving the signal.
    pub input_node: NodeId,
    /// Label of the receiving slot on `input_node`.
    pub input_slot: String,
    /// Node producing the signal.
    pub output_node: NodeId,
    /// Label of the producing slot on `output_node`.
    pub output_slot: String,
}

impl Connection {
    pub fn new(
        input_node: NodeId,
        input_slot: impl Into<String>,
        output_node: NodeId,
        output_slot: impl Into<String>,
    ) -> Self {
        Self {
            input_node,
            input_slot: input_slot.into(),
            output_node,
            output_slot: output_slot.into(),
        }
    }

    /// Whether either endpoint is `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.input_node == node || self.output_node == node
    }

    /// Whether signal flows into `node` through this connection.
    pub fn feeds(&self, node: NodeId) -> bool {
        self.input_node == node
    }

    /// The endpoint that is not `node`. For a self-loop this is `node` itself.
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.output_node == node {
            self.input_node
        } else {
            self.output_node
        }
    }

    /// Whether both ends are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.input_node == self.output_node
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.output_node, self.output_slot, self.input_node, self.input_slot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_all_fields() {
        let a = Connection::new(NodeId(1), "A", NodeId(0), "Power");
        assert_eq!(a, Connection::new(NodeId(1), "A", NodeId(0), "Power"));
        assert_ne!(a, Connection::new(NodeId(1), "B", NodeId(0), "Power"));
        assert_ne!(a, Connection::new(NodeId(2), "A", NodeId(0), "Power"));
    }

    #[test]
    fn test_endpoints() {
        let c = Connection::new(NodeId(1), "A", NodeId(0), "Out");
        assert!(c.feeds(NodeId(1)));
        assert!(!c.feeds(NodeId(0)));
        assert_eq!(c.other_end(NodeId(0)), NodeId(1));
        assert_eq!(c.other_end(NodeId(1)), NodeId(0));
        assert!(!c.touches(NodeId(7)));
        assert_eq!(c.to_string(), "#0.Out -> #1.A");
    }
}
