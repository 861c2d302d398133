//! The node graph: owner of all live nodes and the only place connections
//! are created or destroyed.
//!
//! Every connection is stored twice, once in each endpoint's list. All
//! mutations below keep the two copies in step:
//!
//! ```text
//! add_connection     -> push onto input node, push onto output node
//! remove_connection  -> drop one copy from each endpoint
//! delete_node        -> drop the peer copy of every connection, then the node
//! resize_input_slots -> remove connections on truncated slots, then truncate
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::config::GraphConfig;
use crate::connection::Connection;
use crate::error::{GraphError, GraphResult};
use crate::node::{Node, NodeId, NodeKind, NodeSetting, NodeSettings, Point2D};
use crate::registry::{Catalog, FactoryContext, KindRegistry};
use crate::slot::SlotDirection;
use crate::source::{SystemTimebase, Timebase};

/// A circuit: live nodes, the kind registry used to create them, and the
/// timebase clocks are evaluated against.
pub struct NodeGraph {
    nodes: BTreeMap<NodeId, Node>,
    next_node_id: u64,
    registry: KindRegistry,
    timebase: Arc<dyn Timebase>,
    config: GraphConfig,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph {
    /// Create an empty graph with the built-in kinds and the system clock.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_node_id: 0,
            registry: KindRegistry::builtin(),
            timebase: Arc::new(SystemTimebase),
            config,
        }
    }

    /// Replace the timebase (builder pattern).
    pub fn with_timebase(mut self, timebase: Arc<dyn Timebase>) -> Self {
        self.timebase = timebase;
        self
    }

    /// Replace the kind registry (builder pattern).
    pub fn with_registry(mut self, registry: KindRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Instantiable kind names grouped for menus.
    pub fn catalog(&self) -> Catalog {
        self.registry.catalog()
    }

    /// Current instant of the graph's timebase.
    pub fn now(&self) -> Instant {
        self.timebase.now()
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Create a node of a registered kind and append it to the graph.
    pub fn create_node(&mut self, kind_name: &str) -> GraphResult<NodeId> {
        let ctx = FactoryContext {
            now: self.now(),
            clock_period_ms: self.config.default_clock_period_ms,
        };
        let mut node = self.registry.construct(kind_name, &ctx)?;
        node.set_title(kind_name);
        Ok(self.insert_node(node))
    }

    /// Append a node built outside the registry. Any connections recorded on
    /// it are discarded.
    pub fn insert_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        node.take_connections();
        node.set_id(id);
        debug!(node = id.0, kind = node.kind().name(), "node_created");
        self.nodes.insert(id, node);
        id
    }

    /// Get a live node.
    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.nodes
            .get(&id)
            .ok_or(GraphError::NodeNotFound { node_id: id })
    }

    fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(GraphError::NodeNotFound { node_id: id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Live node handles in creation order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn set_position(&mut self, id: NodeId, position: Point2D) -> GraphResult<()> {
        self.node_mut(id)?.set_position(position);
        Ok(())
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> GraphResult<()> {
        self.node_mut(id)?.set_selected(selected);
        Ok(())
    }

    /// Remove a node after severing every connection that touches it.
    /// Returns the removed node with an empty connection list.
    pub fn delete_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let mut node = self
            .nodes
            .remove(&id)
            .ok_or(GraphError::NodeNotFound { node_id: id })?;

        let severed = node.take_connections();
        for connection in &severed {
            let peer = connection.other_end(id);
            if peer == id {
                continue;
            }
            if let Some(peer_node) = self.nodes.get_mut(&peer) {
                peer_node.remove_connection(connection);
            }
        }

        debug!(node = id.0, severed = severed.len(), "node_deleted");
        self.verify();
        Ok(node)
    }

    /// Delete every selected node. Returns the deleted handles.
    pub fn delete_selected(&mut self) -> Vec<NodeId> {
        let selected: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.selected())
            .map(Node::id)
            .collect();

        selected
            .into_iter()
            .filter(|&id| self.delete_node(id).is_ok())
            .collect()
    }

    // ------------------------------------------------------------------
    // Connections
    // ------------------------------------------------------------------

    /// Wire `output_node.output_slot` into `input_node.input_slot`.
    ///
    /// Only the existence of both nodes and both slots is checked. Duplicate
    /// connections, cycles and self-loops are accepted.
    pub fn add_connection(
        &mut self,
        input_node: NodeId,
        input_slot: &str,
        output_node: NodeId,
        output_slot: &str,
    ) -> GraphResult<Connection> {
        if self.node(input_node)?.input_index(input_slot).is_none() {
            return Err(GraphError::SlotNotFound {
                node_id: input_node,
                slot: input_slot.to_string(),
                direction: SlotDirection::Input,
            });
        }
        if !self.node(output_node)?.has_output_slot(output_slot) {
            return Err(GraphError::SlotNotFound {
                node_id: output_node,
                slot: output_slot.to_string(),
                direction: SlotDirection::Output,
            });
        }

        let connection = Connection::new(input_node, input_slot, output_node, output_slot);
        self.node_mut(input_node)?.push_connection(connection.clone());
        self.node_mut(output_node)?.push_connection(connection.clone());

        debug!(connection = %connection, "connection_added");
        self.verify();
        Ok(connection)
    }

    /// Wire the first output slot of `from` into `to.input_slot`.
    pub fn wire(&mut self, from: NodeId, to: NodeId, input_slot: &str) -> GraphResult<Connection> {
        let output_slot = self
            .node(from)?
            .output_slots()
            .first()
            .map(|slot| slot.label().to_string())
            .ok_or_else(|| GraphError::SlotNotFound {
                node_id: from,
                slot: String::new(),
                direction: SlotDirection::Output,
            })?;

        self.add_connection(to, input_slot, from, &output_slot)
    }

    /// Remove one copy of `connection` from each endpoint. Missing copies and
    /// deleted endpoints are skipped. Returns whether anything was removed.
    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        let mut removed = false;
        for endpoint in [connection.input_node, connection.output_node] {
            if let Some(node) = self.nodes.get_mut(&endpoint) {
                removed |= node.remove_connection(connection);
            }
        }

        if removed {
            debug!(connection = %connection, "connection_removed");
            self.verify();
        }
        removed
    }

    /// Every live connection once, enumerated from its output node.
    pub fn connections(&self) -> Vec<&Connection> {
        let mut wires = Vec::new();
        for node in self.nodes.values() {
            // A self-loop sits twice in its node's list, once per role.
            let mut self_loops_seen: HashMap<&Connection, usize> = HashMap::new();
            for connection in node.connections() {
                if connection.output_node != node.id() {
                    continue;
                }
                if connection.is_self_loop() {
                    let seen = self_loops_seen.entry(connection).or_default();
                    *seen += 1;
                    if *seen % 2 == 0 {
                        continue;
                    }
                }
                wires.push(connection);
            }
        }
        wires
    }

    pub fn connection_count(&self) -> usize {
        self.connections().len()
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Change the input-slot count of a gate, clamped to the gate's range.
    /// Connections bound to removed slots are severed first. Returns the
    /// applied count.
    pub fn resize_input_slots(&mut self, id: NodeId, new_count: usize) -> GraphResult<usize> {
        let node = self.node(id)?;
        let NodeKind::Gate(gate) = node.kind() else {
            return Err(GraphError::SettingNotSupported {
                node_id: id,
                setting: NodeSetting::InputCount(new_count).name(),
            });
        };

        let count = gate.kind.clamp_inputs(new_count);
        let previous = node.input_slots().len();

        if count < previous {
            let doomed: Vec<Connection> = node
                .input_connections()
                .filter(|c| node.input_index(&c.input_slot).is_some_and(|i| i >= count))
                .cloned()
                .collect();
            for connection in &doomed {
                self.remove_connection(connection);
            }
        }

        self.node_mut(id)?.set_input_count(count);
        debug!(node = id.0, from = previous, to = count, "inputs_resized");
        self.verify();
        Ok(count)
    }

    /// Configuration currently exposed by a node.
    pub fn settings(&self, id: NodeId) -> GraphResult<NodeSettings> {
        Ok(self.node(id)?.settings())
    }

    /// Apply a widget-level setting to a node. Returns the resulting settings.
    pub fn configure(&mut self, id: NodeId, setting: NodeSetting) -> GraphResult<NodeSettings> {
        let now = self.now();

        let applied = match setting {
            NodeSetting::InputCount(count) => {
                let resizable = matches!(
                    self.node(id)?.kind(),
                    NodeKind::Gate(gate) if gate.kind.is_resizable()
                );
                if resizable {
                    self.resize_input_slots(id, count)?;
                }
                resizable
            }
            _ => match (setting, self.node_mut(id)?.kind_mut()) {
                (NodeSetting::Powered(powered), NodeKind::Switch(switch)) => {
                    switch.powered = powered;
                    true
                }
                (NodeSetting::ClockPeriod(period_ms), NodeKind::Clock(clock)) => {
                    clock.set_period_ms(period_ms);
                    true
                }
                (NodeSetting::ResetClock, NodeKind::Clock(clock)) => {
                    clock.reset(now);
                    true
                }
                _ => false,
            },
        };

        if !applied {
            return Err(GraphError::SettingNotSupported {
                node_id: id,
                setting: setting.name(),
            });
        }

        debug!(node = id.0, setting = setting.name(), "node_configured");
        self.settings(id)
    }

    /// Set a switch's flag.
    pub fn set_powered(&mut self, id: NodeId, powered: bool) -> GraphResult<()> {
        self.configure(id, NodeSetting::Powered(powered))?;
        Ok(())
    }

    /// Flip a switch. Returns the new flag.
    pub fn toggle(&mut self, id: NodeId) -> GraphResult<bool> {
        let powered = match self.settings(id)? {
            NodeSettings::Switch { powered } => !powered,
            _ => {
                return Err(GraphError::SettingNotSupported {
                    node_id: id,
                    setting: NodeSetting::Powered(true).name(),
                })
            }
        };
        self.set_powered(id, powered)?;
        Ok(powered)
    }

    /// Change a clock's period. Returns the applied (clamped) period.
    pub fn set_clock_period(&mut self, id: NodeId, period_ms: u64) -> GraphResult<u64> {
        match self.configure(id, NodeSetting::ClockPeriod(period_ms))? {
            NodeSettings::Clock { period_ms } => Ok(period_ms),
            _ => Err(GraphError::SettingNotSupported {
                node_id: id,
                setting: NodeSetting::ClockPeriod(period_ms).name(),
            }),
        }
    }

    /// Restart a clock's wave at the current instant.
    pub fn reset_clock(&mut self, id: NodeId) -> GraphResult<()> {
        self.configure(id, NodeSetting::ResetClock)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Check that every connection is recorded on both of its endpoints, as
    /// often on one as on the other.
    pub fn check_consistency(&self) -> GraphResult<()> {
        for node in self.nodes.values() {
            let id = node.id();
            for connection in node.connections() {
                let here = count_of(node, connection);
                let roles_here = usize::from(connection.input_node == id)
                    + usize::from(connection.output_node == id);

                if roles_here == 0 || here % roles_here != 0 {
                    return Err(GraphError::DanglingConnectionReference {
                        connection: connection.clone(),
                        missing_on: connection.other_end(id),
                    });
                }
                if connection.is_self_loop() {
                    continue;
                }

                let peer = connection.other_end(id);
                let expected = here / roles_here;
                let there = self
                    .nodes
                    .get(&peer)
                    .map_or(0, |peer_node| count_of(peer_node, connection));

                if there != expected {
                    let missing_on = if there < expected { peer } else { id };
                    return Err(GraphError::DanglingConnectionReference {
                        connection: connection.clone(),
                        missing_on,
                    });
                }
            }
        }
        Ok(())
    }

    fn verify(&self) {
        if !self.config.verify_consistency {
            return;
        }
        if let Err(err) = self.check_consistency() {
            error!(error = %err, "graph_inconsistent");
            panic!("connection invariant violated: {err}");
        }
    }
}

fn count_of(node: &Node, connection: &Connection) -> usize {
    node.connections().iter().filter(|c| *c == connection).count()
}

impl fmt::Debug for NodeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeGraph")
            .field("node_count", &self.nodes.len())
            .field("connection_count", &self.connection_count())
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
