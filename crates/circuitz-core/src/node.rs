//! Nodes: the placeable circuit elements.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::gate::{Gate, GateKind};
use crate::slot::{lettered_slots, numbered_slots, SlotDescriptor};
use crate::source::{Clock, Switch};

/// Label of the single output slot of a gate.
pub const GATE_OUTPUT_LABEL: &str = "Out";

/// Label of the power slot on sources and lights.
pub const POWER_LABEL: &str = "Power";

/// Slot count on each side of the diagnostic probe.
pub const PROBE_SLOTS: usize = 5;

/// Stable handle of a node within one `NodeGraph`. Never reused.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canvas position of a node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Variant-specific state of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Gate(Gate),
    Switch(Switch),
    Clock(Clock),
    Light,
    /// Fixed five-in/five-out diagnostic node. Always broken.
    Probe,
}

impl NodeKind {
    /// Registry name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Gate(gate) => gate.kind.name(),
            NodeKind::Switch(_) => "Switch",
            NodeKind::Clock(_) => "Clock",
            NodeKind::Light => "Light",
            NodeKind::Probe => "Test",
        }
    }
}

/// Read-only view of the configuration a node exposes to its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSettings {
    /// Nothing to configure.
    Fixed,
    Switch {
        powered: bool,
    },
    Clock {
        period_ms: u64,
    },
    Gate {
        inputs: usize,
        min_inputs: usize,
        max_inputs: usize,
    },
}

/// A configuration change requested by a node's widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum NodeSetting {
    /// Switch flag.
    Powered(bool),
    /// Clock period in milliseconds (clamped to at least 1).
    ClockPeriod(u64),
    /// Restart a clock's wave at the current instant.
    ResetClock,
    /// Input-slot count of a resizable gate (clamped to the gate's range).
    InputCount(usize),
}

impl NodeSetting {
    pub fn name(&self) -> &'static str {
        match self {
            NodeSetting::Powered(_) => "powered",
            NodeSetting::ClockPeriod(_) => "clock_period",
            NodeSetting::ResetClock => "reset_clock",
            NodeSetting::InputCount(_) => "input_count",
        }
    }
}

/// A circuit element placed on the canvas.
///
/// Connections are only changed through `NodeGraph`, which keeps both
/// endpoints' lists in step.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    title: String,
    position: Point2D,
    selected: bool,
    input_slots: Vec<SlotDescriptor>,
    output_slots: Vec<SlotDescriptor>,
    connections: Vec<Connection>,
    kind: NodeKind,
}

impl Node {
    fn with_slots(
        kind: NodeKind,
        input_slots: Vec<SlotDescriptor>,
        output_slots: Vec<SlotDescriptor>,
    ) -> Self {
        Self {
            id: NodeId::default(),
            title: kind.name().to_string(),
            position: Point2D::ZERO,
            selected: false,
            input_slots,
            output_slots,
            connections: Vec::new(),
            kind,
        }
    }

    /// A gate with its default input count.
    pub fn gate(kind: GateKind) -> Self {
        Self::with_slots(
            NodeKind::Gate(Gate::new(kind)),
            lettered_slots(kind.default_inputs()),
            vec![SlotDescriptor::power(GATE_OUTPUT_LABEL)],
        )
    }

    /// An unpowered switch.
    pub fn switch() -> Self {
        Self::with_slots(
            NodeKind::Switch(Switch::default()),
            Vec::new(),
            vec![SlotDescriptor::power(POWER_LABEL)],
        )
    }

    /// A clock whose wave starts at `now`.
    pub fn clock(period_ms: u64, now: Instant) -> Self {
        Self::with_slots(
            NodeKind::Clock(Clock::new(period_ms, now)),
            Vec::new(),
            vec![SlotDescriptor::power(POWER_LABEL)],
        )
    }

    pub fn light() -> Self {
        Self::with_slots(
            NodeKind::Light,
            vec![SlotDescriptor::power(POWER_LABEL)],
            Vec::new(),
        )
    }

    pub fn probe() -> Self {
        Self::with_slots(
            NodeKind::Probe,
            numbered_slots(PROBE_SLOTS),
            numbered_slots(PROBE_SLOTS),
        )
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn set_position(&mut self, position: Point2D) {
        self.position = position;
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn input_slots(&self) -> &[SlotDescriptor] {
        &self.input_slots
    }

    pub fn output_slots(&self) -> &[SlotDescriptor] {
        &self.output_slots
    }

    /// Every connection touching this node, in the order they were made.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections through which signal flows into this node, in list order.
    pub fn input_connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        let id = self.id;
        self.connections.iter().filter(move |c| c.feeds(id))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Position of an input slot by label.
    pub fn input_index(&self, label: &str) -> Option<usize> {
        self.input_slots.iter().position(|s| s.label() == label)
    }

    pub fn has_output_slot(&self, label: &str) -> bool {
        self.output_slots.iter().any(|s| s.label() == label)
    }

    /// Configuration currently exposed by this node.
    pub fn settings(&self) -> NodeSettings {
        match &self.kind {
            NodeKind::Switch(switch) => NodeSettings::Switch {
                powered: switch.powered,
            },
            NodeKind::Clock(clock) => NodeSettings::Clock {
                period_ms: clock.period_ms(),
            },
            NodeKind::Gate(gate) if gate.kind.is_resizable() => NodeSettings::Gate {
                inputs: self.input_slots.len(),
                min_inputs: gate.kind.default_inputs(),
                max_inputs: gate.kind.max_inputs(),
            },
            _ => NodeSettings::Fixed,
        }
    }

    pub(crate) fn push_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Remove the first entry equal to `connection`. Returns whether one was found.
    pub(crate) fn remove_connection(&mut self, connection: &Connection) -> bool {
        match self.connections.iter().position(|c| c == connection) {
            Some(index) => {
                self.connections.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_connections(&mut self) -> Vec<Connection> {
        std::mem::take(&mut self.connections)
    }

    /// Resize the input list to `count` lettered slots. Callers must have
    /// removed connections bound to truncated slots first.
    pub(crate) fn set_input_count(&mut self, count: usize) {
        let current = self.input_slots.len();
        if count < current {
            self.input_slots.truncate(count);
        } else if count > current {
            self.input_slots
                .extend(lettered_slots(count).into_iter().skip(current));
        }
    }
}
