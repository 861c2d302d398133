//! Slot descriptors: the named connection points on a node.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Labels handed out to resizable input lists, one letter per slot.
pub const INPUT_LABELS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

/// Upper bound on the input count of a resizable gate.
pub const MAX_INPUT_SLOTS: usize = INPUT_LABELS.len();

/// Type tag of a slot. Only power exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlotKind {
    #[default]
    Power,
}

/// Which side of a node a slot sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotDirection {
    Input,
    Output,
}

impl fmt::Display for SlotDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotDirection::Input => write!(f, "input"),
            SlotDirection::Output => write!(f, "output"),
        }
    }
}

/// A named, typed connection point.
///
/// Labels are only unique within one node's input list (or output list).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotDescriptor {
    label: String,
    kind: SlotKind,
}

impl SlotDescriptor {
    pub fn new(label: impl Into<String>, kind: SlotKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// A power slot with the given label.
    pub fn power(label: impl Into<String>) -> Self {
        Self::new(label, SlotKind::Power)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }
}

/// The first `count` alphabet-labeled power slots (capped at [`MAX_INPUT_SLOTS`]).
pub fn lettered_slots(count: usize) -> Vec<SlotDescriptor> {
    INPUT_LABELS
        .iter()
        .take(count)
        .map(|label| SlotDescriptor::power(*label))
        .collect()
}

/// Power slots labeled `1`..=`count`.
pub fn numbered_slots(count: usize) -> Vec<SlotDescriptor> {
    (1..=count)
        .map(|n| SlotDescriptor::power(n.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lettered_slots() {
        let slots = lettered_slots(3);
        let labels: Vec<_> = slots.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["A", "B", "C"]);
        assert!(slots.iter().all(|s| s.kind() == SlotKind::Power));
    }

    #[test]
    fn test_lettered_slots_capped() {
        let slots = lettered_slots(40);
        assert_eq!(slots.len(), MAX_INPUT_SLOTS);
        assert_eq!(slots.last().unwrap().label(), "Z");
    }

    #[test]
    fn test_numbered_slots() {
        let labels: Vec<_> = numbered_slots(5).into_iter().map(|s| s.label).collect();
        assert_eq!(labels, ["1", "2", "3", "4", "5"]);
    }
}
