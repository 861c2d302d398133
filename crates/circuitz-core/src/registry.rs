//! Kind registry: the name → constructor catalog behind node creation.
//!
//! Kinds are grouped into presentation categories for menus. The grouping
//! carries no meaning for evaluation.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::gate::GateKind;
use crate::node::Node;

/// Menu grouping of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Sources,
    Sinks,
    Transforms,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 3] = [
        NodeCategory::Sources,
        NodeCategory::Sinks,
        NodeCategory::Transforms,
    ];

    pub fn label(self) -> &'static str {
        match self {
            NodeCategory::Sources => "sources",
            NodeCategory::Sinks => "sinks",
            NodeCategory::Transforms => "transforms",
        }
    }
}

/// Inputs a constructor may need from the owning graph.
#[derive(Debug, Clone, Copy)]
pub struct FactoryContext {
    /// Current instant of the graph's timebase.
    pub now: Instant,
    /// Period given to new clocks.
    pub clock_period_ms: u64,
}

/// Builds a fresh node of one kind.
pub type NodeConstructor = fn(&FactoryContext) -> Node;

#[derive(Clone, Copy)]
struct KindEntry {
    category: NodeCategory,
    constructor: NodeConstructor,
}

/// Kind names grouped by category, each group sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub sources: Vec<String>,
    pub sinks: Vec<String>,
    pub transforms: Vec<String>,
}

impl Catalog {
    pub fn category(&self, category: NodeCategory) -> &[String] {
        match category {
            NodeCategory::Sources => &self.sources,
            NodeCategory::Sinks => &self.sinks,
            NodeCategory::Transforms => &self.transforms,
        }
    }
}

/// Registry of instantiable node kinds.
pub struct KindRegistry {
    kinds: BTreeMap<String, KindEntry>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in kind.
    pub fn builtin() -> Self {
        Self::empty()
            .with_kind("Switch", NodeCategory::Sources, |_| Node::switch())
            .with_kind("Clock", NodeCategory::Sources, |ctx| {
                Node::clock(ctx.clock_period_ms, ctx.now)
            })
            .with_kind("Light", NodeCategory::Sinks, |_| Node::light())
            .with_kind("And", NodeCategory::Transforms, |_| Node::gate(GateKind::And))
            .with_kind("Or", NodeCategory::Transforms, |_| Node::gate(GateKind::Or))
            .with_kind("Nand", NodeCategory::Transforms, |_| Node::gate(GateKind::Nand))
            .with_kind("Nor", NodeCategory::Transforms, |_| Node::gate(GateKind::Nor))
            .with_kind("Xor", NodeCategory::Transforms, |_| Node::gate(GateKind::Xor))
            .with_kind("Xnor", NodeCategory::Transforms, |_| Node::gate(GateKind::Xnor))
            .with_kind("Not", NodeCategory::Transforms, |_| Node::gate(GateKind::Not))
            .with_kind("Test", NodeCategory::Transforms, |_| Node::probe())
    }

    /// Register a kind, replacing any previous kind of the same name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        category: NodeCategory,
        constructor: NodeConstructor,
    ) {
        self.kinds.insert(
            name.into(),
            KindEntry {
                category,
                constructor,
            },
        );
    }

    /// Register a kind (builder pattern).
    pub fn with_kind(
        mut self,
        name: impl Into<String>,
        category: NodeCategory,
        constructor: NodeConstructor,
    ) -> Self {
        self.register(name, category, constructor);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Category of a registered kind.
    pub fn category_of(&self, name: &str) -> Option<NodeCategory> {
        self.kinds.get(name).map(|entry| entry.category)
    }

    /// Registered names in one category, sorted.
    pub fn names_in(&self, category: NodeCategory) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|(_, entry)| entry.category == category)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Snapshot of all names grouped by category.
    pub fn catalog(&self) -> Catalog {
        let collect = |category: NodeCategory| -> Vec<String> {
            self.names_in(category)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        Catalog {
            sources: collect(NodeCategory::Sources),
            sinks: collect(NodeCategory::Sinks),
            transforms: collect(NodeCategory::Transforms),
        }
    }

    /// Build a node of the named kind.
    pub fn construct(&self, name: &str, ctx: &FactoryContext) -> GraphResult<Node> {
        let entry = self
            .kinds
            .get(name)
            .ok_or_else(|| GraphError::UnknownNodeKind {
                name: name.to_string(),
            })?;

        Ok((entry.constructor)(ctx))
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kind_count", &self.kinds.len())
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    fn ctx() -> FactoryContext {
        FactoryContext {
            now: Instant::now(),
            clock_period_ms: 250,
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = KindRegistry::builtin().catalog();
        assert_eq!(catalog.sources, ["Clock", "Switch"]);
        assert_eq!(catalog.sinks, ["Light"]);
        assert_eq!(
            catalog.transforms,
            ["And", "Nand", "Nor", "Not", "Or", "Test", "Xnor", "Xor"]
        );
    }

    #[test]
    fn test_construct_by_name() {
        let registry = KindRegistry::builtin();
        let node = registry.construct("Xnor", &ctx()).unwrap();
        assert_eq!(node.title(), "Xnor");

        let clock = registry.construct("Clock", &ctx()).unwrap();
        match clock.kind() {
            NodeKind::Clock(c) => assert_eq!(c.period_ms(), 250),
            other => panic!("Expected clock, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind() {
        let registry = KindRegistry::builtin();
        let err = registry.construct("Flipflop", &ctx()).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownNodeKind {
                name: "Flipflop".into()
            }
        );
        // Lookup is case-sensitive.
        assert!(!registry.contains("and"));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = KindRegistry::empty();
        assert!(registry.is_empty());
        registry.register("Lamp", NodeCategory::Sinks, |_| Node::light());
        assert_eq!(registry.category_of("Lamp"), Some(NodeCategory::Sinks));
        assert_eq!(registry.names_in(NodeCategory::Sinks), ["Lamp"]);
        assert_eq!(registry.len(), 1);
    }
}
