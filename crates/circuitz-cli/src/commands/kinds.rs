//! Kinds command: print the node catalog.

use anyhow::Result;
use circuitz_core::{NodeCategory, NodeGraph};

use crate::config::Config;

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let graph = NodeGraph::with_config(config.graph_config());
    let catalog = graph.catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for category in NodeCategory::ALL {
        let label = format!("{}:", category.label());
        println!("{:<12}{}", label, catalog.category(category).join(", "));
    }
    Ok(())
}
