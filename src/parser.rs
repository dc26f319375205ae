use crate::config::InputConfig;
use crate::ir::Graph;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    people: People,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

/// `people` is keyed by id in exports and a plain list in API responses.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum People {
    Keyed(BTreeMap<String, Person>),
    Listed(Vec<Person>),
}

impl Default for People {
    fn default() -> Self {
        People::Listed(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct Person {
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    source: Value,
    target: Value,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Builds the undirected sponsorship graph from a data file.
///
/// Only relationships whose type is listed in `config.relationship_types`
/// become edges. Self-loops and repeated pairs are dropped.
pub fn parse_graph_data(input: &str, config: &InputConfig) -> Result<Graph> {
    let data: DataFile = serde_json::from_str(input).context("invalid data file")?;
    let mut graph = Graph::new();

    match &data.people {
        People::Keyed(people) => {
            for (key, person) in people {
                let id = match person.id.as_ref().and_then(id_string) {
                    Some(id) => id,
                    None => key.clone(),
                };
                graph.ensure_node(&id);
            }
        }
        People::Listed(people) => {
            for (idx, person) in people.iter().enumerate() {
                let id = person
                    .id
                    .as_ref()
                    .and_then(id_string)
                    .with_context(|| format!("person #{idx} has no usable id"))?;
                graph.ensure_node(&id);
            }
        }
    }

    let mut skipped = 0usize;
    for rel in &data.relationships {
        let accepted = rel
            .kind
            .as_deref()
            .is_some_and(|kind| config.relationship_types.iter().any(|t| t == kind));
        if !accepted {
            skipped += 1;
            continue;
        }
        let (Some(source), Some(target)) = (id_string(&rel.source), id_string(&rel.target)) else {
            tracing::warn!(source = %rel.source, target = %rel.target, "relationship without usable endpoints");
            skipped += 1;
            continue;
        };
        graph.add_edge(&source, &target);
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped,
        "parsed data file"
    );
    Ok(graph)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
