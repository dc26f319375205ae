use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub degree: usize,
}

/// Unordered pair of node ids, stored with `a < b`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: String,
    pub b: String,
}

impl Edge {
    /// Returns `None` for self-loops.
    pub fn new(from: &str, to: &str) -> Option<Self> {
        match from.cmp(to) {
            std::cmp::Ordering::Less => Some(Self {
                a: from.to_string(),
                b: to.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                a: to.to_string(),
                b: from.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Simple undirected graph keyed by node id.
#[derive(Debug, Clone)]
pub struct Graph {
    pub nodes: BTreeMap<String, Node>,
    pub edges: BTreeSet<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeSet::new(),
        }
    }

    pub fn ensure_node(&mut self, id: &str) {
        self.nodes.entry(id.to_string()).or_insert(Node {
            id: id.to_string(),
            degree: 0,
        });
    }

    /// Adds an undirected edge, registering unknown endpoints as nodes.
    /// Self-loops and duplicates are ignored; returns whether the edge was new.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let Some(edge) = Edge::new(from, to) else {
            return false;
        };
        if self.edges.contains(&edge) {
            return false;
        }
        for id in [&edge.a, &edge.b] {
            if !self.nodes.contains_key(id.as_str()) {
                tracing::warn!(node = %id, "relationship references unknown node, adding it");
            }
            self.ensure_node(id);
            if let Some(node) = self.nodes.get_mut(id.as_str()) {
                node.degree += 1;
            }
        }
        self.edges.insert(edge);
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, id: &str) -> usize {
        self.nodes.get(id).map(|node| node.degree).unwrap_or(0)
    }

    pub fn adjacency(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut adjacency: BTreeMap<&str, Vec<&str>> = self
            .nodes
            .keys()
            .map(|id| (id.as_str(), Vec::new()))
            .collect();
        for edge in &self.edges {
            adjacency
                .entry(edge.a.as_str())
                .or_default()
                .push(edge.b.as_str());
            adjacency
                .entry(edge.b.as_str())
                .or_default()
                .push(edge.a.as_str());
        }
        adjacency
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
