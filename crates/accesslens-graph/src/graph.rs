//! AccessGraph - directed resource graph keyed by ResourceKey

use accesslens_core::{Error, ResourceKey, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Write;

/// Outcome of a vertex insertion. "Already exists" is an expected condition
/// (a relation target discovered later), not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexInsert {
    Inserted(NodeIndex),
    AlreadyExists(NodeIndex),
}

impl VertexInsert {
    pub fn index(self) -> NodeIndex {
        match self {
            Self::Inserted(idx) | Self::AlreadyExists(idx) => idx,
        }
    }
}

#[derive(Clone, Debug)]
struct Vertex {
    key: ResourceKey,
    /// Display label; None until the resource is independently discovered.
    label: Option<String>,
}

/// Directed graph of resources and their relations.
///
/// Vertices are keyed by [`ResourceKey`]; duplicate edges between the same
/// ordered pair collapse to one. Adjacency is handed out in key order so
/// traversals and serialization are deterministic.
#[derive(Debug, Default)]
pub struct AccessGraph {
    graph: DiGraph<Vertex, ()>,
    index: HashMap<ResourceKey, NodeIndex>,
}

impl AccessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex for `key`, or report the existing one.
    pub fn ensure_vertex(&mut self, key: ResourceKey) -> VertexInsert {
        if let Some(&idx) = self.index.get(&key) {
            return VertexInsert::AlreadyExists(idx);
        }
        let idx = self.graph.add_node(Vertex {
            key: key.clone(),
            label: None,
        });
        self.index.insert(key, idx);
        VertexInsert::Inserted(idx)
    }

    pub fn set_label(&mut self, idx: NodeIndex, label: impl Into<String>) {
        self.graph[idx].label = Some(label.into());
    }

    pub fn index_of(&self, key: &ResourceKey) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn key_of(&self, idx: NodeIndex) -> &ResourceKey {
        &self.graph[idx].key
    }

    /// Display label: the resource's `type/name` when known, its key otherwise.
    pub fn label_of(&self, idx: NodeIndex) -> &str {
        let vertex = &self.graph[idx];
        vertex.label.as_deref().unwrap_or_else(|| vertex.key.as_str())
    }

    /// Add a directed edge; a duplicate of an existing edge is a no-op.
    ///
    /// Errors if either endpoint does not belong to this graph (an index
    /// taken from some other graph), which would otherwise corrupt it.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<()> {
        if self.graph.node_weight(from).is_none() || self.graph.node_weight(to).is_none() {
            return Err(Error::graph(format!(
                "edge endpoints {:?} -> {:?} are not vertices of this graph",
                from, to
            )));
        }
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing neighbors in key order.
    pub fn neighbors_sorted(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self
            .graph
            .edges(idx)
            .map(|e| e.target())
            .collect();
        neighbors.sort_by(|a, b| self.graph[*a].key.cmp(&self.graph[*b].key));
        neighbors
    }

    /// All vertex keys in sorted order.
    pub fn keys_sorted(&self) -> Vec<&ResourceKey> {
        let mut keys: Vec<&ResourceKey> = self.index.keys().collect();
        keys.sort();
        keys
    }

    /// Deterministic DOT serialization: vertices with label attributes, then
    /// directed edges, both in key order.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph {\n");

        for key in self.keys_sorted() {
            let idx = self.index[key];
            let _ = writeln!(
                out,
                "\t\"{}\" [label=\"{}\"];",
                escape(key.as_str()),
                escape(self.label_of(idx))
            );
        }

        let mut edges: Vec<(&ResourceKey, &ResourceKey)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(from, to)| (&self.graph[from].key, &self.graph[to].key))
            .collect();
        edges.sort();
        for (from, to) in edges {
            let _ = writeln!(out, "\t\"{}\" -> \"{}\";", escape(from.as_str()), escape(to.as_str()));
        }

        out.push_str("}\n");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
