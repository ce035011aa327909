//! Weighted proximity graphs over medial points and shortest paths on them.

mod dijkstra;
mod proximity;

pub use dijkstra::{shortest_path, shortest_paths, ShortestPaths};
pub use proximity::{build_proximity_graph, NeighborSearch};

/// Directed graph stored as per-node lists of `(neighbor, weight)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedGraph {
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl WeightedGraph {
    /// Creates a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Adds a directed edge. Edges touching unknown nodes are ignored.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) {
        if to < self.adjacency.len() {
            if let Some(edges) = self.adjacency.get_mut(from) {
                edges.push((to, weight));
            }
        }
    }

    /// Removes every edge leaving `node`.
    pub fn clear_edges_from(&mut self, node: usize) {
        if let Some(edges) = self.adjacency.get_mut(node) {
            edges.clear();
        }
    }

    /// Outgoing edges of `node`, empty for unknown nodes.
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }
}
