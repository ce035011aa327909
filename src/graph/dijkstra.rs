//! Single-source shortest paths with Dijkstra's algorithm.

use super::WeightedGraph;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// State for the priority queue in Dijkstra's algorithm.
#[derive(Debug, Clone, Copy)]
struct State {
    /// Current node.
    node: usize,
    /// Distance from the source to this node.
    distance: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default),
        // lower node index first on equal distance.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Distances and predecessor links from one source node.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    source: usize,
    distance: Vec<f64>,
    previous: Vec<Option<usize>>,
}

impl ShortestPaths {
    /// The node the search started from.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Total weight of the shortest path to `node`.
    ///
    /// `f64::INFINITY` for unreachable or unknown nodes.
    pub fn distance(&self, node: usize) -> f64 {
        self.distance.get(node).copied().unwrap_or(f64::INFINITY)
    }

    /// Returns true if `node` can be reached from the source.
    pub fn is_reachable(&self, node: usize) -> bool {
        self.distance(node).is_finite()
    }

    /// Walks the predecessor links back from `target`.
    ///
    /// Returns the nodes from source to target inclusive, or `None` when
    /// `target` is unreachable.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.previous[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Runs Dijkstra's algorithm from `source` over the whole graph.
///
/// An out-of-range source leaves every node unreachable.
pub fn shortest_paths(graph: &WeightedGraph, source: usize) -> ShortestPaths {
    let n = graph.node_count();
    let mut distance = vec![f64::INFINITY; n];
    let mut previous = vec![None; n];

    if source >= n {
        return ShortestPaths {
            source,
            distance,
            previous,
        };
    }

    let mut heap = BinaryHeap::with_capacity(n);
    distance[source] = 0.0;
    heap.push(State {
        node: source,
        distance: 0.0,
    });

    // Process nodes in order of increasing distance
    while let Some(State { node, distance: d }) = heap.pop() {
        // Skip if we've already found a shorter path
        if d > distance[node] {
            continue;
        }

        // Relax edges
        for &(neighbor, weight) in graph.neighbors(node) {
            let candidate = d + weight;
            if candidate < distance[neighbor] {
                distance[neighbor] = candidate;
                previous[neighbor] = Some(node);
                heap.push(State {
                    node: neighbor,
                    distance: candidate,
                });
            }
        }
    }

    ShortestPaths {
        source,
        distance,
        previous,
    }
}

/// Finds the minimum-weight path from `source` to `target`.
///
/// Returns the node sequence including both endpoints. `source == target`
/// gives a single-node path. `None` signals that no path exists, which keeps
/// "unreachable" distinct from "already there".
pub fn shortest_path(graph: &WeightedGraph, source: usize, target: usize) -> Option<Vec<usize>> {
    if target >= graph.node_count() {
        return None;
    }
    shortest_paths(graph, source).path_to(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn undirected(n: usize, edges: &[(usize, usize, f64)]) -> WeightedGraph {
        let mut graph = WeightedGraph::new(n);
        for &(a, b, w) in edges {
            graph.add_edge(a, b, w);
            graph.add_edge(b, a, w);
        }
        graph
    }

    fn path_weight(graph: &WeightedGraph, path: &[usize]) -> f64 {
        path.windows(2)
            .map(|w| {
                graph
                    .neighbors(w[0])
                    .iter()
                    .filter(|&&(j, _)| j == w[1])
                    .map(|&(_, weight)| weight)
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    #[test]
    fn test_known_optimum() {
        // The direct edge 0-4 is longer than the detour through 1, 2 and 3.
        let graph = undirected(
            6,
            &[
                (0, 1, 7.0),
                (0, 2, 9.0),
                (0, 5, 14.0),
                (1, 2, 10.0),
                (1, 3, 15.0),
                (2, 3, 11.0),
                (2, 5, 2.0),
                (3, 4, 6.0),
                (4, 5, 9.0),
            ],
        );

        let paths = shortest_paths(&graph, 0);
        assert_relative_eq!(paths.distance(4), 20.0);
        assert_relative_eq!(paths.distance(3), 20.0);
        assert_relative_eq!(paths.distance(5), 11.0);

        let path = shortest_path(&graph, 0, 4).unwrap();
        assert_eq!(path, vec![0, 2, 5, 4]);
        assert_relative_eq!(path_weight(&graph, &path), 20.0);
    }

    #[test]
    fn test_source_equals_target() {
        let graph = undirected(2, &[(0, 1, 1.0)]);
        assert_eq!(shortest_path(&graph, 1, 1), Some(vec![1]));
    }

    #[test]
    fn test_removing_source_edges_gives_none() {
        let mut graph = undirected(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        assert_eq!(shortest_path(&graph, 0, 3), Some(vec![0, 1, 2, 3]));

        graph.clear_edges_from(0);
        assert_eq!(shortest_path(&graph, 0, 3), None);
        assert!(!shortest_paths(&graph, 0).is_reachable(1));
    }

    #[test]
    fn test_disconnected_components() {
        let graph = undirected(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
        assert_eq!(shortest_path(&graph, 0, 3), None);
        assert_eq!(shortest_path(&graph, 2, 3), Some(vec![2, 3]));
    }

    #[test]
    fn test_directed_edges_respected() {
        let mut graph = WeightedGraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        assert_eq!(shortest_path(&graph, 0, 2), Some(vec![0, 1, 2]));
        assert_eq!(shortest_path(&graph, 2, 0), None);
    }

    #[test]
    fn test_out_of_range_endpoints() {
        let graph = undirected(2, &[(0, 1, 1.0)]);
        assert_eq!(shortest_path(&graph, 5, 1), None);
        assert_eq!(shortest_path(&graph, 0, 5), None);
        assert_eq!(shortest_paths(&graph, 5).distance(0), f64::INFINITY);
    }

    #[test]
    fn test_equal_cost_ties_are_stable() {
        // Two routes of equal weight; the lower-index route is found first.
        let graph = undirected(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        assert_eq!(shortest_path(&graph, 0, 3), Some(vec![0, 1, 3]));
    }
}
