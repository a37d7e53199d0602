//! The output track graph
//!
//! An undirected weighted graph whose vertices are the spots of the input
//! collection and whose edges carry a non-negative link cost. At most one
//! edge exists between any unordered pair of spots; edge direction is
//! implied by ascending frame index and not stored structurally.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::types::{SpotCollection, SpotId};

/// Weighted undirected graph of linked spots
///
/// Created with every spot pre-inserted as a vertex, grown incrementally by
/// the tracking passes and returned as the run's sole output.
#[derive(Debug, Clone)]
pub struct TrackGraph {
    graph: UnGraph<SpotId, f64>,
    nodes: Vec<NodeIndex>,
}

impl TrackGraph {
    /// Create a graph with one vertex per spot and no edges
    pub(crate) fn new(spots: &SpotCollection) -> Self {
        let mut graph = UnGraph::with_capacity(spots.len(), spots.len());
        let nodes = spots.spots().iter().map(|s| graph.add_node(s.id)).collect();
        Self { graph, nodes }
    }

    /// Whether the unordered pair is already linked
    pub fn contains_link(&self, a: SpotId, b: SpotId) -> bool {
        self.graph
            .find_edge(self.nodes[a.index()], self.nodes[b.index()])
            .is_some()
    }

    /// Link two spots, refusing duplicates
    ///
    /// Returns false and leaves the graph untouched if the pair is already
    /// linked.
    pub(crate) fn add_link(&mut self, a: SpotId, b: SpotId, weight: f64) -> bool {
        if self.contains_link(a, b) {
            return false;
        }
        self.graph
            .add_edge(self.nodes[a.index()], self.nodes[b.index()], weight);
        true
    }

    /// Weight of the link between two spots, if any
    pub fn link_weight(&self, a: SpotId, b: SpotId) -> Option<f64> {
        self.graph
            .find_edge(self.nodes[a.index()], self.nodes[b.index()])
            .map(|edge| self.graph[edge])
    }

    /// Number of links
    #[inline]
    pub fn n_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of vertices (all spots of the input collection)
    #[inline]
    pub fn n_spots(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate all links as `(spot, spot, weight)` in insertion order
    pub fn links(&self) -> impl Iterator<Item = (SpotId, SpotId, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()], *e.weight()))
    }

    /// Spots linked to the given spot
    pub fn linked_to(&self, id: SpotId) -> impl Iterator<Item = SpotId> + '_ {
        self.graph
            .neighbors(self.nodes[id.index()])
            .map(|n| self.graph[n])
    }

    /// The underlying petgraph structure, for downstream analysis
    pub fn graph(&self) -> &UnGraph<SpotId, f64> {
        &self.graph
    }
}
