//! Per-frame spatial index
//!
//! A static, balanced KD-tree built once from the spots of a single frame.
//! Construction is side-effect-free and queries never mutate the index;
//! the consumption markers live outside the tree and are consulted on every
//! visit so already-linked spots drop out of results.
//!
//! The radius traversal is recursive: the near branch is always descended,
//! the away branch only when the splitting plane lies within the search
//! radius. Median splitting keeps the depth around log(N).

use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::cost::{search_cost, Reference};
use crate::types::{SpotCollection, SpotId};

/// One scored query result
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// The matching spot
    pub id: SpotId,
    /// Its cost under the query's scoring rule
    pub cost: f64,
}

#[derive(Debug, Clone)]
struct Node {
    position: Vector3<f64>,
    id: SpotId,
    quality: f64,
    split: usize,
    left: Option<u32>,
    right: Option<u32>,
}

/// Static KD-tree over the spots of one frame
#[derive(Debug, Clone)]
pub struct FrameIndex {
    nodes: Vec<Node>,
    root: Option<u32>,
    frame: usize,
}

impl FrameIndex {
    /// Build the index for one frame from the given member spots
    pub fn build(frame: usize, spots: &SpotCollection, members: &[SpotId]) -> Self {
        let mut entries: Vec<(Vector3<f64>, SpotId, f64)> = members
            .iter()
            .map(|&id| {
                let spot = &spots[id];
                (spot.position, id, spot.quality)
            })
            .collect();
        let mut nodes = Vec::with_capacity(entries.len());
        let root = build_node(&mut entries, 0, &mut nodes);
        Self { nodes, root, frame }
    }

    /// Frame this index was built for
    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Number of indexed spots
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no spots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Plain radius query scored by squared distance
    ///
    /// Results come back in traversal order (unsorted); the first hit is
    /// good enough for the stationary-object pre-pass. Matches require the
    /// squared distance to be strictly below `radius²` and below
    /// `max_cost`, so a zero radius can never match.
    pub fn query_radius(
        &self,
        position: &Vector3<f64>,
        radius: f64,
        max_cost: f64,
        consumed: &[bool],
    ) -> SmallVec<[Candidate; 4]> {
        let mut results = SmallVec::new();
        if let Some(root) = self.root {
            self.search_plain(root, position, radius * radius, max_cost, consumed, &mut results);
        }
        results
    }

    /// Cost-scored radius query
    ///
    /// Every unconsumed spot within `radius` of the reference position is
    /// scored with the search-phase cost; candidates at or above `max_cost`
    /// are rejected. Results are sorted ascending by `(cost, id)`; the id
    /// tie-break keeps runs deterministic when costs compare equal.
    pub fn query_cost(
        &self,
        reference: &Reference,
        radius: f64,
        max_cost: f64,
        consumed: &[bool],
        radii: &[f64],
    ) -> SmallVec<[Candidate; 8]> {
        let mut results = SmallVec::new();
        if let Some(root) = self.root {
            self.search_scored(
                root,
                reference,
                radius * radius,
                max_cost,
                consumed,
                radii,
                &mut results,
            );
        }
        results.sort_by(|a, b| a.cost.total_cmp(&b.cost).then(a.id.cmp(&b.id)));
        results
    }

    fn search_plain(
        &self,
        index: u32,
        position: &Vector3<f64>,
        squared_radius: f64,
        max_cost: f64,
        consumed: &[bool],
        results: &mut SmallVec<[Candidate; 4]>,
    ) {
        let node = &self.nodes[index as usize];
        let squared_distance = (node.position - position).norm_squared();
        if squared_distance < squared_radius
            && squared_distance < max_cost
            && !consumed[node.id.index()]
        {
            results.push(Candidate {
                id: node.id,
                cost: squared_distance,
            });
        }

        let axis_diff = position[node.split] - node.position[node.split];
        let (near, away) = if axis_diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(near) = near {
            self.search_plain(near, position, squared_radius, max_cost, consumed, results);
        }
        if axis_diff * axis_diff < squared_radius {
            if let Some(away) = away {
                self.search_plain(away, position, squared_radius, max_cost, consumed, results);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn search_scored(
        &self,
        index: u32,
        reference: &Reference,
        squared_radius: f64,
        max_cost: f64,
        consumed: &[bool],
        radii: &[f64],
        results: &mut SmallVec<[Candidate; 8]>,
    ) {
        let node = &self.nodes[index as usize];
        let squared_distance = (node.position - reference.position).norm_squared();
        if squared_distance <= squared_radius && !consumed[node.id.index()] {
            let cost = search_cost(
                reference,
                &node.position,
                radii[node.id.index()],
                node.quality,
                squared_distance,
            );
            if cost < max_cost {
                results.push(Candidate { id: node.id, cost });
            }
        }

        let axis_diff = reference.position[node.split] - node.position[node.split];
        let (near, away) = if axis_diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        if let Some(near) = near {
            self.search_scored(near, reference, squared_radius, max_cost, consumed, radii, results);
        }
        if axis_diff * axis_diff <= squared_radius {
            if let Some(away) = away {
                self.search_scored(away, reference, squared_radius, max_cost, consumed, radii, results);
            }
        }
    }
}

/// Recursive median-split construction
///
/// The split dimension cycles with depth; equal coordinates fall back to id
/// order so construction is deterministic.
fn build_node(
    entries: &mut [(Vector3<f64>, SpotId, f64)],
    depth: usize,
    nodes: &mut Vec<Node>,
) -> Option<u32> {
    if entries.is_empty() {
        return None;
    }
    let split = depth % 3;
    let median = entries.len() / 2;
    entries.select_nth_unstable_by(median, |a, b| {
        a.0[split].total_cmp(&b.0[split]).then(a.1.cmp(&b.1))
    });

    let (position, id, quality) = entries[median];
    let index = nodes.len() as u32;
    nodes.push(Node {
        position,
        id,
        quality,
        split,
        left: None,
        right: None,
    });

    let (lower, rest) = entries.split_at_mut(median);
    let left = build_node(lower, depth + 1, nodes);
    let right = build_node(&mut rest[1..], depth + 1, nodes);
    let node = &mut nodes[index as usize];
    node.left = left;
    node.right = right;
    Some(index)
}
