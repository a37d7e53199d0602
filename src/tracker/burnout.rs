//! Stationary-object pre-pass
//!
//! Near-immobile spots (background debris, fixed artifacts) would pollute
//! the directional search's displacement estimates, so they are linked
//! cheaply and consumed before the forward pass runs.

use crate::config::TrackerSettings;
use crate::graph::TrackGraph;
use crate::kdtree::FrameIndex;
use crate::types::SpotCollection;

use super::RunContext;

/// Link and consume spots that stick within `stick_radius` for more than
/// `stick_fraction` of the sequence
///
/// For every still-unconsumed spot of the first indexed frame, each later
/// frame is probed at the source position; the first in-radius hit per
/// frame joins the chain. Chains longer than the burn threshold are linked
/// with zero-weight edges and every member is marked consumed. Shorter
/// chains leave all spots untouched for the forward pass.
pub(super) fn burn_stationary(
    spots: &SpotCollection,
    indices: &[FrameIndex],
    settings: &TrackerSettings,
    ctx: &mut RunContext,
    graph: &mut TrackGraph,
) -> usize {
    if indices.len() < 2 {
        return 0;
    }
    let threshold = (indices.len() as f64 * settings.stick_fraction).round() as usize;
    let mut chains = 0;

    let first_frame = indices[0].frame();
    for &source_id in spots.frame_members(first_frame) {
        if ctx.consumed[source_id.index()] {
            continue;
        }
        let source_position = spots[source_id].position;

        let mut chain = Vec::new();
        for index in &indices[1..] {
            let hits = index.query_radius(
                &source_position,
                settings.stick_radius,
                settings.max_cost,
                &ctx.consumed,
            );
            if let Some(hit) = hits.first() {
                chain.push(hit.id);
            }
        }

        if chain.len() > threshold {
            ctx.consumed[source_id.index()] = true;
            let mut previous = source_id;
            for &member in &chain {
                ctx.consumed[member.index()] = true;
                graph.add_link(previous, member, 0.0);
                previous = member;
            }
            chains += 1;
        }
    }

    log::debug!("burn-out pass: {} stationary chains", chains);
    chains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpotId;
    use nalgebra::Vector3;

    fn run(
        spots: &SpotCollection,
        settings: &TrackerSettings,
    ) -> (RunContext, TrackGraph, usize) {
        let indices: Vec<FrameIndex> = spots
            .frames()
            .map(|(frame, members)| FrameIndex::build(frame, spots, members))
            .collect();
        let mut ctx = RunContext::new(spots, settings.estimate_radius);
        let mut graph = TrackGraph::new(spots);
        let chains = burn_stationary(spots, &indices, settings, &mut ctx, &mut graph);
        (ctx, graph, chains)
    }

    #[test]
    fn test_sticking_chain_is_linked_and_consumed() {
        let mut spots = SpotCollection::new();
        for frame in 0..10 {
            spots.add(frame, Vector3::new(5.0, 5.0, 0.0), 1.0, 10.0);
        }
        let mut settings = TrackerSettings::default();
        settings.stick_radius = 0.5;

        let (ctx, graph, chains) = run(&spots, &settings);
        assert_eq!(chains, 1);
        assert_eq!(graph.n_links(), 9);
        assert!(ctx.consumed.iter().all(|&c| c));
        assert!(graph.links().all(|(_, _, w)| w == 0.0));
    }

    #[test]
    fn test_moving_spot_is_left_alone() {
        let mut spots = SpotCollection::new();
        for frame in 0..10 {
            spots.add(frame, Vector3::new(frame as f64 * 3.0, 0.0, 0.0), 1.0, 10.0);
        }
        let mut settings = TrackerSettings::default();
        settings.stick_radius = 0.5;

        let (ctx, graph, chains) = run(&spots, &settings);
        assert_eq!(chains, 0);
        assert_eq!(graph.n_links(), 0);
        assert!(ctx.consumed.iter().all(|&c| !c));
    }

    #[test]
    fn test_below_threshold_chain_is_left_alone() {
        // Sticks for 6 of 10 frames, wanders off afterwards.
        let mut spots = SpotCollection::new();
        for frame in 0..7 {
            spots.add(frame, Vector3::new(5.0, 5.0, 0.0), 1.0, 10.0);
        }
        for frame in 7..10 {
            spots.add(frame, Vector3::new(50.0 + frame as f64 * 10.0, 0.0, 0.0), 1.0, 10.0);
        }
        let mut settings = TrackerSettings::default();
        settings.stick_radius = 0.5;
        settings.stick_fraction = 0.8;

        let (ctx, graph, chains) = run(&spots, &settings);
        assert_eq!(chains, 0);
        assert_eq!(graph.n_links(), 0);
        assert!(!ctx.consumed[SpotId(0).index()]);
    }
}
