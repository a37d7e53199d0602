//! Forward directional linker
//!
//! Grows one chain per unconsumed source spot, frame-ascending. Each chain
//! seeds with a plain radius search, then predicts the next position from
//! the mean displacement so far and searches around the prediction,
//! tolerating up to `max_gap` consecutive unmatched frames. The pass is
//! deliberately sequential: links made at frame f decide which spots are
//! still available at frame f + 1.

use nalgebra::Vector3;

use crate::config::TrackerSettings;
use crate::cost::Reference;
use crate::graph::TrackGraph;
use crate::kdtree::FrameIndex;
use crate::reporter::ProgressReporter;
use crate::types::{SpotCollection, SpotId};

use super::RunContext;

/// One committed link of a chain
#[derive(Debug, Clone, Copy)]
pub(super) struct Link {
    pub source: SpotId,
    pub target: SpotId,
}

/// The edge sequence of one continuous chain, in link order
///
/// Exists only between the forward pass and the stitch pass. Fragments are
/// collected in creation order so the stitch pass is deterministic.
#[derive(Debug, Clone)]
pub(super) struct Fragment {
    pub links: Vec<Link>,
}

/// Run the forward pass, returning the fragments it produced
pub(super) fn link_forward(
    spots: &SpotCollection,
    indices: &[FrameIndex],
    settings: &TrackerSettings,
    ctx: &mut RunContext,
    graph: &mut TrackGraph,
    reporter: &mut dyn ProgressReporter,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let n_frames = indices.len();

    for t in 1..n_frames {
        let source_frame = indices[t - 1].frame();
        for &source_id in spots.frame_members(source_frame) {
            if ctx.consumed[source_id.index()] {
                continue;
            }
            if let Some(fragment) = grow_chain(source_id, t, spots, indices, settings, ctx, graph)
            {
                fragments.push(fragment);
            }
        }
        reporter.progress(t as f64 / n_frames as f64);
    }

    log::debug!("forward pass: {} fragments", fragments.len());
    fragments
}

/// Seed one chain at `source_id` and extend it as far as it will go
fn grow_chain(
    source_id: SpotId,
    t: usize,
    spots: &SpotCollection,
    indices: &[FrameIndex],
    settings: &TrackerSettings,
    ctx: &mut RunContext,
    graph: &mut TrackGraph,
) -> Option<Fragment> {
    let source = &spots[source_id];

    // Seed: no motion history yet, so the reference carries the source
    // itself and the angle term vanishes.
    let reference = Reference {
        position: source.position,
        origin: source.position,
        radius: ctx.radius[source_id.index()],
        quality: source.quality,
    };
    let candidates = indices[t].query_cost(
        &reference,
        settings.initial_distance,
        settings.max_cost,
        &ctx.consumed,
        &ctx.radius,
    );
    let seed = *candidates.first()?;

    ctx.consumed[source_id.index()] = true;
    ctx.consumed[seed.id.index()] = true;
    let mut links = Vec::new();
    if graph.add_link(source_id, seed.id, seed.cost) {
        links.push(Link {
            source: source_id,
            target: seed.id,
        });
    }

    let mut last_id = seed.id;
    let mut last_position = spots[seed.id].position;
    // Displacement between the last two matched positions.
    let mut displacement = last_position - source.position;
    let mut displacement_sum = Vector3::zeros();
    let mut count = 1usize;
    let mut gap = 0usize;
    let mut step = t + 1;

    while step < indices.len() {
        displacement_sum += displacement;
        let mean = displacement_sum / count as f64;
        let predicted = last_position + mean;

        let reference = Reference {
            position: predicted,
            origin: last_position,
            radius: ctx.radius[last_id.index()],
            quality: spots[last_id].quality,
        };
        let candidates = indices[step].query_cost(
            &reference,
            settings.succeeding_distance,
            settings.max_cost,
            &ctx.consumed,
            &ctx.radius,
        );

        let Some(&best) = candidates.first() else {
            if gap < settings.max_gap {
                // Hold station: the prediction stays anchored at the last
                // matched position while the gap counter runs.
                gap += 1;
                step += 1;
                count += 1;
                continue;
            }
            break;
        };
        gap = 0;

        let next_position = spots[best.id].position;
        displacement = next_position - last_position;
        if graph.add_link(last_id, best.id, best.cost) {
            ctx.consumed[last_id.index()] = true;
            ctx.consumed[best.id.index()] = true;
            links.push(Link {
                source: last_id,
                target: best.id,
            });
        }

        last_id = best.id;
        last_position = next_position;
        count += 1;
        step += 1;
    }

    (!links.is_empty()).then_some(Fragment { links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NoOpReporter;
    use nalgebra::Vector3;

    fn run(spots: &SpotCollection, settings: &TrackerSettings) -> (TrackGraph, Vec<Fragment>) {
        let indices: Vec<FrameIndex> = spots
            .frames()
            .map(|(frame, members)| FrameIndex::build(frame, spots, members))
            .collect();
        let mut ctx = RunContext::new(spots, settings.estimate_radius);
        let mut graph = TrackGraph::new(spots);
        let fragments = link_forward(
            spots,
            &indices,
            settings,
            &mut ctx,
            &mut graph,
            &mut NoOpReporter,
        );
        (graph, fragments)
    }

    #[test]
    fn test_straight_chain_is_fully_linked() {
        let mut spots = SpotCollection::new();
        let ids: Vec<SpotId> = (0..6)
            .map(|f| spots.add(f, Vector3::new(f as f64, 0.0, 0.0), 1.0, 10.0))
            .collect();
        let settings = TrackerSettings::default();

        let (graph, fragments) = run(&spots, &settings);
        assert_eq!(graph.n_links(), 5);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].links.len(), 5);
        for pair in ids.windows(2) {
            assert!(graph.contains_link(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_gap_is_closed_within_tolerance() {
        // Matches in frames 0-2 and 4; frame 3 holds only a far-away spot.
        let mut spots = SpotCollection::new();
        for f in 0..3 {
            spots.add(f, Vector3::new(f as f64, 0.0, 0.0), 1.0, 10.0);
        }
        spots.add(3, Vector3::new(100.0, 100.0, 0.0), 1.0, 10.0);
        let jumped = spots.add(4, Vector3::new(4.0, 0.0, 0.0), 1.0, 10.0);
        let settings = TrackerSettings::default();

        let (graph, fragments) = run(&spots, &settings);
        assert_eq!(fragments.len(), 1);
        let last = fragments[0].links.last().unwrap();
        assert_eq!(last.target, jumped);
        assert!(graph.contains_link(SpotId(2), jumped));
        // Gap closing, not termination: one fragment spanning the hole.
        assert_eq!(graph.n_links(), 3);
    }

    #[test]
    fn test_gap_beyond_tolerance_terminates_the_chain() {
        let mut spots = SpotCollection::new();
        for f in 0..3 {
            spots.add(f, Vector3::new(f as f64, 0.0, 0.0), 1.0, 10.0);
        }
        // Three unmatchable frames, then the trajectory resumes.
        for f in 3..6 {
            spots.add(f, Vector3::new(500.0, 500.0 + f as f64, 0.0), 1.0, 10.0);
        }
        spots.add(6, Vector3::new(6.0, 0.0, 0.0), 1.0, 10.0);
        let settings = TrackerSettings::default();

        let (graph, fragments) = run(&spots, &settings);
        // First chain dies after max_gap misses; the far spots form their
        // own chain.
        assert!(fragments.len() >= 2);
        assert!(!graph.contains_link(SpotId(2), SpotId(6)));
    }

    #[test]
    fn test_consumed_sources_do_not_seed() {
        let mut spots = SpotCollection::new();
        let a = spots.add(0, Vector3::zeros(), 1.0, 10.0);
        spots.add(1, Vector3::new(1.0, 0.0, 0.0), 1.0, 10.0);
        let settings = TrackerSettings::default();

        let indices: Vec<FrameIndex> = spots
            .frames()
            .map(|(frame, members)| FrameIndex::build(frame, &spots, members))
            .collect();
        let mut ctx = RunContext::new(&spots, false);
        ctx.consumed[a.index()] = true;
        let mut graph = TrackGraph::new(&spots);
        let fragments = link_forward(
            &spots,
            &indices,
            &settings,
            &mut ctx,
            &mut graph,
            &mut NoOpReporter,
        );
        assert!(fragments.is_empty());
        assert_eq!(graph.n_links(), 0);
    }
}
