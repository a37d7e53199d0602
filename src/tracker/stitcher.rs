//! Fragment stitcher
//!
//! Second pass over the chains the forward linker produced. A chain broken
//! beyond the gap tolerance shows up as two fragments whose headings agree;
//! this pass reconnects such pairs when the end of one points at the start
//! of the other and the frame gap stays below twice the gap tolerance.
//!
//! Unlike the forward pass this one is not sequential: all fragments are
//! known before any stitch is committed.

use smallvec::SmallVec;

use crate::config::TrackerSettings;
use crate::cost::stitch_cost;
use crate::geometry::heading_xy;
use crate::graph::TrackGraph;
use crate::types::{SpotCollection, SpotId};

use super::linker::Fragment;
use super::RunContext;

/// Reconnect fragments with matching headings, lowest stitch cost first
pub(super) fn stitch_fragments(
    spots: &SpotCollection,
    fragments: &[Fragment],
    settings: &TrackerSettings,
    ctx: &RunContext,
    graph: &mut TrackGraph,
) -> usize {
    let max_frame_gap = (2 * settings.max_gap) as f64;
    let mut added = 0;

    for (i, fragment) in fragments.iter().enumerate() {
        let Some(last) = fragment.links.last() else {
            continue;
        };
        let exit_from = &spots[last.source];
        let terminal = &spots[last.target];
        let exit_angle = heading_xy(&exit_from.position, &terminal.position);

        let mut accepted: SmallVec<[(f64, SpotId); 4]> = SmallVec::new();
        for (j, other) in fragments.iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(first) = other.links.first() else {
                continue;
            };
            let start = &spots[first.source];
            let entry_to = &spots[first.target];

            // Stitches only ever point forward in time.
            if start.frame <= terminal.frame {
                continue;
            }

            let entry_angle = heading_xy(&start.position, &entry_to.position);
            let z_angle = heading_xy(&terminal.position, &start.position);
            let angle_mismatch = (entry_angle - exit_angle).abs();
            let location_mismatch = (z_angle - exit_angle).abs();
            let frame_gap = (start.frame - terminal.frame) as f64;

            if angle_mismatch < settings.angle_diff
                && location_mismatch < settings.loc_diff
                && frame_gap < max_frame_gap
            {
                let squared_distance = (start.position - terminal.position).norm_squared();
                let cost = stitch_cost(
                    squared_distance,
                    ctx.radius[terminal.id.index()],
                    ctx.radius[start.id.index()],
                    angle_mismatch + location_mismatch,
                );
                if cost < settings.max_cost {
                    accepted.push((cost, start.id));
                }
            }
        }

        accepted.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        if let Some(&(cost, start_id)) = accepted.first() {
            if graph.add_link(terminal.id, start_id, cost) {
                added += 1;
            }
        }
    }

    log::debug!("stitch pass: {} links added", added);
    added
}
