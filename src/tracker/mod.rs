//! Tracking orchestration
//!
//! [`LinearTracker`] runs the full pipeline over a spot collection:
//!
//! 1. validate settings and input;
//! 2. build one spatial index per non-empty frame (in parallel; index
//!    construction is independent per frame);
//! 3. burn out stationary objects (zero-weight chains, spots consumed);
//! 4. grow directional chains frame by frame with gap closing;
//! 5. stitch fragments broken beyond the gap tolerance.
//!
//! The consumption-marker set and the output graph are owned exclusively
//! by the running call; passes 3 and 4 share the marker set, which is why
//! they run sequentially.

mod burnout;
mod linker;
mod stitcher;

use rayon::prelude::*;

use crate::config::TrackerSettings;
use crate::errors::TrackerError;
use crate::graph::TrackGraph;
use crate::kdtree::FrameIndex;
use crate::reporter::{NoOpReporter, ProgressReporter};
use crate::types::{Spot, SpotCollection, SpotId};

/// Run-scoped per-spot state, indexed by [`SpotId`]
///
/// Created fresh for every tracking call. Once a spot is marked consumed it
/// can never become a new source or target for the remainder of the run.
pub(crate) struct RunContext {
    /// Consumption markers shared by the burn-out and forward passes
    pub(crate) consumed: Vec<bool>,
    /// Effective radius per spot (estimated-diameter-derived when enabled)
    pub(crate) radius: Vec<f64>,
}

impl RunContext {
    fn new(spots: &SpotCollection, estimate_radius: bool) -> Self {
        let radius = spots
            .spots()
            .iter()
            .map(|s| effective_radius(s, estimate_radius))
            .collect();
        Self {
            consumed: vec![false; spots.len()],
            radius,
        }
    }
}

fn effective_radius(spot: &Spot, estimate_radius: bool) -> f64 {
    if estimate_radius {
        match spot.estimated_diameter {
            Some(diameter) if diameter > 0.0 => diameter / 2.0,
            _ => spot.radius,
        }
    } else {
        spot.radius
    }
}

/// Links spots into trajectories across frames
///
/// Establishes a first link within `initial_distance`, predicts the next
/// position from the mean displacement so far, and keeps linking within
/// `succeeding_distance` of the prediction until the gap tolerance runs
/// out. A pre-pass removes near-immobile spots; a post-pass reconnects
/// chains broken beyond the gap tolerance using angular continuity.
pub struct LinearTracker<'a> {
    spots: &'a SpotCollection,
    settings: TrackerSettings,
}

impl<'a> LinearTracker<'a> {
    /// Create a tracker over a caller-owned spot collection
    pub fn new(spots: &'a SpotCollection, settings: TrackerSettings) -> Self {
        Self { spots, settings }
    }

    /// The settings this tracker was created with
    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Run the tracker and return the track graph
    pub fn track(&self) -> Result<TrackGraph, TrackerError> {
        self.track_with(&mut NoOpReporter)
    }

    /// Run the tracker, reporting progress to the given observer
    pub fn track_with(
        &self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<TrackGraph, TrackerError> {
        self.settings.validate()?;
        if self.spots.is_empty() {
            return Err(TrackerError::EmptyCollection);
        }

        let frames: Vec<(usize, &[SpotId])> = self.spots.frames().collect();
        let indices: Vec<FrameIndex> = frames
            .par_iter()
            .map(|&(frame, members)| FrameIndex::build(frame, self.spots, members))
            .collect();
        log::debug!("built {} frame indices", indices.len());

        let mut ctx = RunContext::new(self.spots, self.settings.estimate_radius);
        let mut graph = TrackGraph::new(self.spots);

        burnout::burn_stationary(self.spots, &indices, &self.settings, &mut ctx, &mut graph);
        let fragments = linker::link_forward(
            self.spots,
            &indices,
            &self.settings,
            &mut ctx,
            &mut graph,
            reporter,
        );
        stitcher::stitch_fragments(self.spots, &fragments, &self.settings, &ctx, &mut graph);

        reporter.progress(1.0);
        log::info!(
            "tracking done: {} spots, {} links",
            graph.n_spots(),
            graph.n_links()
        );
        Ok(graph)
    }
}
