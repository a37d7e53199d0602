/*!
# spotlink - frame-to-frame spot trajectory linking

Links detected point objects ("spots"), located independently frame-by-frame
in a time-lapse sequence, into temporal trajectories. Given per-frame sets of
spots (position, radius, quality), the tracker produces an undirected
weighted graph whose edges are the most plausible frame-to-frame
correspondences of the same physical object, tolerating brief detection gaps
and fully stationary objects.

## Pipeline

1. One balanced KD-tree per frame, built up front (in parallel).
2. Burn-out pass: spots sticking within a small radius for most of the
   sequence are linked with zero-weight edges and consumed.
3. Forward pass: chains seed within `initial_distance`, then follow the mean
   displacement to predict each next position and link within
   `succeeding_distance`, tolerating up to `max_gap` missed frames.
4. Stitch pass: chains broken beyond the gap tolerance are reconnected when
   their headings agree.

## Modules

- [`tracker`] - [`LinearTracker`], the tracking pipeline
- [`types`] - [`Spot`], [`SpotId`], [`SpotCollection`]
- [`graph`] - the output [`TrackGraph`]
- [`kdtree`] - per-frame spatial index
- [`cost`] - candidate scoring formulas
- [`config`] - [`TrackerSettings`]

## Example

```rust
use nalgebra::Vector3;
use spotlink::{LinearTracker, SpotCollection, TrackerSettings};

let mut spots = SpotCollection::new();
for frame in 0..5 {
    spots.add(frame, Vector3::new(frame as f64, 0.0, 0.0), 1.0, 10.0);
}

let tracker = LinearTracker::new(&spots, TrackerSettings::default());
let graph = tracker.track()?;
assert_eq!(graph.n_links(), 4);
# Ok::<(), spotlink::TrackerError>(())
```
*/

pub mod config;
pub mod cost;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod kdtree;
pub mod reporter;
pub mod tracker;
pub mod types;

pub use config::TrackerSettings;
pub use errors::TrackerError;
pub use graph::TrackGraph;
pub use reporter::{NoOpReporter, ProgressReporter};
pub use tracker::LinearTracker;
pub use types::{Spot, SpotCollection, SpotId};
