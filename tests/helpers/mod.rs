//! Shared builders for synthetic spot collections

use nalgebra::Vector3;
use spotlink::{SpotCollection, SpotId, TrackGraph};

/// Route `log` output to the test harness (`RUST_LOG=debug` shows the
/// per-pass summaries). Safe to call from every test; only the first
/// call installs the logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Add one spot per frame along a straight line, returning the ids
pub fn add_line(
    spots: &mut SpotCollection,
    frames: std::ops::Range<usize>,
    start: Vector3<f64>,
    step: Vector3<f64>,
) -> Vec<SpotId> {
    frames
        .map(|frame| spots.add(frame, start + step * frame as f64, 1.0, 10.0))
        .collect()
}

/// All links as `(low id, high id, weight bits)`, sorted
///
/// Weights are compared bit-exactly so two runs must agree completely.
pub fn sorted_links(graph: &TrackGraph) -> Vec<(usize, usize, u64)> {
    let mut links: Vec<(usize, usize, u64)> = graph
        .links()
        .map(|(a, b, w)| {
            let (low, high) = if a.index() <= b.index() {
                (a.index(), b.index())
            } else {
                (b.index(), a.index())
            };
            (low, high, w.to_bits())
        })
        .collect();
    links.sort_unstable();
    links
}
