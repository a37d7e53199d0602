//! Candidate scoring
//!
//! Two distinct formulas are used by different phases and are deliberately
//! not unified:
//!
//! - the search-phase cost scores a candidate against a reference position
//!   (the source spot when seeding, the predicted position when extending)
//!   and penalizes positional distance, radius difference, quality
//!   difference and deviation from the predicted direction;
//! - the stitch-phase cost scores a candidate fragment start against a
//!   fragment end and penalizes distance, radius difference and the summed
//!   angular mismatch, with no quality term.
//!
//! Both phases reject any candidate whose cost reaches `max_cost`.

use nalgebra::Vector3;

use crate::geometry::angle_between_deg;

/// Reference a search-phase query scores candidates against
///
/// When seeding there is no motion history yet: `origin` equals `position`
/// and the angle term vanishes. When extending, `position` is the predicted
/// position and `origin` the last matched position, so the angle term
/// measures deviation from the predicted direction.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Position the search is centered on
    pub position: Vector3<f64>,
    /// Last matched position, the origin for the angle term
    pub origin: Vector3<f64>,
    /// Effective radius of the reference spot
    pub radius: f64,
    /// Quality of the reference spot
    pub quality: f64,
}

/// Search-phase cost of a candidate spot
///
/// `d²/8 + (1 + 3·|Δradius|) + |Δquality|/4 + angle`, where `angle` is the
/// deviation in degrees between the reference direction and the direction
/// towards the candidate, both taken from `reference.origin`.
pub fn search_cost(
    reference: &Reference,
    candidate_position: &Vector3<f64>,
    candidate_radius: f64,
    candidate_quality: f64,
    squared_distance: f64,
) -> f64 {
    let predicted_dir = reference.position - reference.origin;
    let actual_dir = candidate_position - reference.origin;
    let angle = angle_between_deg(&predicted_dir, &actual_dir);
    let radius_penalty = 1.0 + 3.0 * (candidate_radius - reference.radius).abs();
    let quality_penalty = (candidate_quality - reference.quality).abs() / 4.0;
    squared_distance / 8.0 + radius_penalty + quality_penalty + angle
}

/// Stitch-phase cost of reconnecting two fragments
///
/// `d²/4 + (1 + 1.5·|Δradius|) + angle_sum°/10`, with `angle_sum` the sum
/// of the two angular mismatch terms in radians.
pub fn stitch_cost(
    squared_distance: f64,
    terminal_radius: f64,
    start_radius: f64,
    angle_sum: f64,
) -> f64 {
    let radius_penalty = 1.0 + 1.5 * (start_radius - terminal_radius).abs();
    squared_distance / 4.0 + radius_penalty + angle_sum.to_degrees() / 10.0
}
