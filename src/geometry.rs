//! Small geometric helpers shared by the cost model and the stitcher

use nalgebra::Vector3;

/// Angle between two vectors in degrees, folded so that 90 degrees is the
/// worst case
///
/// Computed as `acos(|a.b| / (|a||b|))`. A zero-length input yields 0 by
/// definition, never an error.
pub fn angle_between_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let len_a = a.norm();
    let len_b = b.norm();
    if len_a == 0.0 || len_b == 0.0 {
        return 0.0;
    }
    let cos = (a.dot(b) / (len_a * len_b)).abs().min(1.0);
    cos.acos().to_degrees()
}

/// Heading of the segment `from -> to` in the x-y plane, in radians
pub fn heading_xy(from: &Vector3<f64>, to: &Vector3<f64>) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}
