//! Tracker settings
//!
//! All parameters of a tracking run. Defaults match the values shipped
//! with the original linear tracker (initial distance 10, succeeding
//! distance 5, stick radius 2, max cost 100).

use serde::Serialize;

use crate::errors::TrackerError;

/// Parameters of one tracking run
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSettings {
    /// Search radius for the first link of a chain (physical units)
    pub initial_distance: f64,
    /// Search radius around the predicted position for subsequent links
    pub succeeding_distance: f64,
    /// Radius within which a spot counts as stationary across frames
    pub stick_radius: f64,
    /// Candidates scoring at or above this cost are rejected
    pub max_cost: f64,
    /// Use the estimated-diameter feature instead of the detector radius
    pub estimate_radius: bool,
    /// Maximum number of consecutive frames a chain may go unmatched
    pub max_gap: usize,
    /// Fraction of frames a spot must stick to be burned out as stationary
    pub stick_fraction: f64,
    /// Stitch pass: maximum entry/exit heading difference (radians)
    pub angle_diff: f64,
    /// Stitch pass: maximum deviation of the connecting direction (radians)
    pub loc_diff: f64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            initial_distance: 10.0,
            succeeding_distance: 5.0,
            stick_radius: 2.0,
            max_cost: 100.0,
            estimate_radius: false,
            max_gap: 2,
            stick_fraction: 0.8,
            angle_diff: 0.1745,
            loc_diff: 0.26,
        }
    }
}

impl TrackerSettings {
    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<(), TrackerError> {
        check_positive("initial_distance", self.initial_distance)?;
        check_positive("succeeding_distance", self.succeeding_distance)?;
        check_non_negative("stick_radius", self.stick_radius)?;
        check_non_negative("max_cost", self.max_cost)?;
        check_non_negative("angle_diff", self.angle_diff)?;
        check_non_negative("loc_diff", self.loc_diff)?;
        if !self.stick_fraction.is_finite()
            || self.stick_fraction <= 0.0
            || self.stick_fraction > 1.0
        {
            return Err(TrackerError::InvalidSetting {
                name: "stick_fraction",
                reason: format!("must be within (0, 1], got {}", self.stick_fraction),
            });
        }
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), TrackerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::InvalidSetting {
            name,
            reason: format!("must be a positive finite number, got {}", value),
        });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), TrackerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrackerError::InvalidSetting {
            name,
            reason: format!("must be a non-negative finite number, got {}", value),
        });
    }
    Ok(())
}
