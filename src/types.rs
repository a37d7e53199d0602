//! Core data structures for spot linking
//!
//! A [`Spot`] is a detected point object with a position, radius, quality
//! score and frame index. Spots live in a [`SpotCollection`] arena and are
//! addressed by [`SpotId`]; all run-scoped per-spot state (consumption
//! markers, effective radii) is kept in id-indexed vectors owned by the
//! tracking run, never on the spot itself.

use std::collections::BTreeMap;
use std::ops::Index;

use nalgebra::Vector3;

/// Stable identifier of a spot within its collection
///
/// Indexes the collection's arena. Ids are assigned in insertion order and
/// double as the deterministic tie-break key wherever candidates compare
/// equal on cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotId(pub usize);

impl SpotId {
    /// Arena index of this spot
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A detected point object
///
/// Immutable for the duration of a tracking run. 2D data uses z = 0.
#[derive(Debug, Clone)]
pub struct Spot {
    /// Identifier within the owning collection
    pub id: SpotId,
    /// Position in physical units
    pub position: Vector3<f64>,
    /// Radius reported by the detector
    pub radius: f64,
    /// Quality / intensity score
    pub quality: f64,
    /// Frame index this spot was detected in
    pub frame: usize,
    /// Pre-computed estimated diameter feature, if available.
    /// Selected over `radius` when `estimate_radius` is enabled.
    pub estimated_diameter: Option<f64>,
}

/// Frame-indexed arena of spots
///
/// Owns the spots and a frame -> member-id mapping in ascending frame
/// order. Frames with no spots simply have no entry; the tracker builds
/// one spatial index per non-empty frame.
#[derive(Debug, Clone, Default)]
pub struct SpotCollection {
    spots: Vec<Spot>,
    frames: BTreeMap<usize, Vec<SpotId>>,
}

impl SpotCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a spot, returning its id
    pub fn add(
        &mut self,
        frame: usize,
        position: Vector3<f64>,
        radius: f64,
        quality: f64,
    ) -> SpotId {
        self.add_with_estimate(frame, position, radius, quality, None)
    }

    /// Add a spot carrying a pre-computed estimated diameter feature
    pub fn add_with_estimate(
        &mut self,
        frame: usize,
        position: Vector3<f64>,
        radius: f64,
        quality: f64,
        estimated_diameter: Option<f64>,
    ) -> SpotId {
        let id = SpotId(self.spots.len());
        self.spots.push(Spot {
            id,
            position,
            radius,
            quality,
            frame,
            estimated_diameter,
        });
        self.frames.entry(frame).or_default().push(id);
        id
    }

    /// Total number of spots
    #[inline]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Whether the collection holds no spots
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Number of non-empty frames
    #[inline]
    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Iterate non-empty frames in ascending frame order
    pub fn frames(&self) -> impl Iterator<Item = (usize, &[SpotId])> {
        self.frames.iter().map(|(&frame, ids)| (frame, ids.as_slice()))
    }

    /// Member ids of one frame, in insertion order
    pub fn frame_members(&self, frame: usize) -> &[SpotId] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All spots in arena order
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }
}

impl Index<SpotId> for SpotCollection {
    type Output = Spot;

    #[inline]
    fn index(&self, id: SpotId) -> &Spot {
        &self.spots[id.index()]
    }
}
