//! Level-of-Detail Tiers
//!
//! A model carries one [`LevelOfDetail`] per detail tier; tier 0 is full
//! detail and higher tiers are coarser. Each tier owns its own frame array
//! and a minimum camera distance; per-mesh geometry for the tier lives in
//! the matching [`MeshLod`](crate::MeshLod) of every mesh.

use crate::frame::Frame;

/// Default minimum camera distance for a tier: a fixed geometric progression
pub fn default_lod_distance(tier: usize) -> f32 {
    10.0 * (0.5 + tier as f32 * 0.5)
}

/// One detail tier of a model
#[derive(Debug, Clone, Default)]
pub struct LevelOfDetail {
    /// Camera distance from which this tier may be used
    min_distance: f32,
    /// Animation keyframes for this tier
    frames: Vec<Frame>,
}

impl LevelOfDetail {
    /// Create a tier with the default distance threshold for its index
    pub fn new(tier: usize) -> Self {
        Self {
            min_distance: default_lod_distance(tier),
            frames: Vec::new(),
        }
    }

    /// Minimum camera distance for this tier
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Override the distance threshold
    pub fn set_min_distance(&mut self, distance: f32) {
        self.min_distance = distance;
    }

    /// Append a frame, returning its index
    pub fn add_frame(&mut self, frame: Frame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    /// One frame by index
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames of this tier
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_distance_progression() {
        assert_eq!(default_lod_distance(0), 5.0);
        assert_eq!(default_lod_distance(1), 10.0);
        assert_eq!(default_lod_distance(2), 15.0);
        // Strictly increasing
        for tier in 0..8 {
            assert!(default_lod_distance(tier) < default_lod_distance(tier + 1));
        }
    }

    #[test]
    fn test_distance_override() {
        let mut tier = LevelOfDetail::new(3);
        assert_eq!(tier.min_distance(), 20.0);
        tier.set_min_distance(7.5);
        assert_eq!(tier.min_distance(), 7.5);
    }
}
