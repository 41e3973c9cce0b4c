//! Animation Frames
//!
//! A frame places mesh instances: `(mesh index, matrix)` pairs, one per
//! instance. A single mesh may appear several times with different matrices
//! (four wheels sharing one wheel mesh). Advancing animation just selects a
//! different frame and/or updates instance matrices.

use glam::Mat4;

/// One placed mesh within a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    /// Index into the owning model's mesh array
    pub mesh: usize,
    /// Instance transform
    pub matrix: Mat4,
}

impl MeshInstance {
    /// Place a mesh with the given transform
    pub fn new(mesh: usize, matrix: Mat4) -> Self {
        Self { mesh, matrix }
    }
}

/// One animation keyframe: an ordered list of mesh instances
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    instances: Vec<MeshInstance>,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh instance
    pub fn add_instance(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    /// The placed instances in order
    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// Number of placed instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Largest mesh index referenced by any instance
    pub fn max_mesh_index(&self) -> Option<usize> {
        self.instances.iter().map(|i| i.mesh).max()
    }
}
