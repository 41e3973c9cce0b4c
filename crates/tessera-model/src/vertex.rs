//! Shared Point Array Element
//!
//! One entry of the interleaved per-vertex attribute buffer that a model
//! shares across all of its meshes: position, normal and texture coordinate.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Number of floats one vertex occupies in the interleaved layout
pub const FLOATS_PER_VERTEX: usize = 8;

/// Interleaved vertex attributes (position, normal, texel)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: Vec3,
    /// Unit normal
    pub normal: Vec3,
    /// Texture coordinate
    pub texel: Vec2,
}

impl Vertex {
    /// Create a vertex from its three attributes
    pub fn new(position: Vec3, normal: Vec3, texel: Vec2) -> Self {
        Self {
            position,
            normal,
            texel,
        }
    }

    /// Create a vertex from a position only, with zeroed normal and texel
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
