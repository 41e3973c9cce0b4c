//! # Tessera Model
//!
//! In-memory 3D model representation for the Tessera engine:
//! - **Geometry model**: materials, faces, meshes, frames and detail tiers
//! - **Strip-connectivity topology**: backtracking search that chains an
//!   unordered face set into a triangle strip, with a triangle-list fallback
//! - **Point/index cache**: flattened indices for indexed drawing, rebuilt
//!   on reconnection and point relocation
//! - **Model aggregate**: shared point array, LOD distance thresholds and
//!   the animation-mode table
//!
//! Loaders for concrete file formats, texture resolution and the rendering
//! backends live outside this crate; see `tessera-render` for the latter.

use thiserror::Error;

pub mod animation;
pub mod cache;
pub mod face;
pub mod frame;
pub mod lod;
pub mod material;
pub mod mesh;
pub mod model;
pub mod topology;
pub mod vertex;

pub use animation::{AnimationMode, AnimationTable, DEFAULT_MODE};
pub use cache::build_index_cache;
pub use face::Face;
pub use frame::{Frame, MeshInstance};
pub use lod::{LevelOfDetail, default_lod_distance};
pub use material::Material;
pub use mesh::{Mesh, MeshLod};
pub use model::Model;
pub use topology::{Node, PrimitiveKind, RelevantPoint, Topology, build_adjacency};
pub use vertex::{FLOATS_PER_VERTEX, Vertex};

/// Model construction errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("face references point {point} outside range {start}..{end}")]
    FaceIndexOutOfRange { point: u32, start: u32, end: u32 },

    #[error("mesh '{mesh}' references material {material} but model has {count}")]
    InvalidMaterialReference {
        mesh: String,
        material: usize,
        count: usize,
    },

    #[error("frame instance references mesh {mesh} but model has {count}")]
    InvalidMeshInstance { mesh: usize, count: usize },

    #[error("detail tier {tier} out of range ({count} tiers)")]
    InvalidLodTier { tier: usize, count: usize },
}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
