//! Model Aggregate
//!
//! The top-level owner of everything a drawable object type needs:
//! materials, meshes, detail tiers with their frames and distance
//! thresholds, the shared point array and the animation-mode table.
//!
//! A loader populates the model through the `add_*`/`set_*` calls, then
//! seals it with [`Model::finish_loading`], which validates references,
//! merges per-mesh point storage into the shared array and connects every
//! tier's topology. After that the point array is read-only.

use crate::animation::{AnimationMode, AnimationTable};
use crate::frame::Frame;
use crate::lod::LevelOfDetail;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::vertex::Vertex;
use crate::{ModelError, ModelResult};

/// Top-level aggregate for one drawable object type
#[derive(Debug, Clone)]
pub struct Model {
    /// Model name
    name: String,
    /// Materials referenced by meshes
    materials: Vec<Material>,
    /// Named geometric units
    meshes: Vec<Mesh>,
    /// Detail tiers, index 0 is full detail
    lods: Vec<LevelOfDetail>,
    /// Shared point array, filled by [`Model::finish_loading`]
    points: Vec<Vertex>,
    /// Animation-mode table
    animations: AnimationTable,
    /// Whether loading has been sealed
    loaded: bool,
}

impl Model {
    /// Create an empty model with the given number of detail tiers
    pub fn new(name: impl Into<String>, lod_count: usize) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
            meshes: Vec::new(),
            lods: (0..lod_count).map(LevelOfDetail::new).collect(),
            points: Vec::new(),
            animations: AnimationTable::new(0),
            loaded: false,
        }
    }

    /// Model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether [`Model::finish_loading`] has run
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Append a material, returning its index
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// One material by index
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// All materials
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Append a mesh, returning its index
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// One mesh by index
    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    /// Mutable mesh access for loaders (before sealing)
    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        self.meshes.get_mut(index)
    }

    /// All meshes
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Number of detail tiers
    pub fn lod_count(&self) -> usize {
        self.lods.len()
    }

    /// One detail tier
    pub fn lod(&self, tier: usize) -> Option<&LevelOfDetail> {
        self.lods.get(tier)
    }

    /// All detail tiers
    pub fn lods(&self) -> &[LevelOfDetail] {
        &self.lods
    }

    /// Override the distance threshold of one tier
    pub fn set_lod_distance(&mut self, tier: usize, distance: f32) -> ModelResult<()> {
        let count = self.lods.len();
        match self.lods.get_mut(tier) {
            Some(lod) => {
                lod.set_min_distance(distance);
                Ok(())
            }
            None => {
                log::error!("model '{}': no detail tier {tier} ({count} tiers)", self.name);
                Err(ModelError::InvalidLodTier { tier, count })
            }
        }
    }

    /// Pick the detail tier for a camera distance.
    ///
    /// Linear scan from the coarsest tier downward; the first tier whose
    /// minimum distance is within range wins, tier 0 is the fallback.
    pub fn preferred_lod(&self, distance: f32) -> usize {
        for tier in (0..self.lods.len()).rev() {
            if self.lods[tier].min_distance() <= distance {
                return tier;
            }
        }
        0
    }

    /// Append a frame to one detail tier.
    ///
    /// Instances referencing a mesh the model does not have are a
    /// precondition violation: logged, nothing stored.
    pub fn add_frame(&mut self, tier: usize, frame: Frame) -> ModelResult<usize> {
        let mesh_count = self.meshes.len();
        if let Some(mesh) = frame.max_mesh_index() {
            if mesh >= mesh_count {
                log::error!(
                    "model '{}': frame references mesh {mesh} but model has {mesh_count}",
                    self.name
                );
                return Err(ModelError::InvalidMeshInstance {
                    mesh,
                    count: mesh_count,
                });
            }
        }
        let count = self.lods.len();
        match self.lods.get_mut(tier) {
            Some(lod) => Ok(lod.add_frame(frame)),
            None => {
                log::error!("model '{}': no detail tier {tier} ({count} tiers)", self.name);
                Err(ModelError::InvalidLodTier { tier, count })
            }
        }
    }

    /// The shared point array (empty until the model is sealed)
    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    /// The animation-mode table
    pub fn animations(&self) -> &AnimationTable {
        &self.animations
    }

    /// Register an animation mode; invalid ranges are rejected
    pub fn insert_animation_mode(&mut self, mode: i32, range: AnimationMode) -> bool {
        self.animations.insert(mode, range)
    }

    /// Resolve an animation mode, falling back to mode 0
    pub fn animation(&self, mode: i32) -> AnimationMode {
        self.animations.get(mode)
    }

    /// Seal the model: validate references, connect every tier's topology
    /// and merge per-mesh points into the shared array.
    ///
    /// On error the model must not be rendered; on success the point array
    /// is treated as read-only from here on.
    pub fn finish_loading(&mut self) -> ModelResult<()> {
        if self.loaded {
            log::warn!("model '{}' already finished loading", self.name);
            return Ok(());
        }

        let material_count = self.materials.len();
        for mesh in &self.meshes {
            if let Some(material) = mesh.material() {
                if material >= material_count {
                    log::error!(
                        "model '{}': mesh '{}' references material {material} \
                         but model has {material_count}",
                        self.name,
                        mesh.name()
                    );
                    return Err(ModelError::InvalidMaterialReference {
                        mesh: mesh.name().to_string(),
                        material,
                        count: material_count,
                    });
                }
            } else if mesh.is_teamcolored() {
                log::warn!(
                    "model '{}': teamcolor mesh '{}' has no material",
                    self.name,
                    mesh.name()
                );
            }
            if mesh.point_count() == 0 {
                log::warn!(
                    "model '{}': mesh '{}' has no points",
                    self.name,
                    mesh.name()
                );
            }
            if mesh.lods().iter().all(|lod| lod.face_count() == 0) {
                log::warn!(
                    "model '{}': mesh '{}' has no faces",
                    self.name,
                    mesh.name()
                );
            }
        }

        for mesh in &mut self.meshes {
            mesh.connect_all().inspect_err(|e| {
                log::error!(
                    "model '{}': mesh '{}' failed to connect: {e}",
                    self.name,
                    mesh.name()
                );
            })?;
            let offset = self.points.len() as u32;
            self.points.extend(mesh.relocate(offset));
        }

        let frame_count = self.lods.first().map(LevelOfDetail::frame_count).unwrap_or(0);
        self.animations.reset_fallback_span(frame_count);

        self.loaded = true;
        Ok(())
    }
}
