//! Mesh and Per-Tier Geometry
//!
//! A mesh is a named geometric unit: a slice of the model's shared point
//! array, a material reference, a team-color flag and one [`MeshLod`] per
//! detail tier. Each tier owns its own faces, node chain and index cache;
//! tiers share nothing but the mesh's point range.

use std::ops::Range;

use crate::cache::build_index_cache;
use crate::face::Face;
use crate::topology::{PrimitiveKind, Topology};
use crate::vertex::Vertex;
use crate::{ModelError, ModelResult};

/// One detail tier of a mesh: faces, node chain and index cache
#[derive(Debug, Clone, Default)]
pub struct MeshLod {
    /// Faces over the owning mesh's point range
    faces: Vec<Face>,
    /// Connected chain, rebuilt by [`MeshLod::connect`]
    topology: Topology,
    /// Flattened point indices for indexed drawing
    index_cache: Vec<u32>,
}

impl MeshLod {
    /// Create an unconnected tier from loader-supplied faces
    pub fn new(faces: Vec<Face>) -> Self {
        Self {
            faces,
            topology: Topology::default(),
            index_cache: Vec::new(),
        }
    }

    /// Faces of this tier
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The connected chain
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// How this tier renders once connected
    pub fn primitive_kind(&self) -> PrimitiveKind {
        self.topology.kind()
    }

    /// The flattened index cache
    pub fn index_cache(&self) -> &[u32] {
        &self.index_cache
    }

    /// Validate point references and connect the faces into a chain.
    ///
    /// A face referencing a point outside `points` is a construction
    /// failure; the tier is left unconnected and renders as empty.
    pub fn connect(&mut self, points: Range<u32>) -> ModelResult<()> {
        for face in &self.faces {
            for point in face.point_indices() {
                if !points.contains(&point) {
                    return Err(ModelError::FaceIndexOutOfRange {
                        point,
                        start: points.start,
                        end: points.end,
                    });
                }
            }
        }
        self.topology = Topology::connect(&self.faces);
        self.index_cache = build_index_cache(&self.topology, &self.faces);
        Ok(())
    }

    /// Relocate this tier's point references by a fixed offset and rebuild
    /// the index cache so cached indices stay consistent
    pub fn offset_points(&mut self, offset: u32) {
        for face in &mut self.faces {
            face.offset_points(offset);
        }
        self.topology.offset_relevant_points(offset);
        self.index_cache = build_index_cache(&self.topology, &self.faces);
    }
}

/// A named geometric unit of a model
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Mesh name
    name: String,
    /// Index into the owning model's material array
    material: Option<usize>,
    /// Render with the player color instead of a texture
    teamcolor: bool,
    /// Loader-supplied vertices, drained when the model merges point storage
    vertices: Vec<Vertex>,
    /// Offset of this mesh's points in the model's shared array
    point_offset: u32,
    /// Number of points owned by this mesh
    point_count: u32,
    /// One entry per detail tier
    lods: Vec<MeshLod>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Mesh name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Material index into the owning model, if assigned
    pub fn material(&self) -> Option<usize> {
        self.material
    }

    /// Assign the material index
    pub fn set_material(&mut self, material: usize) {
        self.material = Some(material);
    }

    /// Whether this mesh renders with the player color
    pub fn is_teamcolored(&self) -> bool {
        self.teamcolor
    }

    /// Set the team-color flag
    pub fn set_teamcolor(&mut self, teamcolor: bool) {
        self.teamcolor = teamcolor;
    }

    /// Assign loader-supplied vertex storage
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.point_count = vertices.len() as u32;
        self.vertices = vertices;
    }

    /// Vertices still held locally (empty once merged into the model)
    pub fn local_vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Offset of this mesh's points in the shared point array
    pub fn point_offset(&self) -> u32 {
        self.point_offset
    }

    /// Number of points owned by this mesh
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// The range of shared-array indices this mesh's faces may reference
    pub fn point_range(&self) -> Range<u32> {
        self.point_offset..self.point_offset + self.point_count
    }

    /// Append a detail tier, returning its index
    pub fn add_lod(&mut self, faces: Vec<Face>) -> usize {
        self.lods.push(MeshLod::new(faces));
        self.lods.len() - 1
    }

    /// One detail tier
    pub fn lod(&self, tier: usize) -> Option<&MeshLod> {
        self.lods.get(tier)
    }

    /// All detail tiers
    pub fn lods(&self) -> &[MeshLod] {
        &self.lods
    }

    /// Number of detail tiers
    pub fn lod_count(&self) -> usize {
        self.lods.len()
    }

    /// Connect every tier against the mesh's local point range
    pub(crate) fn connect_all(&mut self) -> ModelResult<()> {
        let points = 0..self.point_count;
        for lod in &mut self.lods {
            lod.connect(points.clone())?;
        }
        Ok(())
    }

    /// Move this mesh's vertices out for merging into the shared array and
    /// rebase every tier onto the given offset
    pub(crate) fn relocate(&mut self, offset: u32) -> Vec<Vertex> {
        self.point_offset = offset;
        for lod in &mut self.lods {
            lod.offset_points(offset);
        }
        std::mem::take(&mut self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn quad_mesh() -> Mesh {
        let mut mesh = Mesh::new("quad");
        mesh.set_vertices(
            (0..4)
                .map(|i| Vertex::from_position(Vec3::splat(i as f32)))
                .collect(),
        );
        mesh.add_lod(vec![Face::new(0, 1, 2), Face::new(1, 2, 3)]);
        mesh
    }

    #[test]
    fn test_connect_validates_point_range() {
        let mut lod = MeshLod::new(vec![Face::new(0, 1, 7)]);
        let err = lod.connect(0..4).unwrap_err();
        match err {
            ModelError::FaceIndexOutOfRange { point, start, end } => {
                assert_eq!((point, start, end), (7, 0, 4));
            }
            other => panic!("unexpected error: {other}"),
        }
        // The failed tier stays unconnected and renders as empty.
        assert!(lod.index_cache().is_empty());
    }

    #[test]
    fn test_connect_builds_cache() {
        let mut mesh = quad_mesh();
        mesh.connect_all().unwrap();
        let lod = mesh.lod(0).unwrap();
        // Two faces chain as a list: three indices per node.
        assert_eq!(lod.primitive_kind(), PrimitiveKind::TriangleList);
        assert_eq!(lod.index_cache().len(), 6);
    }

    #[test]
    fn test_offset_points_shifts_cache_uniformly() {
        let mut mesh = quad_mesh();
        mesh.connect_all().unwrap();
        let before = mesh.lod(0).unwrap().index_cache().to_vec();

        let vertices = mesh.relocate(100);
        assert_eq!(vertices.len(), 4);
        assert!(mesh.local_vertices().is_empty());
        assert_eq!(mesh.point_range(), 100..104);

        let after = mesh.lod(0).unwrap().index_cache();
        assert_eq!(after.len(), before.len());
        for (a, b) in after.iter().zip(&before) {
            assert_eq!(*a, *b + 100);
        }
    }

    #[test]
    fn test_offset_points_shifts_strip_cache_uniformly() {
        let mut mesh = Mesh::new("ribbon");
        mesh.set_vertices(
            (0..6)
                .map(|i| Vertex::from_position(Vec3::splat(i as f32)))
                .collect(),
        );
        mesh.add_lod(
            (0..4u32).map(|i| Face::new(i, i + 1, i + 2)).collect(),
        );
        mesh.connect_all().unwrap();
        assert_eq!(
            mesh.lod(0).unwrap().primitive_kind(),
            PrimitiveKind::TriangleStrip
        );
        let before = mesh.lod(0).unwrap().index_cache().to_vec();

        mesh.relocate(42);
        let after = mesh.lod(0).unwrap().index_cache();
        for (a, b) in after.iter().zip(&before) {
            assert_eq!(*a, *b + 42);
        }
    }

    #[test]
    fn test_tiers_are_independent() {
        let mut mesh = quad_mesh();
        mesh.add_lod(vec![Face::new(0, 1, 3)]);
        mesh.connect_all().unwrap();
        assert_eq!(mesh.lod_count(), 2);
        assert_eq!(mesh.lod(0).unwrap().face_count(), 2);
        assert_eq!(mesh.lod(1).unwrap().face_count(), 1);
        assert_eq!(mesh.lod(1).unwrap().index_cache().len(), 3);
    }
}
