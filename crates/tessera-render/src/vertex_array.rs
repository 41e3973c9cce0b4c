//! Vertex-Array Backend
//!
//! Binds the model's shared point array as a client-side vertex pointer
//! once per model, then issues one indexed draw per mesh tier from its
//! index cache. No device-resident resources are created.

use tessera_model::Model;

use crate::backend::{MeshRenderer, apply_surface, drawable_lod};
use crate::device::RenderDevice;
use crate::manager::ModelId;
use crate::payload::PayloadTables;

/// Stable selection name of this backend
pub const NAME: &str = "vertex-array";

/// Client-side vertex-array rendering strategy
#[derive(Debug, Default)]
pub struct VertexArrayRenderer {
    /// Registration-only tables; the index caches live on the meshes
    payloads: PayloadTables<(), (), ()>,
}

impl VertexArrayRenderer {
    /// Create the backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshRenderer for VertexArrayRenderer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.set_color([1.0, 1.0, 1.0, 1.0]);
    }

    fn stop_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.bind_vertex_pointer(&[]);
        device.bind_texture(None);
    }

    fn set_model(&mut self, device: &mut dyn RenderDevice, model: &Model, _id: ModelId) {
        device.bind_vertex_pointer(model.points());
    }

    fn render_mesh(
        &mut self,
        device: &mut dyn RenderDevice,
        model: &Model,
        _id: ModelId,
        mesh: usize,
        tier: usize,
        team_color: Option<[f32; 4]>,
    ) {
        let Some(mesh) = model.mesh(mesh) else {
            log::error!("model '{}' has no mesh {mesh}", model.name());
            return;
        };
        let Some(lod) = drawable_lod(mesh, tier) else {
            return;
        };
        apply_surface(device, model, mesh, team_color);
        device.draw_indexed(lod.primitive_kind(), lod.index_cache());
    }

    fn alloc_model_payload(&mut self, id: ModelId, _model: &Model) {
        self.payloads.insert_model(id, ());
    }

    fn alloc_mesh_payload(&mut self, id: ModelId, _model: &Model, mesh: usize) {
        self.payloads.insert_mesh(id, mesh, ());
    }

    fn alloc_lod_payload(&mut self, id: ModelId, _model: &Model, mesh: usize, tier: usize) {
        self.payloads.insert_lod(id, mesh, tier, ());
    }

    fn release_model_data(&mut self, _device: &mut dyn RenderDevice, id: ModelId) {
        self.payloads.remove_model(id);
    }
}
