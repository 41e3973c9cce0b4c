//! Immediate-Mode Backend
//!
//! Draws by submitting every cached point index as an individual vertex
//! between `begin`/`end`. Slowest strategy, zero setup cost, works on any
//! device; it is the fallback of last resort.

use tessera_model::Model;

use crate::backend::{MeshRenderer, apply_surface, drawable_lod};
use crate::device::RenderDevice;
use crate::manager::ModelId;
use crate::payload::PayloadTables;

/// Stable selection name of this backend
pub const NAME: &str = "immediate";

/// Immediate-mode rendering strategy
#[derive(Debug, Default)]
pub struct ImmediateRenderer {
    /// No per-level data is needed; the tables only track registration
    payloads: PayloadTables<(), (), ()>,
}

impl ImmediateRenderer {
    /// Create the backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshRenderer for ImmediateRenderer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.set_color([1.0, 1.0, 1.0, 1.0]);
    }

    fn stop_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.bind_texture(None);
    }

    fn set_model(&mut self, _device: &mut dyn RenderDevice, _model: &Model, _id: ModelId) {
        // No bulk state; every vertex is pushed individually.
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

        let points = model.points();
        device.begin(lod.primitive_kind());
        for &index in lod.index_cache() {
            match points.get(index as usize) {
                Some(vertex) => device.emit_vertex(vertex),
                None => {
                    log::error!(
                        "model '{}': cached index {index} outside point array ({})",
                        model.name(),
                        points.len()
                    );
                    break;
                }
            }
        }
        device.end();
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
