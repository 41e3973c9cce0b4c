//! Buffer-Object Backend
//!
//! Uploads each model's shared point array into one device vertex buffer
//! and every mesh tier's index cache into its own index buffer, then draws
//! straight from device memory. Requires buffer-object support; the factory
//! refuses construction on devices without it, so the manager never
//! switches to this backend only to degrade mid-frame.

use tessera_model::Model;

use crate::backend::{MeshRenderer, apply_surface, drawable_lod};
use crate::device::{BufferId, DeviceCapabilities, RenderDevice};
use crate::manager::ModelId;
use crate::payload::PayloadTables;
use crate::{RenderError, RenderResult};

/// Stable selection name of this backend
pub const NAME: &str = "buffer-object";

/// GPU buffer-object rendering strategy.
///
/// Model payload: the shared vertex buffer. Mesh payload: nothing beyond
/// registration. Mesh-LOD payload: the tier's index buffer (absent for
/// empty tiers).
#[derive(Debug, Default)]
pub struct BufferObjectRenderer {
    payloads: PayloadTables<Option<BufferId>, (), Option<BufferId>>,
}

impl BufferObjectRenderer {
    /// Create the backend; fails on devices without buffer objects
    pub fn new(capabilities: &DeviceCapabilities) -> RenderResult<Self> {
        if !capabilities.buffer_objects {
            return Err(RenderError::UnsupportedBackend(NAME.to_string()));
        }
        Ok(Self::default())
    }
}

impl MeshRenderer for BufferObjectRenderer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.set_color([1.0, 1.0, 1.0, 1.0]);
    }

    fn stop_model_rendering(&mut self, device: &mut dyn RenderDevice) {
        device.bind_vertex_buffer(None);
        device.bind_texture(None);
    }

    fn set_model(&mut self, device: &mut dyn RenderDevice, model: &Model, id: ModelId) {
        match self.payloads.model(id) {
            Some(Some(vertices)) => device.bind_vertex_buffer(Some(*vertices)),
            _ => log::error!(
                "model '{}' ({id}) has no vertex buffer; was it attached?",
                model.name()
            ),
        }
    }

    fn render_mesh(
        &mut self,
        device: &mut dyn RenderDevice,
        model: &Model,
        id: ModelId,
        mesh: usize,
        tier: usize,
        team_color: Option<[f32; 4]>,
    ) {
        let Some(mesh_data) = model.mesh(mesh) else {
            log::error!("model '{}' has no mesh {mesh}", model.name());
            return;
        };
        let Some(lod) = drawable_lod(mesh_data, tier) else {
            return;
        };
        let Some(Some(indices)) = self.payloads.lod(id, mesh, tier) else {
            log::error!(
                "model '{}' ({id}) mesh {mesh} tier {tier} has no index buffer",
                model.name()
            );
            return;
        };
        apply_surface(device, model, mesh_data, team_color);
        device.draw_indexed_buffer(lod.primitive_kind(), *indices, lod.index_cache().len());
    }

    fn alloc_model_payload(&mut self, id: ModelId, _model: &Model) {
        self.payloads.insert_model(id, None);
    }

    fn alloc_mesh_payload(&mut self, id: ModelId, _model: &Model, mesh: usize) {
        self.payloads.insert_mesh(id, mesh, ());
    }

    fn alloc_lod_payload(&mut self, id: ModelId, _model: &Model, mesh: usize, tier: usize) {
        self.payloads.insert_lod(id, mesh, tier, None);
    }

    fn init_model_data(&mut self, device: &mut dyn RenderDevice, model: &Model, id: ModelId) {
        // Every payload slot exists by now; fill them with device buffers.
        let vertices = device.create_vertex_buffer(model.points());
        if let Some(slot) = self.payloads.model_mut(id) {
            *slot = Some(vertices);
        }
        for (mesh_index, mesh) in model.meshes().iter().enumerate() {
            for (tier, lod) in mesh.lods().iter().enumerate() {
                if lod.index_cache().is_empty() {
                    continue;
                }
                let indices = device.create_index_buffer(lod.index_cache());
                if let Some(slot) = self.payloads.lod_mut(id, mesh_index, tier) {
                    *slot = Some(indices);
                }
            }
        }
    }

    fn release_model_data(&mut self, device: &mut dyn RenderDevice, id: ModelId) {
        let removed = self.payloads.remove_model(id);
        if let Some(Some(vertices)) = removed.model {
            device.delete_buffer(vertices);
        }
        for indices in removed.lods.into_iter().flatten() {
            device.delete_buffer(indices);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCall, RecordingDevice};
    use tessera_model::{Face, Mesh, PrimitiveKind, Vertex};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn two_tier_model() -> Model {
        let mut model = Model::new("m", 2);
        let mut mesh = Mesh::new("body");
        mesh.set_vertices(vec![Vertex::default(); 4]);
        mesh.add_lod(vec![Face::new(0, 1, 2), Face::new(1, 2, 3)]);
        mesh.add_lod(vec![Face::new(0, 1, 3)]);
        model.add_mesh(mesh);
        model.finish_loading().unwrap();
        model
    }

    #[test]
    fn test_construction_requires_capability() {
        let unsupported = DeviceCapabilities::default();
        assert!(matches!(
            BufferObjectRenderer::new(&unsupported),
            Err(RenderError::UnsupportedBackend(_))
        ));
        let supported = DeviceCapabilities {
            buffer_objects: true,
        };
        assert!(BufferObjectRenderer::new(&supported).is_ok());
    }

    #[test]
    fn test_attach_uploads_buffers() {
        init_logging();
        let model = two_tier_model();
        let mut device = RecordingDevice::with_buffer_objects();
        let mut backend = BufferObjectRenderer::new(&device.capabilities()).unwrap();
        let id = ModelId::from_raw(1);

        backend.attach_model(&mut device, &model, id);
        // One vertex buffer plus one index buffer per non-empty tier.
        assert_eq!(device.live_buffer_count(), 3);
        assert!(matches!(backend.payloads.model(id), Some(Some(_))));
        assert!(matches!(backend.payloads.lod(id, 0, 0), Some(Some(_))));
        assert!(matches!(backend.payloads.lod(id, 0, 1), Some(Some(_))));
    }

    #[test]
    fn test_render_draws_from_buffers() {
        let model = two_tier_model();
        let mut device = RecordingDevice::with_buffer_objects();
        let mut backend = BufferObjectRenderer::new(&device.capabilities()).unwrap();
        let id = ModelId::from_raw(1);

        backend.attach_model(&mut device, &model, id);
        backend.set_model(&mut device, &model, id);
        backend.render_mesh(&mut device, &model, id, 0, 0, None);

        let draw = device
            .calls()
            .iter()
            .find(|c| matches!(c, DeviceCall::DrawIndexedBuffer { .. }));
        match draw {
            Some(DeviceCall::DrawIndexedBuffer {
                primitive, count, ..
            }) => {
                assert_eq!(*primitive, PrimitiveKind::TriangleList);
                assert_eq!(*count, 6);
            }
            other => panic!("unexpected draw {other:?}"),
        }
    }

    #[test]
    fn test_release_deletes_all_buffers() {
        let model = two_tier_model();
        let mut device = RecordingDevice::with_buffer_objects();
        let mut backend = BufferObjectRenderer::new(&device.capabilities()).unwrap();
        let id = ModelId::from_raw(1);

        backend.attach_model(&mut device, &model, id);
        assert_eq!(device.live_buffer_count(), 3);
        backend.detach_model(&mut device, id);
        assert_eq!(device.live_buffer_count(), 0);
        assert!(backend.payloads.is_empty());
    }
}
