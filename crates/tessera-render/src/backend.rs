//! Renderer Backend Contract
//!
//! The strategy interface every rendering backend implements. The manager
//! drives the backend-private payload lifecycle through the provided
//! `attach_model`/`detach_model` methods, which guarantee the allocation
//! order backends rely on: model-level payload first, then each mesh's
//! payload followed by that mesh's LOD payloads; the `init_model_data`
//! customization hook only runs once all three levels exist.

use tessera_model::{Mesh, MeshLod, Model};

use crate::device::RenderDevice;
use crate::manager::ModelId;

/// Fallback player color for team-colored meshes when the caller supplies
/// none
pub const DEFAULT_TEAM_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// A mesh-rendering strategy
pub trait MeshRenderer {
    /// Stable backend name used for selection
    fn name(&self) -> &'static str;

    /// Set up backend-global state before a batch of model draws
    fn start_model_rendering(&mut self, device: &mut dyn RenderDevice);

    /// Tear down backend-global state after a batch of model draws
    fn stop_model_rendering(&mut self, device: &mut dyn RenderDevice);

    /// Prepare bulk state for one model before its meshes are drawn
    fn set_model(&mut self, device: &mut dyn RenderDevice, model: &Model, id: ModelId);

    /// Draw one mesh at one detail tier.
    ///
    /// A tier with an empty index cache draws nothing.
    fn render_mesh(
        &mut self,
        device: &mut dyn RenderDevice,
        model: &Model,
        id: ModelId,
        mesh: usize,
        tier: usize,
        team_color: Option<[f32; 4]>,
    );

    /// Allocate the model-level payload slot
    fn alloc_model_payload(&mut self, id: ModelId, model: &Model);

    /// Allocate one mesh-level payload slot
    fn alloc_mesh_payload(&mut self, id: ModelId, model: &Model, mesh: usize);

    /// Allocate one mesh-LOD-level payload slot
    fn alloc_lod_payload(&mut self, id: ModelId, model: &Model, mesh: usize, tier: usize);

    /// Customization hook run once every payload slot of the model exists
    fn init_model_data(&mut self, _device: &mut dyn RenderDevice, _model: &Model, _id: ModelId) {}

    /// Release every payload of one model, including device resources
    fn release_model_data(&mut self, _device: &mut dyn RenderDevice, _id: ModelId) {}

    /// Register a model with this backend.
    ///
    /// Provided; drives the payload hooks in the guaranteed order. Backends
    /// implement the hooks, not this.
    fn attach_model(&mut self, device: &mut dyn RenderDevice, model: &Model, id: ModelId) {
        self.alloc_model_payload(id, model);
        for mesh in 0..model.meshes().len() {
            self.alloc_mesh_payload(id, model, mesh);
            for tier in 0..model.meshes()[mesh].lod_count() {
                self.alloc_lod_payload(id, model, mesh, tier);
            }
        }
        self.init_model_data(device, model, id);
    }

    /// Unregister a model from this backend, releasing all of its payloads
    fn detach_model(&mut self, device: &mut dyn RenderDevice, id: ModelId) {
        self.release_model_data(device, id);
    }
}

/// Resolve the drawable tier of a mesh, or `None` when there is nothing to
/// draw (missing tier or empty index cache)
pub(crate) fn drawable_lod(mesh: &Mesh, tier: usize) -> Option<&MeshLod> {
    let lod = mesh.lod(tier)?;
    if lod.index_cache().is_empty() {
        return None;
    }
    Some(lod)
}

/// Apply surface state shared by all backends: the player color for
/// team-colored meshes, otherwise the material's diffuse color and texture
pub(crate) fn apply_surface(
    device: &mut dyn RenderDevice,
    model: &Model,
    mesh: &Mesh,
    team_color: Option<[f32; 4]>,
) {
    if mesh.is_teamcolored() {
        device.bind_texture(None);
        device.set_color(team_color.unwrap_or(DEFAULT_TEAM_COLOR));
        return;
    }
    match mesh.material().and_then(|index| model.material(index)) {
        Some(material) => {
            device.set_color(material.diffuse.to_array());
            device.bind_texture(material.texture_handle);
        }
        None => {
            device.bind_texture(None);
            device.set_color([1.0, 1.0, 1.0, 1.0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceCall, RecordingDevice};
    use tessera_model::{Face, Material, Vertex};

    fn textured_model() -> Model {
        let mut model = Model::new("m", 1);
        let mut material = Material::new("skin");
        material.texture_handle = Some(7);
        let index = model.add_material(material);

        let mut mesh = Mesh::new("body");
        mesh.set_vertices(vec![Vertex::default(); 3]);
        mesh.add_lod(vec![Face::new(0, 1, 2)]);
        mesh.set_material(index);
        model.add_mesh(mesh);

        let mut team = Mesh::new("flag");
        team.set_vertices(vec![Vertex::default(); 3]);
        team.add_lod(vec![Face::new(0, 1, 2)]);
        team.set_material(index);
        team.set_teamcolor(true);
        model.add_mesh(team);

        model.finish_loading().unwrap();
        model
    }

    #[test]
    fn test_apply_surface_material() {
        let model = textured_model();
        let mut device = RecordingDevice::default();
        apply_surface(&mut device, &model, &model.meshes()[0], None);
        assert!(device.calls().contains(&DeviceCall::BindTexture(Some(7))));
    }

    #[test]
    fn test_apply_surface_team_color() {
        let model = textured_model();
        let mut device = RecordingDevice::default();
        let color = [0.0, 0.5, 1.0, 1.0];
        apply_surface(&mut device, &model, &model.meshes()[1], Some(color));
        // Team color replaces the texture.
        assert!(device.calls().contains(&DeviceCall::BindTexture(None)));
        assert!(device.calls().contains(&DeviceCall::SetColor(color)));
    }

    #[test]
    fn test_drawable_lod_filters_empty() {
        let model = textured_model();
        assert!(drawable_lod(&model.meshes()[0], 0).is_some());
        assert!(drawable_lod(&model.meshes()[0], 3).is_none());

        let empty = Mesh::new("empty");
        assert!(drawable_lod(&empty, 0).is_none());
    }
}
