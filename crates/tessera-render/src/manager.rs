//! Renderer Manager
//!
//! Owns the render device, the backend registry and the single
//! active-backend slot, plus the registry of live models. Switching
//! backends is one synchronous sweep: every model's payloads are released
//! from the old backend before any are allocated on the new one, so mixed
//! payload state is never observable. A failed switch leaves the previous
//! backend active and untouched.

use std::sync::Arc;

use ahash::AHashMap;
use tessera_model::Model;

use crate::backend::MeshRenderer;
use crate::buffer_object::BufferObjectRenderer;
use crate::device::{DeviceCapabilities, RenderDevice};
use crate::immediate::ImmediateRenderer;
use crate::vertex_array::VertexArrayRenderer;
use crate::{RenderError, RenderResult, buffer_object, immediate, vertex_array};

/// Identity of a model registered with the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(u64);

impl ModelId {
    /// Wrap a raw id (the manager assigns these)
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// Constructor for one backend; may fail when the device lacks a required
/// capability
pub type BackendFactory =
    Box<dyn Fn(&DeviceCapabilities) -> RenderResult<Box<dyn MeshRenderer>>>;

struct BackendEntry {
    name: String,
    factory: BackendFactory,
}

/// Owner of the active rendering strategy and the live-model registry
pub struct RendererManager {
    device: Box<dyn RenderDevice>,
    backends: Vec<BackendEntry>,
    current: Option<Box<dyn MeshRenderer>>,
    models: AHashMap<ModelId, Arc<Model>>,
    next_model: u64,
}

impl RendererManager {
    /// Create a manager over the given device with the built-in backends
    /// registered, most capable first
    pub fn new(device: Box<dyn RenderDevice>) -> Self {
        let mut manager = Self {
            device,
            backends: Vec::new(),
            current: None,
            models: AHashMap::new(),
            next_model: 1,
        };
        manager.register_backend(buffer_object::NAME, |caps| {
            Ok(Box::new(BufferObjectRenderer::new(caps)?))
        });
        manager.register_backend(vertex_array::NAME, |_| {
            Ok(Box::new(VertexArrayRenderer::new()))
        });
        manager.register_backend(immediate::NAME, |_| {
            Ok(Box::new(ImmediateRenderer::new()))
        });
        manager
    }

    /// Register a backend factory under a selection name.
    ///
    /// Registration order is the auto-selection priority for
    /// [`RendererManager::check_current_or_default`].
    pub fn register_backend<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&DeviceCapabilities) -> RenderResult<Box<dyn MeshRenderer>> + 'static,
    {
        let name = name.into();
        if self.backends.iter().any(|entry| entry.name == name) {
            log::warn!("renderer backend '{name}' registered twice; keeping the first");
            return;
        }
        self.backends.push(BackendEntry {
            name,
            factory: Box::new(factory),
        });
    }

    /// Names of every registered backend, in priority order
    pub fn available_backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Name of the active backend, if any
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|backend| backend.name())
    }

    /// The render device
    pub fn device(&self) -> &dyn RenderDevice {
        self.device.as_ref()
    }

    /// Activate a backend by name.
    ///
    /// On any failure (unknown name, capability refused) the previous
    /// backend stays active with all of its payloads intact.
    pub fn make_current(&mut self, name: &str) -> RenderResult<()> {
        if self.current_name() == Some(name) {
            return Ok(());
        }
        let capabilities = self.device.capabilities();
        let Some(entry) = self.backends.iter().find(|entry| entry.name == name) else {
            log::error!("unknown renderer backend '{name}'");
            return Err(RenderError::UnknownBackend(name.to_string()));
        };
        let backend = (entry.factory)(&capabilities).inspect_err(|e| {
            log::warn!(
                "renderer backend '{name}' unavailable ({e}); staying on {:?}",
                self.current_name()
            );
        })?;
        self.swap_in(backend);
        Ok(())
    }

    /// Make sure some backend is active, trying registered backends in
    /// priority order; used as a lazy guard before rendering
    pub fn check_current_or_default(&mut self) -> RenderResult<()> {
        if self.current.is_some() {
            return Ok(());
        }
        let capabilities = self.device.capabilities();
        for index in 0..self.backends.len() {
            match (self.backends[index].factory)(&capabilities) {
                Ok(backend) => {
                    self.swap_in(backend);
                    return Ok(());
                }
                Err(e) => {
                    log::debug!(
                        "default candidate '{}' unavailable: {e}",
                        self.backends[index].name
                    );
                }
            }
        }
        log::error!("no renderer backend could be activated");
        Err(RenderError::NoBackendAvailable)
    }

    /// Install a constructed backend: drain the old backend's payloads for
    /// every model, then attach them all to the new one
    fn swap_in(&mut self, mut backend: Box<dyn MeshRenderer>) {
        if let Some(mut previous) = self.current.take() {
            for &id in self.models.keys() {
                previous.detach_model(self.device.as_mut(), id);
            }
        }
        for (&id, model) in &self.models {
            backend.attach_model(self.device.as_mut(), model, id);
        }
        log::info!("renderer backend '{}' active", backend.name());
        self.current = Some(backend);
    }

    /// Register a live model, returning its identity.
    ///
    /// When a backend is active the model's payloads are initialized
    /// immediately.
    pub fn add_model(&mut self, model: Arc<Model>) -> ModelId {
        let id = ModelId::from_raw(self.next_model);
        self.next_model += 1;
        if let Some(backend) = &mut self.current {
            backend.attach_model(self.device.as_mut(), &model, id);
        }
        self.models.insert(id, model);
        id
    }

    /// Unregister a model, releasing its backend payloads
    pub fn remove_model(&mut self, id: ModelId) -> bool {
        if self.models.remove(&id).is_none() {
            log::warn!("removing unregistered {id}");
            return false;
        }
        if let Some(backend) = &mut self.current {
            backend.detach_model(self.device.as_mut(), id);
        }
        true
    }

    /// A registered model
    pub fn model(&self, id: ModelId) -> Option<&Arc<Model>> {
        self.models.get(&id)
    }

    /// Number of registered models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Open a batch of model draws (lazily activating a default backend)
    pub fn start_model_rendering(&mut self) -> RenderResult<()> {
        self.check_current_or_default()?;
        if let Some(backend) = &mut self.current {
            backend.start_model_rendering(self.device.as_mut());
        }
        Ok(())
    }

    /// Close a batch of model draws
    pub fn stop_model_rendering(&mut self) {
        if let Some(backend) = &mut self.current {
            backend.stop_model_rendering(self.device.as_mut());
        }
    }

    /// Draw one model: pick the detail tier for the camera distance, bind
    /// the model's bulk state, then draw every mesh instance of the frame
    /// under its own transform.
    ///
    /// A mesh tier that failed to build draws as empty; an invalid frame
    /// index is a precondition violation (logged, nothing drawn).
    pub fn render_model(
        &mut self,
        id: ModelId,
        frame: usize,
        distance: f32,
        team_color: Option<[f32; 4]>,
    ) -> RenderResult<()> {
        self.check_current_or_default()?;
        let Some(model) = self.models.get(&id) else {
            log::error!("rendering unregistered {id}");
            return Err(RenderError::UnknownModel(id));
        };
        let model = Arc::clone(model);
        let Some(backend) = &mut self.current else {
            return Err(RenderError::NoBackendAvailable);
        };

        let tier = model.preferred_lod(distance);
        let Some(lod) = model.lod(tier) else {
            log::warn!("model '{}' has no detail tiers", model.name());
            return Ok(());
        };
        let Some(frame_data) = lod.frame(frame) else {
            log::error!(
                "model '{}': frame {frame} does not exist in tier {tier} ({} frames)",
                model.name(),
                lod.frame_count()
            );
            return Err(RenderError::InvalidFrame { frame, tier });
        };

        backend.set_model(self.device.as_mut(), &model, id);
        for instance in frame_data.instances() {
            let Some(mesh) = model.mesh(instance.mesh) else {
                log::error!("model '{}' has no mesh {}", model.name(), instance.mesh);
                continue;
            };
            // Meshes with fewer tiers than the model fall back to their
            // coarsest one.
            let mesh_tier = tier.min(mesh.lod_count().saturating_sub(1));
            self.device.push_transform(&instance.matrix);
            backend.render_mesh(
                self.device.as_mut(),
                &model,
                id,
                instance.mesh,
                mesh_tier,
                team_color,
            );
            self.device.pop_transform();
        }
        Ok(())
    }
}
