//! # Tessera Render
//!
//! Swappable mesh-rendering backends for the Tessera engine:
//! - **Render device**: the seam to the platform graphics context
//! - **Backend trait**: the strategy contract every backend implements,
//!   including the three-level backend-private payload lifecycle
//! - **Concrete backends**: immediate-mode calls, client-side vertex arrays
//!   and GPU buffer objects
//! - **Renderer manager**: owns the active backend, the live-model registry
//!   and the backend-switch sweep
//!
//! Everything here is single-threaded and cooperative with the render loop;
//! the graphics context itself is supplied from outside.

use thiserror::Error;

pub mod backend;
pub mod buffer_object;
pub mod device;
pub mod immediate;
pub mod manager;
pub mod payload;
pub mod vertex_array;

pub use backend::MeshRenderer;
pub use buffer_object::BufferObjectRenderer;
pub use device::{BufferId, DeviceCall, DeviceCapabilities, RecordingDevice, RenderDevice};
pub use immediate::ImmediateRenderer;
pub use manager::{BackendFactory, ModelId, RendererManager};
pub use payload::PayloadTables;
pub use vertex_array::VertexArrayRenderer;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("unknown renderer backend '{0}'")]
    UnknownBackend(String),

    #[error("renderer backend '{0}' is not supported by this device")]
    UnsupportedBackend(String),

    #[error("no renderer backend could be activated")]
    NoBackendAvailable,

    #[error("model {0} is not registered with the renderer manager")]
    UnknownModel(ModelId),

    #[error("frame {frame} does not exist in detail tier {tier}")]
    InvalidFrame { frame: usize, tier: usize },
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
