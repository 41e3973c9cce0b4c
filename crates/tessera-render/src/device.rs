//! Render Device Abstraction
//!
//! The seam between the backends and the platform graphics context. The
//! context itself (window plumbing, driver handles) lives outside this
//! crate; backends only talk to this trait, which keeps every backend
//! testable without a context.

use std::any::Any;

use glam::Mat4;
use tessera_model::{PrimitiveKind, Vertex};

/// What the active graphics context can do
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceCapabilities {
    /// Whether GPU buffer objects are available
    pub buffer_objects: bool,
}

/// Handle to a device-owned buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// Low-level draw submission used by every backend.
///
/// All calls are synchronous from the caller's perspective; the driver may
/// pipeline behind the scenes.
pub trait RenderDevice {
    /// Capabilities of the underlying context
    fn capabilities(&self) -> DeviceCapabilities;

    /// Set the current draw color
    fn set_color(&mut self, rgba: [f32; 4]);

    /// Bind a resolved texture handle, or unbind with `None`
    fn bind_texture(&mut self, handle: Option<u64>);

    /// Push an instance transform onto the matrix stack
    fn push_transform(&mut self, matrix: &Mat4);

    /// Pop the matrix stack
    fn pop_transform(&mut self);

    /// Open an immediate-mode primitive
    fn begin(&mut self, primitive: PrimitiveKind);

    /// Submit one vertex of the open primitive
    fn emit_vertex(&mut self, vertex: &Vertex);

    /// Close the open primitive
    fn end(&mut self);

    /// Point the device at a client-side vertex array (empty slice unbinds)
    fn bind_vertex_pointer(&mut self, vertices: &[Vertex]);

    /// Indexed draw from the bound client-side vertex array
    fn draw_indexed(&mut self, primitive: PrimitiveKind, indices: &[u32]);

    /// Upload vertices into a device-owned buffer
    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> BufferId;

    /// Upload indices into a device-owned buffer
    fn create_index_buffer(&mut self, indices: &[u32]) -> BufferId;

    /// Release a device-owned buffer
    fn delete_buffer(&mut self, buffer: BufferId);

    /// Source vertex attributes from a device buffer (`None` unbinds)
    fn bind_vertex_buffer(&mut self, buffer: Option<BufferId>);

    /// Indexed draw of `count` indices from an index buffer, sourcing the
    /// bound vertex buffer
    fn draw_indexed_buffer(&mut self, primitive: PrimitiveKind, indices: BufferId, count: usize);

    /// Downcast support for callers that know the concrete device
    fn as_any(&self) -> &dyn Any;
}

/// One recorded [`RenderDevice`] call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetColor([f32; 4]),
    BindTexture(Option<u64>),
    PushTransform,
    PopTransform,
    Begin(PrimitiveKind),
    EmitVertex,
    End,
    BindVertexPointer { count: usize },
    DrawIndexed { primitive: PrimitiveKind, indices: Vec<u32> },
    CreateVertexBuffer { buffer: BufferId, bytes: usize },
    CreateIndexBuffer { buffer: BufferId, indices: Vec<u32> },
    DeleteBuffer(BufferId),
    BindVertexBuffer(Option<BufferId>),
    DrawIndexedBuffer {
        primitive: PrimitiveKind,
        indices: BufferId,
        count: usize,
    },
}

/// Headless device that records every submitted call.
///
/// Backs the crate's own tests and is handy for draw-call diagnostics; the
/// capability set is configurable so capability-failure paths can be
/// exercised.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    capabilities: DeviceCapabilities,
    calls: Vec<DeviceCall>,
    next_buffer: u64,
    live_buffers: Vec<BufferId>,
}

impl RecordingDevice {
    /// Create a device with the given capabilities
    pub fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            capabilities,
            ..Default::default()
        }
    }

    /// Create a device that advertises buffer-object support
    pub fn with_buffer_objects() -> Self {
        Self::new(DeviceCapabilities {
            buffer_objects: true,
        })
    }

    /// Every call submitted so far, in order
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of buffers created but not yet deleted
    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.len()
    }

    /// Number of draw submissions (immediate `end`, indexed and buffered)
    pub fn draw_call_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    DeviceCall::End
                        | DeviceCall::DrawIndexed { .. }
                        | DeviceCall::DrawIndexedBuffer { .. }
                )
            })
            .count()
    }

    fn allocate_buffer(&mut self) -> BufferId {
        self.next_buffer += 1;
        let buffer = BufferId(self.next_buffer);
        self.live_buffers.push(buffer);
        buffer
    }
}

impl RenderDevice for RecordingDevice {
    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn set_color(&mut self, rgba: [f32; 4]) {
        self.calls.push(DeviceCall::SetColor(rgba));
    }

    fn bind_texture(&mut self, handle: Option<u64>) {
        self.calls.push(DeviceCall::BindTexture(handle));
    }

    fn push_transform(&mut self, _matrix: &Mat4) {
        self.calls.push(DeviceCall::PushTransform);
    }

    fn pop_transform(&mut self) {
        self.calls.push(DeviceCall::PopTransform);
    }

    fn begin(&mut self, primitive: PrimitiveKind) {
        self.calls.push(DeviceCall::Begin(primitive));
    }

    fn emit_vertex(&mut self, _vertex: &Vertex) {
        self.calls.push(DeviceCall::EmitVertex);
    }

    fn end(&mut self) {
        self.calls.push(DeviceCall::End);
    }

    fn bind_vertex_pointer(&mut self, vertices: &[Vertex]) {
        self.calls.push(DeviceCall::BindVertexPointer {
            count: vertices.len(),
        });
    }

    fn draw_indexed(&mut self, primitive: PrimitiveKind, indices: &[u32]) {
        self.calls.push(DeviceCall::DrawIndexed {
            primitive,
            indices: indices.to_vec(),
        });
    }

    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> BufferId {
        let buffer = self.allocate_buffer();
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        self.calls.push(DeviceCall::CreateVertexBuffer {
            buffer,
            bytes: bytes.len(),
        });
        buffer
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> BufferId {
        let buffer = self.allocate_buffer();
        self.calls.push(DeviceCall::CreateIndexBuffer {
            buffer,
            indices: indices.to_vec(),
        });
        buffer
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        match self.live_buffers.iter().position(|b| *b == buffer) {
            Some(index) => {
                self.live_buffers.swap_remove(index);
                self.calls.push(DeviceCall::DeleteBuffer(buffer));
            }
            None => log::warn!("deleting unknown {buffer}"),
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<BufferId>) {
        self.calls.push(DeviceCall::BindVertexBuffer(buffer));
    }

    fn draw_indexed_buffer(&mut self, primitive: PrimitiveKind, indices: BufferId, count: usize) {
        self.calls.push(DeviceCall::DrawIndexedBuffer {
            primitive,
            indices,
            count,
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_buffer_lifecycle() {
        let mut device = RecordingDevice::with_buffer_objects();
        let vertices = vec![Vertex::from_position(Vec3::ONE); 3];
        let vbo = device.create_vertex_buffer(&vertices);
        let ibo = device.create_index_buffer(&[0, 1, 2]);
        assert_eq!(device.live_buffer_count(), 2);

        device.delete_buffer(vbo);
        device.delete_buffer(ibo);
        assert_eq!(device.live_buffer_count(), 0);

        // Double delete is a warning, not a recorded call.
        device.delete_buffer(vbo);
        let deletes = device
            .calls()
            .iter()
            .filter(|c| matches!(c, DeviceCall::DeleteBuffer(_)))
            .count();
        assert_eq!(deletes, 2);
    }

    #[test]
    fn test_vertex_upload_size() {
        let mut device = RecordingDevice::with_buffer_objects();
        let vertices = vec![Vertex::default(); 5];
        device.create_vertex_buffer(&vertices);
        match &device.calls()[0] {
            DeviceCall::CreateVertexBuffer { bytes, .. } => {
                assert_eq!(*bytes, 5 * std::mem::size_of::<Vertex>());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn test_draw_call_count() {
        let mut device = RecordingDevice::default();
        device.begin(PrimitiveKind::TriangleList);
        device.emit_vertex(&Vertex::default());
        device.end();
        device.draw_indexed(PrimitiveKind::TriangleStrip, &[0, 1, 2, 3]);
        assert_eq!(device.draw_call_count(), 2);
    }
}
