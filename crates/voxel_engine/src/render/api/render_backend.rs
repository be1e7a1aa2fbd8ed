//! Backend abstraction traits for the rendering system
//!
//! This module defines the device seam the render batch and the camera talk
//! to: buffer-object lifetime, vertex layout, indexed draws and matrix
//! uniforms. Window, context and shader compilation stay on the platform
//! side; the engine only ever sees the opaque handles below.

use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a device buffer object (vertex or index data)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a device vertex-array object (attribute layout state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Handle to a linked shader program owned by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Location of a uniform inside a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// What a buffer object is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data
    Vertex,
    /// 32-bit unsigned element indices
    Index,
}

/// Upload frequency hint passed through to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Rewritten every frame
    Dynamic,
    /// Written once
    Static,
}

/// One float attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Number of f32 components
    pub components: u32,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

/// Interleaved vertex layout description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout<'a> {
    /// Bytes between consecutive vertices
    pub stride: u32,
    /// Attributes, one per shader input
    pub attributes: &'a [VertexAttribute],
}

/// Main rendering backend trait
///
/// Implemented by a concrete graphics device. Every method is called from the
/// single render thread that owns the device context.
pub trait RenderBackend {
    /// Create a vertex-array object
    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle>;

    /// Create an empty buffer object of the given kind
    fn create_buffer(&mut self, kind: BufferKind) -> BackendResult<BufferHandle>;

    /// Replace the contents of a buffer
    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8], usage: BufferUsage) -> BackendResult<()>;

    /// Bind `vertex_buffer`/`index_buffer` to `vertex_array` and describe the attribute layout
    fn configure_vertex_layout(
        &mut self,
        vertex_array: VertexArrayHandle,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        layout: VertexLayout<'_>,
    ) -> BackendResult<()>;

    /// Draw `index_count` indices as a triangle list with `program` active
    fn draw_indexed_triangles(
        &mut self,
        vertex_array: VertexArrayHandle,
        program: ProgramHandle,
        index_count: u32,
    ) -> BackendResult<()>;

    /// Look up a uniform by name, `None` when the program has no such uniform
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    /// Upload a column-major 4x4 matrix to a uniform of `program`
    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: &[f32; 16],
    ) -> BackendResult<()>;

    /// Release a buffer object
    fn delete_buffer(&mut self, buffer: BufferHandle) -> BackendResult<()>;

    /// Release a vertex-array object
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) -> BackendResult<()>;
}
