//! Public rendering API
//!
//! The device seam implemented by graphics backends.

pub mod render_backend;

// Re-export commonly used types
pub use render_backend::{
    BackendResult, BufferHandle, BufferKind, BufferUsage, ProgramHandle, RenderBackend,
    UniformLocation, VertexArrayHandle, VertexAttribute, VertexLayout,
};
