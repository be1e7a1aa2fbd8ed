//! # Rendering System
//!
//! Immediate-mode voxel rendering over a small device seam.
//!
//! ## Architecture
//!
//! - **Render batch**: append-only vertex/index accumulator, one indexed draw per flush
//! - **Camera**: free-look yaw/pitch camera producing projection and view matrices
//! - **Voxel mesher**: turns an axis-aligned cube plus a face mask into batch geometry
//! - **Renderer**: per-frame coordinator tying the three to a [`RenderBackend`]
//! - **Backends**: device implementations; [`backends::HeadlessBackend`] records
//!   everything in memory
//!
//! Window, GL context and shader compilation live outside the engine. The
//! renderer only sees the opaque handles defined in [`api`].

use thiserror::Error;

pub mod api;
pub mod backends;
pub mod batch;
pub mod primitives;
pub mod renderer;
pub mod systems;
pub mod uniforms;
pub mod vertex_layout;
pub mod window;

#[cfg(test)]
mod tests;

pub use api::{
    BackendResult, BufferHandle, BufferKind, BufferUsage, ProgramHandle, RenderBackend, UniformLocation,
    VertexArrayHandle, VertexAttribute, VertexLayout,
};
pub use batch::{BatchError, BatchResult, BatchStats, DrawSubmission, RenderBatch};
pub use primitives::{Camera, CameraMode, MovementStep};
pub use renderer::{FrameStats, Renderer};
pub use systems::voxel::{Face, FaceShading, Faces, VoxelMesher};
pub use uniforms::CameraUniforms;
pub use vertex_layout::{BatchVertex, PackedVertex};
pub use window::Viewport;

/// High-level rendering error types
///
/// Device failures are reported through these variants so callers never see
/// backend-specific error types.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    ///
    /// Raised when device objects for the batch cannot be created, or when a
    /// batch is requested with an unusable capacity.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    ///
    /// Raised by backends when an object cannot be allocated or a stale handle
    /// is used.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),

    /// The viewport has a zero dimension, so no aspect ratio exists
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Viewport width in pixels
        width: u32,
        /// Viewport height in pixels
        height: u32,
    },

    /// The shader program has no uniform with this name
    #[error("Uniform `{0}` not found in program")]
    UniformNotFound(String),

    /// Geometry could not be added to the batch
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
