//! Shader uniform resolution for the camera matrices

use crate::render::api::{ProgramHandle, RenderBackend, UniformLocation};
use crate::render::{RenderError, RenderResult};

/// Default name of the projection-matrix uniform
pub const PROJECTION_UNIFORM: &str = "uMatrixProjection";

/// Default name of the view-matrix uniform
pub const VIEW_UNIFORM: &str = "uMatrixView";

/// Resolved uniform locations the camera uploads into
///
/// Resolution happens once per program; uploads then go straight to the
/// stored locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraUniforms {
    /// Program the locations belong to
    pub program: ProgramHandle,
    /// Projection matrix location
    pub projection: UniformLocation,
    /// View matrix location
    pub view: UniformLocation,
}

impl CameraUniforms {
    /// Resolve the default uniform names in `program`
    pub fn resolve<B: RenderBackend + ?Sized>(backend: &B, program: ProgramHandle) -> RenderResult<Self> {
        Self::resolve_named(backend, program, PROJECTION_UNIFORM, VIEW_UNIFORM)
    }

    /// Resolve custom uniform names in `program`
    pub fn resolve_named<B: RenderBackend + ?Sized>(
        backend: &B,
        program: ProgramHandle,
        projection_name: &str,
        view_name: &str,
    ) -> RenderResult<Self> {
        let projection = lookup(backend, program, projection_name)?;
        let view = lookup(backend, program, view_name)?;

        log::debug!(
            "Camera uniforms resolved: {}={:?}, {}={:?}",
            projection_name,
            projection,
            view_name,
            view
        );

        Ok(Self { program, projection, view })
    }
}

fn lookup<B: RenderBackend + ?Sized>(
    backend: &B,
    program: ProgramHandle,
    name: &str,
) -> RenderResult<UniformLocation> {
    backend
        .uniform_location(program, name)
        .ok_or_else(|| RenderError::UniformNotFound(name.to_string()))
}
