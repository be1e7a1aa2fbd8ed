//! # Renderer
//!
//! Per-frame coordinator owning the device, the shader program's camera
//! uniforms, and the render batch. A frame is:
//!
//! 1. [`Renderer::begin_frame`] uploads camera (or default) matrices
//! 2. any number of [`Renderer::draw_voxel`] calls fill the batch
//! 3. [`Renderer::end_frame`] flushes the batch as one draw call
//!
//! [`Renderer::flush`] may be called mid-frame when the batch runs full.

use crate::core::config::ApplicationConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::api::{ProgramHandle, RenderBackend};
use crate::render::batch::{DrawSubmission, RenderBatch};
use crate::render::primitives::camera::{Camera, PLANE_FAR, PLANE_NEAR};
use crate::render::systems::voxel::{Faces, VoxelMesher};
use crate::render::uniforms::CameraUniforms;
use crate::render::window::Viewport;
use crate::render::RenderResult;

/// Field of view used when a frame has no camera
pub const DEFAULT_FIELD_OF_VIEW: f32 = 45.0;

/// What one frame submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Zero-based frame index
    pub frame: u64,
    /// Draw calls issued (one per flush)
    pub draw_calls: u32,
    /// Vertices uploaded
    pub vertices: usize,
    /// Indices drawn
    pub indices: usize,
    /// Voxels meshed
    pub voxels: usize,
    /// Faces emitted
    pub faces: usize,
}

impl FrameStats {
    fn record(&mut self, submission: DrawSubmission) {
        self.draw_calls += 1;
        self.vertices += submission.vertex_count;
        self.indices += submission.index_count;
    }
}

/// Frame coordinator over a [`RenderBackend`]
#[derive(Debug)]
pub struct Renderer<B: RenderBackend> {
    backend: B,
    program: ProgramHandle,
    uniforms: CameraUniforms,
    batch: RenderBatch,
    mesher: VoxelMesher,
    default_field_of_view: f32,
    frame_count: u64,
    current: FrameStats,
}

impl<B: RenderBackend> Renderer<B> {
    /// Create a renderer with default settings and the given batch size
    pub fn new(backend: B, program: ProgramHandle, triangle_capacity: usize) -> RenderResult<Self> {
        let mut config = ApplicationConfig::default();
        config.batch.triangle_capacity = triangle_capacity;
        Self::from_config(backend, program, &config)
    }

    /// Create a renderer from configuration
    ///
    /// Resolves the camera uniforms in `program` and allocates the batch.
    pub fn from_config(mut backend: B, program: ProgramHandle, config: &ApplicationConfig) -> RenderResult<Self> {
        let uniforms = CameraUniforms::resolve_named(
            &backend,
            program,
            &config.renderer.projection_uniform,
            &config.renderer.view_uniform,
        )?;
        let batch = RenderBatch::new(&mut backend, config.batch.triangle_capacity)?;

        log::info!(
            "Renderer initialized: program {:?}, batch of {} triangles",
            program,
            config.batch.triangle_capacity
        );

        Ok(Self {
            backend,
            program,
            uniforms,
            batch,
            mesher: VoxelMesher::new(config.voxel.shading),
            default_field_of_view: config.renderer.default_field_of_view,
            frame_count: 0,
            current: FrameStats::default(),
        })
    }

    /// Start a frame and upload its matrices
    ///
    /// With a camera, its matrices are recomputed for `viewport` and uploaded.
    /// Without one, a perspective projection at the default field of view and
    /// an identity view are uploaded.
    pub fn begin_frame(&mut self, camera: Option<&mut Camera>, viewport: Viewport) -> RenderResult<()> {
        log::trace!("Begin frame {}", self.frame_count);
        self.current = FrameStats {
            frame: self.frame_count,
            ..FrameStats::default()
        };

        match camera {
            Some(camera) => {
                camera.update_matrices(viewport)?;
                camera.upload(&mut self.backend, &self.uniforms)
            }
            None => self.upload_default_matrices(viewport),
        }
    }

    fn upload_default_matrices(&mut self, viewport: Viewport) -> RenderResult<()> {
        let projection = Mat4::perspective(
            utils::deg_to_rad(self.default_field_of_view),
            viewport.aspect_ratio()?,
            PLANE_NEAR,
            PLANE_FAR,
        );
        let view = Mat4::identity();

        self.backend.set_uniform_mat4(
            self.uniforms.program,
            self.uniforms.projection,
            &utils::to_column_major(&projection),
        )?;
        self.backend
            .set_uniform_mat4(self.uniforms.program, self.uniforms.view, &utils::to_column_major(&view))?;
        Ok(())
    }

    /// Mesh one voxel into the batch, returning the faces emitted
    pub fn draw_voxel(&mut self, position: Vec3, size: f32, tint: Vec4, faces: Faces) -> RenderResult<usize> {
        let emitted = self.mesher.emit_cuboid(&mut self.batch, position, size, tint, faces)?;
        self.current.voxels += 1;
        self.current.faces += emitted;
        Ok(emitted)
    }

    /// Submit the batch now without ending the frame
    pub fn flush(&mut self) -> RenderResult<DrawSubmission> {
        let submission = self.batch.flush(&mut self.backend, self.program)?;
        self.current.record(submission);
        Ok(submission)
    }

    /// Flush the batch and close the frame
    pub fn end_frame(&mut self) -> RenderResult<FrameStats> {
        self.flush()?;
        self.frame_count += 1;

        let stats = self.current;
        log::debug!(
            "Frame {} done: {} draw calls, {} voxels, {} faces, {} indices",
            stats.frame,
            stats.draw_calls,
            stats.voxels,
            stats.faces,
            stats.indices
        );
        Ok(stats)
    }

    /// Release the batch's device objects and hand the backend back
    pub fn shutdown(mut self) -> RenderResult<B> {
        log::info!("Renderer shutting down after {} frames", self.frame_count);
        self.batch.teardown(&mut self.backend)?;
        Ok(self.backend)
    }

    /// Device
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Device, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Render batch
    pub fn batch(&self) -> &RenderBatch {
        &self.batch
    }

    /// Render batch, for pushing custom geometry
    pub fn batch_mut(&mut self) -> &mut RenderBatch {
        &mut self.batch
    }

    /// Program all draws use
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Resolved camera uniforms
    pub fn uniforms(&self) -> &CameraUniforms {
        &self.uniforms
    }

    /// Frames completed
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
