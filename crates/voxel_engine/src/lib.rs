//! # Voxel Engine
//!
//! A small immediate-mode voxel renderer: a free-look camera, a batched
//! vertex/index accumulator that submits one draw call per flush, and a
//! mesher that turns cubes into shaded quads.
//!
//! ## Features
//!
//! - **Render batch**: fixed-capacity geometry accumulation with index stitching
//! - **Free-look camera**: yaw/pitch orientation, perspective or orthographic projection
//! - **Voxel meshing**: per-face masks, shading and winding
//! - **Device seam**: everything talks to a [`render::RenderBackend`]; a
//!   headless implementation ships with the crate
//!
//! ## Quick Start
//!
//! ```rust
//! use voxel_engine::prelude::*;
//! use voxel_engine::render::backends::HeadlessBackend;
//!
//! let mut backend = HeadlessBackend::new();
//! let program = backend.register_program(&["uMatrixProjection", "uMatrixView"]);
//! let mut renderer = Renderer::new(backend, program, 1024)?;
//! let mut camera = Camera::new(CameraMode::Perspective, Vec3::new(0.0, 0.0, 40.0), 60.0);
//!
//! renderer.begin_frame(Some(&mut camera), Viewport::new(640, 640))?;
//! renderer.draw_voxel(Vec3::zeros(), 16.0, Vec4::new(1.0, 1.0, 1.0, 1.0), Faces::all())?;
//! let stats = renderer.end_frame()?;
//! assert_eq!(stats.draw_calls, 1);
//! # Ok::<(), voxel_engine::render::RenderError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::fn_params_excessive_bools
)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod input;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, CameraConfig, Config},
        foundation::{
            math::{Mat4, Vec2, Vec3, Vec4},
            time::FrameClock,
        },
        input::{CursorControl, InputManager, InputSource, KeyCode, MouseButton},
        render::{
            Camera, CameraMode, Face, FaceShading, Faces, FrameStats, MovementStep, RenderBackend, RenderBatch,
            RenderError, RenderResult, Renderer, Viewport, VoxelMesher,
        },
    };
}
