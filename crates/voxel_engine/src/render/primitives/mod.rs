//! Core primitive types for rendering
//!
//! Holds the free-look camera. Batch geometry types live in
//! [`crate::render::vertex_layout`].

pub mod camera;

pub use camera::{Camera, CameraMode, MovementStep};
