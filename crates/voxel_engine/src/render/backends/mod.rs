//! Backend implementations for the render module
//!
//! The engine ships an in-memory device used by tests and the demo driver.
//! A windowed GL device implements [`crate::render::RenderBackend`] in the
//! application that owns the context.

pub mod headless;

pub use headless::{DrawCall, HeadlessBackend, UniformUpload};
