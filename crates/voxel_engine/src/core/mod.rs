//! # Core Engine Module
//!
//! Shared configuration types used by every subsystem.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system (engine, window, renderer,
//!   batch, camera and voxel settings)

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    BatchConfig,
    CameraConfig,
    Config,
    ConfigError,
    ConfigFormat,
    EngineConfig,
    RendererConfig,
    VoxelConfig,
    WindowConfig,
};
