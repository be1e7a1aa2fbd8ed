//! # Unified Configuration System
//!
//! Configuration structures for every subsystem, grouped under
//! [`ApplicationConfig`]. Defaults match the voxel floor demo's
//! constants: a 640x640 window, a 1024-triangle batch, a 60 degree
//! perspective camera and 16-unit voxels.
//!
//! Files are loaded through the [`Config`] trait in either TOML or RON.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};
use crate::render::primitives::camera::{CameraMode, DEFAULT_PITCH_LIMIT, DEFAULT_SENSITIVITY};
use crate::render::uniforms::{PROJECTION_UNIFORM, VIEW_UNIFORM};
use crate::render::systems::voxel::FaceShading;

/// # Engine Configuration
///
/// Process-wide behaviour such as the default log filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Window/viewport parameters handed to the platform layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Voxel Engine 1.0".to_string(),
            width: 640,
            height: 640,
        }
    }
}

/// Renderer-level settings: shader uniform names and fallback matrices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Uniform receiving the projection matrix
    pub projection_uniform: String,
    /// Uniform receiving the view matrix
    pub view_uniform: String,
    /// Field of view (degrees) of the projection used when no camera is active
    pub default_field_of_view: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            projection_uniform: PROJECTION_UNIFORM.to_string(),
            view_uniform: VIEW_UNIFORM.to_string(),
            default_field_of_view: 45.0,
        }
    }
}

/// Render batch sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Triangle capacity; vertex and index capacity are both three times this
    pub triangle_capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            triangle_capacity: 1024,
        }
    }
}

/// Free-look camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Projection mode
    pub mode: CameraMode,
    /// Initial world-space position
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Mouse delta multiplier
    pub sensitivity: f32,
    /// Symmetric pitch limit in degrees
    pub pitch_limit: f32,
    /// Distance travelled per movement step (or per second with a timed step)
    pub move_speed: f32,
    /// Scale keyboard movement by frame time instead of per input sample
    pub frame_rate_independent: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Perspective,
            position: [0.0, 0.0, 0.0],
            field_of_view: 60.0,
            sensitivity: DEFAULT_SENSITIVITY,
            pitch_limit: DEFAULT_PITCH_LIMIT,
            move_speed: 1.0,
            frame_rate_independent: false,
        }
    }
}

/// Voxel meshing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelConfig {
    /// Edge length of one voxel in world units
    pub voxel_size: f32,
    /// Per-face brightness factors
    pub shading: FaceShading,
}

impl Default for VoxelConfig {
    fn default() -> Self {
        Self {
            voxel_size: 16.0,
            shading: FaceShading::default(),
        }
    }
}

/// # Application Configuration
///
/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine settings
    pub engine: EngineConfig,
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
    /// Batch settings
    pub batch: BatchConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Voxel settings
    pub voxel: VoxelConfig,
}

impl Config for ApplicationConfig {}

impl ApplicationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.batch.triangle_capacity == 0 {
            return Err(ConfigError::Invalid("batch triangle capacity must be at least 1".to_string()));
        }

        let fov = self.camera.field_of_view;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::Invalid(format!("camera field of view {fov} outside (0, 180)")));
        }

        let limit = self.camera.pitch_limit;
        if !(limit > 0.0 && limit < 90.0) {
            return Err(ConfigError::Invalid(format!("pitch limit {limit} outside (0, 90)")));
        }

        if self.camera.sensitivity < 0.0 || self.camera.move_speed < 0.0 {
            return Err(ConfigError::Invalid("camera sensitivity and speed must not be negative".to_string()));
        }

        if self.voxel.voxel_size <= 0.0 {
            return Err(ConfigError::Invalid("voxel size must be positive".to_string()));
        }

        if self.renderer.projection_uniform.is_empty() || self.renderer.view_uniform.is_empty() {
            return Err(ConfigError::Invalid("uniform names cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_constants() {
        let config = ApplicationConfig::default();
        assert_eq!(config.batch.triangle_capacity, 1024);
        assert_eq!(config.camera.field_of_view, 60.0);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.voxel.voxel_size, 16.0);
        assert_eq!(config.renderer.projection_uniform, "uMatrixProjection");
        assert_eq!(config.renderer.view_uniform, "uMatrixView");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let mut config = ApplicationConfig::default();
        config.batch.triangle_capacity = 4096;
        config.camera.mode = CameraMode::Orthographic;

        let text = config.to_string_with_format(ConfigFormat::Toml).unwrap();
        let parsed = ApplicationConfig::from_str_with_format(&text, ConfigFormat::Toml).unwrap();

        assert_eq!(parsed.batch.triangle_capacity, 4096);
        assert_eq!(parsed.camera.mode, CameraMode::Orthographic);
    }

    #[test]
    fn ron_round_trip_preserves_shading() {
        let mut config = ApplicationConfig::default();
        config.voxel.shading = FaceShading::INLINE_DRIVER;

        let text = config.to_string_with_format(ConfigFormat::Ron).unwrap();
        let parsed = ApplicationConfig::from_str_with_format(&text, ConfigFormat::Ron).unwrap();

        assert_eq!(parsed.voxel.shading, FaceShading::INLINE_DRIVER);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed = ApplicationConfig::from_str_with_format(
            "[batch]\ntriangle_capacity = 8\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(parsed.batch.triangle_capacity, 8);
        assert_eq!(parsed.window.width, 640);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = ApplicationConfig::load_from_file("settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = ApplicationConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.batch.triangle_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = ApplicationConfig::default();
        config.camera.pitch_limit = 95.0;
        assert!(config.validate().is_err());
    }
}
