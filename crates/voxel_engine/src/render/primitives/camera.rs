//! # Free-Look Camera
//!
//! Yaw/pitch camera producing OpenGL-convention projection and view matrices.
//!
//! ## Design Principles
//! - **Compute and upload are separate**: [`Camera::update_matrices`] is pure
//!   math; [`Camera::upload`] pushes the stored matrices to the device
//! - **Derived direction**: the look direction is always recomputed from yaw
//!   and pitch, never set directly
//! - **No device ownership**: the camera holds no GPU resources

use serde::{Deserialize, Serialize};

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::input::{CursorControl, InputSource, KeyCode};
use crate::render::api::RenderBackend;
use crate::render::uniforms::CameraUniforms;
use crate::render::window::Viewport;
use crate::render::RenderResult;

/// Default mouse-delta multiplier
pub const DEFAULT_SENSITIVITY: f32 = 0.1;

/// Default symmetric pitch limit in degrees
pub const DEFAULT_PITCH_LIMIT: f32 = 80.0;

/// Near clipping plane distance
pub const PLANE_NEAR: f32 = 0.001;

/// Far clipping plane distance
pub const PLANE_FAR: f32 = 16384.0;

/// Yaw of a fresh camera, looking down -Z
pub const INITIAL_YAW: f32 = -90.0;

/// Projection used by [`Camera::update_matrices`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Perspective projection from the vertical field of view
    #[default]
    Perspective,
    /// Pixel-space orthographic projection `(0, width, 0, height)`
    Orthographic,
}

/// How far one movement update carries the camera
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementStep {
    /// Move speed units per update, regardless of frame time
    #[default]
    PerSample,
    /// Move speed units per second, scaled by the frame's duration
    Timed {
        /// Seconds since the previous update
        delta_seconds: f32,
    },
}

impl MovementStep {
    /// Distance covered at `speed` for this step
    pub fn distance(self, speed: f32) -> f32 {
        match self {
            Self::PerSample => speed,
            Self::Timed { delta_seconds } => speed * delta_seconds,
        }
    }
}

/// Free-look camera
///
/// Holds position and yaw/pitch orientation, and caches the matrices from the
/// last [`Camera::update_matrices`] call.
///
/// # Coordinate System
/// Right-handed, Y-up. Yaw rotates about +Y (measured from +X toward +Z),
/// pitch tilts toward +Y. A fresh camera has yaw -90 and looks down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: CameraMode,
    position: Vec3,

    /// Unit vector derived from `yaw`/`pitch`
    direction: Vec3,

    yaw: f32,
    pitch: f32,
    field_of_view: f32,
    plane_near: f32,
    plane_far: f32,
    sensitivity: f32,
    pitch_limit: f32,
    move_speed: f32,

    /// Pointer captured by a previous movement update
    relative_mode: bool,

    projection: Mat4,
    view: Mat4,
}

impl Camera {
    /// Create a camera at `position` looking down -Z
    ///
    /// # Arguments
    /// * `mode` - Projection mode
    /// * `position` - World-space position
    /// * `field_of_view` - Vertical field of view in degrees (perspective only)
    pub fn new(mode: CameraMode, position: Vec3, field_of_view: f32) -> Self {
        log::debug!("Camera created: {:?} at {:?}, fov {}", mode, position, field_of_view);

        Self {
            mode,
            position,
            direction: Vec3::new(0.0, 0.0, -1.0),
            yaw: INITIAL_YAW,
            pitch: 0.0,
            field_of_view,
            plane_near: PLANE_NEAR,
            plane_far: PLANE_FAR,
            sensitivity: DEFAULT_SENSITIVITY,
            pitch_limit: DEFAULT_PITCH_LIMIT,
            move_speed: 1.0,
            relative_mode: false,
            projection: Mat4::identity(),
            view: Mat4::identity(),
        }
    }

    /// Create a camera from configuration
    ///
    /// A pitch limit outside `(0, 90)` falls back to [`DEFAULT_PITCH_LIMIT`];
    /// at 90 the look direction is parallel to world up and strafing breaks.
    pub fn from_config(config: &CameraConfig) -> Self {
        let [x, y, z] = config.position;
        let mut camera = Self::new(config.mode, Vec3::new(x, y, z), config.field_of_view);
        camera.sensitivity = config.sensitivity;
        camera.pitch_limit = if config.pitch_limit > 0.0 && config.pitch_limit < 90.0 {
            config.pitch_limit
        } else {
            log::warn!(
                "Pitch limit {} outside (0, 90), using {}",
                config.pitch_limit,
                DEFAULT_PITCH_LIMIT
            );
            DEFAULT_PITCH_LIMIT
        };
        camera.move_speed = config.move_speed;
        camera
    }

    /// Recompute projection and view for `viewport`
    ///
    /// Perspective uses `aspect = width / height`; orthographic maps
    /// `(0..width, 0..height)` to clip space. The view looks from `position`
    /// toward `position + direction` with world up `(0, 1, 0)`.
    ///
    /// # Errors
    /// [`crate::render::RenderError::InvalidViewport`] when either dimension is zero.
    pub fn update_matrices(&mut self, viewport: Viewport) -> RenderResult<(Mat4, Mat4)> {
        let aspect = viewport.aspect_ratio()?;

        self.projection = match self.mode {
            CameraMode::Perspective => Mat4::perspective(
                utils::deg_to_rad(self.field_of_view),
                aspect,
                self.plane_near,
                self.plane_far,
            ),
            CameraMode::Orthographic => Mat4::orthographic(
                0.0,
                viewport.width as f32,
                0.0,
                viewport.height as f32,
                self.plane_near,
                self.plane_far,
            ),
        };

        self.view = Mat4::look_at(self.position, self.position + self.direction, Vec3::y());

        Ok((self.projection, self.view))
    }

    /// Upload the stored matrices to the resolved uniforms
    pub fn upload<B: RenderBackend + ?Sized>(&self, backend: &mut B, uniforms: &CameraUniforms) -> RenderResult<()> {
        backend.set_uniform_mat4(
            uniforms.program,
            uniforms.projection,
            &utils::to_column_major(&self.projection),
        )?;
        backend.set_uniform_mat4(uniforms.program, uniforms.view, &utils::to_column_major(&self.view))?;
        Ok(())
    }

    /// Apply one frame of keyboard and mouse input
    ///
    /// Does nothing when `enabled` is false. Otherwise moves along the look
    /// direction (W/S), strafes (A/D), rises and sinks (Space/LeftShift), then
    /// captures the pointer on first use, warps it to the viewport centre and
    /// turns by the mouse delta.
    pub fn apply_movement(
        &mut self,
        enabled: bool,
        input: &dyn InputSource,
        cursor: &mut dyn CursorControl,
        viewport: Viewport,
        step: MovementStep,
    ) {
        if !enabled {
            return;
        }

        let distance = step.distance(self.move_speed);
        let up = Vec3::y();
        let right = self.direction.cross(&up).normalize();

        if input.is_key_down(KeyCode::W) {
            self.position += self.direction * distance;
        }
        if input.is_key_down(KeyCode::S) {
            self.position -= self.direction * distance;
        }
        if input.is_key_down(KeyCode::A) {
            self.position -= right * distance;
        }
        if input.is_key_down(KeyCode::D) {
            self.position += right * distance;
        }
        if input.is_key_down(KeyCode::Space) {
            self.position += up * distance;
        }
        if input.is_key_down(KeyCode::LeftShift) {
            self.position -= up * distance;
        }

        if !self.relative_mode {
            log::debug!("Camera capturing pointer");
            cursor.set_relative_mode(true);
            self.relative_mode = true;
        }
        let (center_x, center_y) = viewport.center();
        cursor.warp_pointer(center_x, center_y);

        let (dx, dy) = input.mouse_delta();
        self.turn(dx as f32, dy as f32);
    }

    /// Rotate by a raw mouse delta, scaled by sensitivity
    pub fn turn(&mut self, dx: f32, dy: f32) {
        let pitch = self.pitch - self.sensitivity * dy;
        let yaw = self.yaw + self.sensitivity * dx;
        self.set_orientation(yaw, pitch);
    }

    /// Set yaw and pitch in degrees; pitch is clamped to the pitch limit
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = utils::clamp(pitch, -self.pitch_limit, self.pitch_limit);

        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        self.direction = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();

        log::trace!("Camera orientation: yaw={} pitch={} dir={:?}", self.yaw, self.pitch, self.direction);
    }

    /// Move the camera
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Change the projection mode
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
    }

    /// Change the vertical field of view (degrees)
    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
    }

    /// Change the mouse sensitivity
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Change the movement speed
    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    /// Forget pointer capture so the next movement update captures again
    pub fn release_pointer(&mut self, cursor: &mut dyn CursorControl) {
        if self.relative_mode {
            cursor.set_relative_mode(false);
            self.relative_mode = false;
        }
    }

    /// Projection mode
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit look direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Near clipping plane distance
    pub fn plane_near(&self) -> f32 {
        self.plane_near
    }

    /// Far clipping plane distance
    pub fn plane_far(&self) -> f32 {
        self.plane_far
    }

    /// Mouse sensitivity
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Pitch limit in degrees
    pub fn pitch_limit(&self) -> f32 {
        self.pitch_limit
    }

    /// Movement speed
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// True once the pointer has been captured
    pub fn is_relative_mode(&self) -> bool {
        self.relative_mode
    }

    /// Projection from the last matrix update
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// View from the last matrix update
    pub fn view(&self) -> &Mat4 {
        &self.view
    }
}
