//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the camera, the batch and the
//! voxel mesher. Matrices follow OpenGL conventions: right-handed view space,
//! clip-space depth in [-1, 1], column-major storage.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    /// Flatten a matrix into the column-major array layout shader uniforms expect
    pub fn to_column_major(matrix: &super::Mat4) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(matrix.as_slice());
        out
    }
}

/// Extension trait for Mat4 with the projection and view builders the camera needs
pub trait Mat4Ext {
    /// Right-handed perspective projection, `fov_y` in radians, depth mapped to [-1, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Orthographic projection over an explicit box, depth mapped to [-1, 1]
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [f/a  0   0            0          ]
        //     [0    f   0            0          ]
        //     [0    0   (f+n)/(n-f)  2fn/(n-f)  ]
        //     [0    0  -1            0          ]
        let f = 1.0 / (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = (far + near) / (near - far);
        result[(2, 3)] = (2.0 * far * near) / (near - far);
        result[(3, 2)] = -1.0;

        result
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = 2.0 / (right - left);
        result[(1, 1)] = 2.0 / (top - bottom);
        result[(2, 2)] = -2.0 / (far - near);
        result[(0, 3)] = -(right + left) / (right - left);
        result[(1, 3)] = -(top + bottom) / (top - bottom);
        result[(2, 3)] = -(far + near) / (far - near);

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perspective_matches_reference_layout() {
        let m = Mat4::perspective(utils::deg_to_rad(90.0), 2.0, 1.0, 3.0);

        assert_relative_eq!(m[(0, 0)], 0.5, epsilon = 1e-6);
        assert_relative_eq!(m[(1, 1)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 2)], -2.0, epsilon = 1e-6);
        assert_relative_eq!(m[(2, 3)], -3.0, epsilon = 1e-6);
        assert_relative_eq!(m[(3, 2)], -1.0);
        assert_relative_eq!(m[(3, 3)], 0.0);
    }

    #[test]
    fn perspective_agrees_with_nalgebra() {
        let ours = Mat4::perspective(1.0, 1.5, 0.1, 100.0);
        let theirs = Mat4::new_perspective(1.5, 1.0, 0.1, 100.0);
        assert_relative_eq!(ours, theirs, epsilon = 1e-5);
    }

    #[test]
    fn orthographic_maps_box_corners_to_ndc() {
        let m = Mat4::orthographic(0.0, 640.0, 0.0, 480.0, 0.001, 16384.0);
        let theirs = Mat4::new_orthographic(0.0, 640.0, 0.0, 480.0, 0.001, 16384.0);
        assert_relative_eq!(m, theirs, epsilon = 1e-6);

        let corner = m * Vec4::new(640.0, 480.0, -0.001, 1.0);
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_moves_target_onto_negative_z() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let view = Mat4::look_at(eye, eye + Vec3::new(0.0, 0.0, -1.0), Vec3::y());
        let target = view * Vec4::new(1.0, 2.0, 2.0, 1.0);

        assert_relative_eq!(target.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(target.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn column_major_flattening() {
        let mut m = Mat4::identity();
        m[(0, 3)] = 7.0;
        let flat = utils::to_column_major(&m);
        assert_eq!(flat[12], 7.0);
        assert_eq!(flat[0], 1.0);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(utils::clamp(100.0, -80.0, 80.0), 80.0);
        assert_eq!(utils::clamp(-100.0, -80.0, 80.0), -80.0);
        assert_eq!(utils::clamp(12.0, -80.0, 80.0), 12.0);
    }
}
