//! Viewport description handed in by the platform window

use crate::render::{RenderError, RenderResult};

/// Drawable area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport; zero sizes are accepted here and rejected by [`Viewport::validate`]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fail when either dimension is zero
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> RenderResult<f32> {
        self.validate()?;
        Ok(self.width as f32 / self.height as f32)
    }

    /// Pixel centre, used as the pointer warp target in relative mouse mode
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_of_valid_viewport() {
        assert_eq!(Viewport::new(800, 400).aspect_ratio().unwrap(), 2.0);
        assert_eq!(Viewport::new(640, 640).center(), (320.0, 320.0));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            Viewport::new(0, 480).aspect_ratio(),
            Err(RenderError::InvalidViewport { width: 0, height: 480 })
        ));
        assert!(Viewport::new(640, 0).validate().is_err());
    }
}
