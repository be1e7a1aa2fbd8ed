//! Pointer capture and warping

/// Window-side pointer control used by the free-look camera
pub trait CursorControl {
    /// Hide and capture the pointer (`true`) or release it (`false`)
    fn set_relative_mode(&mut self, enabled: bool);

    /// Move the pointer to window coordinates `(x, y)`
    fn warp_pointer(&mut self, x: f64, y: f64);
}

/// Cursor stand-in that records requests instead of touching a window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessCursor {
    /// Current capture state
    pub relative_mode: bool,
    /// Number of times relative mode was switched on
    pub relative_mode_requests: usize,
    /// Every warp target, oldest first
    pub warps: Vec<(f64, f64)>,
}

impl HeadlessCursor {
    /// Create a released cursor with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent warp target
    pub fn last_warp(&self) -> Option<(f64, f64)> {
        self.warps.last().copied()
    }
}

impl CursorControl for HeadlessCursor {
    fn set_relative_mode(&mut self, enabled: bool) {
        if enabled {
            self.relative_mode_requests += 1;
        }
        self.relative_mode = enabled;
    }

    fn warp_pointer(&mut self, x: f64, y: f64) {
        self.warps.push((x, y));
    }
}
