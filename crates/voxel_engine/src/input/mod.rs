//! Input management system
//!
//! Event-fed keyboard and mouse state read by the camera through
//! [`InputSource`], plus the [`CursorControl`] seam used to capture and
//! re-centre the pointer.

use std::collections::HashSet;

pub mod cursor;

#[cfg(feature = "glfw")]
pub mod glfw_backend;

pub use cursor::{CursorControl, HeadlessCursor};

/// Read-only view of the current input state
pub trait InputSource {
    /// True while `key` is held
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// True while `key` is released
    fn is_key_up(&self, key: KeyCode) -> bool {
        !self.is_key_down(key)
    }

    /// True while `button` is held
    fn is_button_down(&self, button: MouseButton) -> bool;

    /// Pointer position this frame
    fn mouse_position(&self) -> (f64, f64);

    /// Pointer position at the start of this frame
    fn mouse_previous_position(&self) -> (f64, f64);

    /// Pointer movement since the start of this frame
    fn mouse_delta(&self) -> (f64, f64) {
        let (x, y) = self.mouse_position();
        let (px, py) = self.mouse_previous_position();
        (x - px, y - py)
    }
}

/// Input manager
///
/// Call [`InputManager::begin_frame`] before feeding a frame's events. With an
/// anchor set (relative mouse mode) the pointer is assumed to have been warped
/// back to the anchor, so deltas are measured from there.
#[derive(Debug, Clone, Default)]
pub struct InputManager {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    position: (f64, f64),
    previous_position: (f64, f64),
    anchor: Option<(f64, f64)>,
    close_requested: bool,
}

impl InputManager {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll the previous pointer position forward for a new frame
    pub fn begin_frame(&mut self) {
        if let Some(anchor) = self.anchor {
            self.position = anchor;
        }
        self.previous_position = self.position;
    }

    /// Measure deltas from `anchor` each frame, or from the last position when `None`
    pub fn set_anchor(&mut self, anchor: Option<(f64, f64)>) {
        self.anchor = anchor;
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys.insert(key);
            if key == KeyCode::Escape {
                log::info!("Escape pressed, close requested");
                self.close_requested = true;
            }
        } else {
            self.keys.remove(&key);
        }
    }

    /// Handle mouse button input
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Handle mouse movement (absolute window coordinates)
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    /// Flag the window for closing
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// True once Escape was pressed or a close was requested
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl InputSource for InputManager {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn mouse_position(&self) -> (f64, f64) {
        self.position
    }

    fn mouse_previous_position(&self) -> (f64, f64) {
        self.previous_position
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// D key
    D,
    /// S key
    S,
    /// W key
    W,
    /// Space key
    Space,
    /// Left shift key
    LeftShift,
    /// Escape key
    Escape,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
