//! glfw adapter: pointer control and event translation

use glfw::{Action, CursorMode, WindowEvent};

use crate::input::{CursorControl, InputManager, KeyCode, MouseButton};

impl CursorControl for glfw::PWindow {
    fn set_relative_mode(&mut self, enabled: bool) {
        let mode = if enabled { CursorMode::Disabled } else { CursorMode::Normal };
        self.set_cursor_mode(mode);
    }

    fn warp_pointer(&mut self, x: f64, y: f64) {
        self.set_cursor_pos(x, y);
    }
}

/// Map a glfw key to an engine key, `None` for keys the engine ignores
pub fn translate_key(key: glfw::Key) -> Option<KeyCode> {
    Some(match key {
        glfw::Key::A => KeyCode::A,
        glfw::Key::D => KeyCode::D,
        glfw::Key::S => KeyCode::S,
        glfw::Key::W => KeyCode::W,
        glfw::Key::Space => KeyCode::Space,
        glfw::Key::LeftShift => KeyCode::LeftShift,
        glfw::Key::Escape => KeyCode::Escape,
        _ => return None,
    })
}

/// Map a glfw mouse button to an engine button
pub fn translate_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        _ => None,
    }
}

impl InputManager {
    /// Feed one glfw window event into the input state
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(key, _, action, _) => {
                if let Some(key) = translate_key(key) {
                    match action {
                        Action::Press => self.handle_key_input(key, true),
                        Action::Release => self.handle_key_input(key, false),
                        Action::Repeat => {}
                    }
                }
            }
            WindowEvent::MouseButton(button, action, _) => {
                if let Some(button) = translate_button(button) {
                    self.handle_mouse_button(button, action != Action::Release);
                }
            }
            WindowEvent::CursorPos(x, y) => self.handle_mouse_move(x, y),
            WindowEvent::Close => self.request_close(),
            _ => {}
        }
    }
}
