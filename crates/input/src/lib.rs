#![warn(missing_docs)]
//! Mouse and keyboard state for the picking demo.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A mouse button going down at a cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    /// Which button was pressed.
    pub button: MouseButton,
    /// Cursor position in physical pixels, origin top-left.
    pub position: (f64, f64),
}

/// Input state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys pressed this frame (edge-triggered).
    keys_just_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently pressed.
    mouse_buttons: HashSet<MouseButton>,
    /// Presses not yet handed to the application.
    pending_presses: Vec<PointerPress>,

    /// Last known cursor position in physical pixels.
    pub cursor_position: (f64, f64),

    /// Cursor movement this frame while the orbit button was held.
    pub drag_delta: (f64, f64),

    /// Mouse wheel delta, in lines.
    pub mouse_wheel_delta: f32,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event to update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.keys_just_pressed.insert(*keycode);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_wheel_delta += match delta {
                    MouseScrollDelta::LineDelta(_x, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            _ => {}
        }
    }

    /// Record a cursor move, accumulating drag while the orbit button is held.
    pub fn move_cursor(&mut self, x: f64, y: f64) {
        if self.mouse_button_pressed(MouseButton::Right) {
            self.drag_delta.0 += x - self.cursor_position.0;
            self.drag_delta.1 += y - self.cursor_position.1;
        }
        self.cursor_position = (x, y);
    }

    /// Record a button press at the current cursor position.
    pub fn press_button(&mut self, button: MouseButton) {
        if self.mouse_buttons.insert(button) {
            tracing::trace!(?button, position = ?self.cursor_position, "pointer down");
            self.pending_presses.push(PointerPress {
                button,
                position: self.cursor_position,
            });
        }
    }

    /// Record a button release.
    pub fn release_button(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    /// Hand over presses recorded since the last call, oldest first.
    pub fn take_presses(&mut self) -> Vec<PointerPress> {
        std::mem::take(&mut self.pending_presses)
    }

    /// Reset per-frame state (call after the frame has consumed it).
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.drag_delta = (0.0, 0.0);
        self.mouse_wheel_delta = 0.0;
    }

    /// Check if a key was just pressed this frame.
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if a mouse button is currently pressed.
    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }
}
