//! Callbacks a host loop invokes on an application.

use glam::Vec2;
use raypick_camera::{OrbitCamera, Viewport};

use crate::{Scene, SceneError};

/// Mouse button that went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Left button.
    #[default]
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Middle,
}

/// Pointer-down event in physical pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Cursor position.
    pub position: Vec2,
    /// Button pressed.
    pub button: PointerButton,
}

/// Mutable state handed to every callback.
pub struct AppContext<'a> {
    /// The scene, owned by the host.
    pub scene: &'a mut Scene,
    /// Active camera.
    pub camera: &'a mut OrbitCamera,
    /// Current drawable size.
    pub viewport: Viewport,
}

/// An application driven by a host loop.
///
/// Callbacks run on the host thread, one at a time.
pub trait GraphicsApp {
    /// Populate the scene and configure the camera. Called once.
    fn build_scene(&mut self, ctx: &mut AppContext<'_>) -> Result<(), SceneError>;

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut AppContext<'_>, dt: f32) -> Result<(), SceneError>;

    /// Called when a mouse button goes down.
    fn on_pointer_down(
        &mut self,
        ctx: &mut AppContext<'_>,
        event: PointerEvent,
    ) -> Result<(), SceneError>;
}
