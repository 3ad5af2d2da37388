//! Position / rotation / scale of a scene node.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local-to-world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Model matrix (local space -> world space).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Set the orientation from XYZ euler angles in radians.
    pub fn set_euler_angles(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Move along the node's local X axis.
    pub fn translate_x(&mut self, distance: f32) {
        self.position += self.rotation * Vec3::X * distance;
    }

    /// Move along the node's local Z axis.
    pub fn translate_z(&mut self, distance: f32) {
        self.position += self.rotation * Vec3::Z * distance;
    }

    /// Rotate so the local -Z axis points at `target`.
    ///
    /// Does nothing when `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);
    }
}
