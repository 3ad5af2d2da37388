#![warn(missing_docs)]
//! Orbit camera, viewport mapping, and pick-ray generation.

use glam::{Mat4, Vec2, Vec3};
use raypick_geometry::Ray;

/// Keeps pitch just short of the poles so `look_at` has a usable up vector.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera orbiting a target point at a fixed distance.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Distance from the target.
    pub distance: f32,
    /// Rotation around the world Y axis in radians. Zero looks down -Z.
    pub yaw: f32,
    /// Elevation above the target's horizontal plane in radians.
    pub pitch: f32,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,

    /// Smallest allowed orbit distance.
    pub min_distance: f32,
    /// Largest allowed orbit distance.
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(5.0, 60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl OrbitCamera {
    /// Create a camera orbiting the origin.
    ///
    /// # Arguments
    /// * `distance` - Orbit radius
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width / height
    /// * `near`, `far` - Clipping plane distances
    pub fn new(distance: f32, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            distance,
            yaw: 0.0,
            pitch: 0.0,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            min_distance: near,
            max_distance: far * 0.5,
        }
    }

    /// World-space eye position.
    pub fn position(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                yaw_sin * pitch_cos,
                pitch_sin,
                yaw_cos * pitch_cos,
            ) * self.distance
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Orbit around the target.
    ///
    /// # Arguments
    /// * `delta_yaw` - Horizontal rotation delta in radians
    /// * `delta_pitch` - Vertical rotation delta in radians
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move towards (positive) or away from (negative) the target.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(self.min_distance, self.max_distance);
    }

    /// Update the aspect ratio (call when window resizes).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Build a world-space ray from the eye through a point in normalized
    /// device coordinates.
    pub fn pick_ray(&self, ndc: Vec2) -> Ray {
        let inv_view_proj = self.view_projection_matrix().inverse();
        // Depth 1.0 is the far plane for `perspective_rh`
        let far_point = inv_view_proj.project_point3(ndc.extend(1.0));
        let eye = self.position();
        Ray::new(eye, far_point - eye)
    }

    /// Project a world point to normalized device coordinates.
    pub fn project(&self, world: Vec3) -> Vec2 {
        self.view_projection_matrix().project_point3(world).truncate()
    }
}

/// Size of the drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Convert pixel coordinates (origin top-left, Y down) to normalized
    /// device coordinates in [-1, 1] with Y up.
    ///
    /// Points outside the viewport map outside [-1, 1]; they are not clamped.
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            (2.0 * pixel.x) / self.width as f32 - 1.0,
            1.0 - (2.0 * pixel.y) / self.height as f32, // Flip Y
        )
    }

    /// Inverse of [`Viewport::to_ndc`].
    pub fn to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }
}

/// Convert a pixel position to a world-space pick ray.
pub fn screen_to_ray(pixel: Vec2, viewport: Viewport, camera: &OrbitCamera) -> Ray {
    camera.pick_ray(viewport.to_ndc(pixel))
}
