//! Renderable meshes and the pick primitives derived from them.

use glam::Vec3;
use raypick_geometry::{Aabb, Sphere};

use crate::{Material, Transform};

/// Parametric mesh shape, sized in local units before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Flat rectangle in the local XZ plane, facing +Y.
    Plane {
        /// Extent along X.
        width: f32,
        /// Extent along Z.
        height: f32,
    },
    /// UV sphere centered on the local origin.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Box centered on the local origin.
    Box {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
        /// Extent along Z.
        depth: f32,
    },
}

impl Shape {
    /// Unit cube.
    pub fn unit_box() -> Self {
        Shape::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

/// A shape with material, transform and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Name used in logs.
    pub name: String,
    /// Geometry.
    pub shape: Shape,
    /// Appearance.
    pub material: Material,
    /// Placement in the world.
    pub transform: Transform,
    /// Hidden meshes are skipped by the renderer.
    pub visible: bool,
}

impl Mesh {
    /// Visible mesh at the origin with a default material.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            material: Material::default(),
            transform: Transform::default(),
            visible: true,
        }
    }

    /// Builder-style material assignment.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Depth of a box mesh, if this is one.
    pub fn depth(&self) -> Option<f32> {
        match self.shape {
            Shape::Box { depth, .. } => Some(depth),
            _ => None,
        }
    }

    /// Bounding sphere from the current position and nominal radius.
    ///
    /// Ignores scale.
    pub fn bounding_sphere(&self) -> Option<Sphere> {
        match self.shape {
            Shape::Sphere { radius } => Some(Sphere::new(self.transform.position, radius)),
            _ => None,
        }
    }

    /// Box bounds from the current position and nominal dimensions.
    ///
    /// Rotation and scale are ignored, so the result is only exact for a box
    /// that has not been rotated (other than by symmetries of the box) or scaled.
    pub fn unrotated_bounds(&self) -> Option<Aabb> {
        match self.shape {
            Shape::Box {
                width,
                height,
                depth,
            } => Some(Aabb::from_center_size(
                self.transform.position,
                Vec3::new(width, height, depth),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_position_only() {
        let mut mesh = Mesh::new("box", Shape::unit_box());
        mesh.transform.translate_x(-2.0);
        mesh.transform.set_euler_angles(std::f32::consts::PI, 0.0, 0.0);
        mesh.transform.scale = Vec3::splat(3.0);

        let bounds = mesh.unrotated_bounds().unwrap();
        assert!((bounds.min - Vec3::new(-2.5, -0.5, -0.5)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(-1.5, 0.5, 0.5)).length() < 1e-5);
        assert!(mesh.bounding_sphere().is_none());
    }

    #[test]
    fn sphere_bounds_use_radius() {
        let mut mesh = Mesh::new("sphere", Shape::Sphere { radius: 0.5 });
        mesh.transform.translate_x(2.0);

        let sphere = mesh.bounding_sphere().unwrap();
        assert_eq!(sphere.center, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(sphere.radius, 0.5);
        assert!(mesh.unrotated_bounds().is_none());
        assert_eq!(mesh.depth(), None);
    }
}
