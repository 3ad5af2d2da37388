//! Closed-form ray intersection tests.
//!
//! Every test returns the nearest hit at a non-negative ray parameter, or
//! `None`. A ray starting inside a sphere or box reports the exit point.

use glam::Vec3;

use crate::{Aabb, Plane, Ray, Sphere};

/// `|direction · normal|` below this counts as parallel to a plane.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Result of a successful ray intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Ray parameter of the hit (distance, since directions are unit length).
    pub distance: f32,
}

impl RayHit {
    fn at(ray: &Ray, t: f32) -> Self {
        Self {
            point: ray.at(t),
            distance: t,
        }
    }
}

impl Ray {
    /// Intersect with a sphere.
    ///
    /// Solves `|origin + t·dir − center| = radius` and returns the smaller
    /// non-negative root.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<RayHit> {
        if self.is_degenerate() {
            return None;
        }

        // Quadratic with a = 1 for a unit direction
        let oc = self.origin - sphere.center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - sphere.radius * sphere.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let near = -b - sqrt_disc;
        let far = -b + sqrt_disc;

        if near >= 0.0 {
            Some(RayHit::at(self, near))
        } else if far >= 0.0 {
            Some(RayHit::at(self, far))
        } else {
            None
        }
    }

    /// Intersect with an axis-aligned box using the slab test.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<RayHit> {
        if self.is_degenerate() {
            return None;
        }

        let inv_dir = self.direction.recip();
        let t1 = (aabb.min - self.origin) * inv_dir;
        let t2 = (aabb.max - self.origin) * inv_dir;

        // 0 * inf: the ray lies in a face plane. Grazing counts as a miss.
        if t1.is_nan() || t2.is_nan() {
            return None;
        }

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Entire box is behind the origin
        if tmax < 0.0 {
            return None;
        }

        // Slab intervals don't overlap
        if tmin > tmax {
            return None;
        }

        let t = if tmin < 0.0 { tmax } else { tmin };
        Some(RayHit::at(self, t))
    }

    /// Intersect with an infinite plane.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<RayHit> {
        if self.is_degenerate() {
            return None;
        }

        let denom = self.direction.dot(plane.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (plane.point - self.origin).dot(plane.normal) / denom;
        if t < 0.0 {
            return None;
        }

        Some(RayHit::at(self, t))
    }
}

/// Any primitive the picker knows how to test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Sphere.
    Sphere(Sphere),
    /// Axis-aligned box.
    Box(Aabb),
    /// Infinite plane.
    Plane(Plane),
}

impl Primitive {
    /// Intersect `ray` with this primitive.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        match self {
            Primitive::Sphere(sphere) => ray.intersect_sphere(sphere),
            Primitive::Box(aabb) => ray.intersect_aabb(aabb),
            Primitive::Plane(plane) => ray.intersect_plane(plane),
        }
    }
}

/// Test primitives in order and return the first one hit, with its index.
///
/// Order is priority, not distance: a later primitive that is nearer to the
/// ray origin never wins over an earlier hit.
pub fn first_hit(ray: &Ray, primitives: &[Primitive]) -> Option<(usize, RayHit)> {
    primitives
        .iter()
        .enumerate()
        .find_map(|(index, primitive)| primitive.intersect(ray).map(|hit| (index, hit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn sphere_hit_from_outside_lands_on_near_side() {
        let sphere = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5);
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);

        let hit = ray.intersect_sphere(&sphere).unwrap();
        assert!((hit.point - Vec3::new(2.0, 0.0, 0.5)).length() < EPS);
        assert!((hit.distance - 4.5).abs() < EPS);
        assert!(((hit.point - sphere.center).length() - sphere.radius).abs() < EPS);
    }

    #[test]
    fn sphere_miss_when_offset_exceeds_radius() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray.intersect_sphere(&sphere).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_a_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_sphere(&sphere).is_none());
    }

    #[test]
    fn sphere_from_inside_returns_exit_point() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = ray.intersect_sphere(&sphere).unwrap();
        assert!((hit.point - Vec3::new(2.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn aabb_hit_along_axis_lands_on_face() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);

        let hit = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z)
            .intersect_aabb(&aabb)
            .unwrap();
        assert!((hit.distance - 1.5).abs() < EPS);
        assert!((hit.point - Vec3::new(0.0, 0.0, 0.5)).length() < EPS);

        let hit = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::X)
            .intersect_aabb(&aabb)
            .unwrap();
        assert!((hit.point - Vec3::new(-0.5, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn aabb_miss_and_behind() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);

        let miss = Ray::new(Vec3::new(2.0, 0.0, 2.0), Vec3::NEG_Z).intersect_aabb(&aabb);
        assert!(miss.is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z).intersect_aabb(&aabb);
        assert!(behind.is_none());
    }

    #[test]
    fn aabb_from_inside_returns_exit_point() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let hit = Ray::new(Vec3::ZERO, Vec3::Y).intersect_aabb(&aabb).unwrap();
        assert!((hit.point - Vec3::new(0.0, 1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn aabb_ray_in_face_plane_is_a_miss() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);

        for origin in [
            Vec3::new(0.5, 0.0, 5.0),
            Vec3::new(-0.5, 0.0, 5.0),
            Vec3::new(0.0, 0.5, 5.0),
        ] {
            assert!(Ray::new(origin, Vec3::NEG_Z).intersect_aabb(&aabb).is_none());
        }

        // Axis-parallel but strictly inside the slab still hits
        let hit = Ray::new(Vec3::new(0.2, 0.0, 5.0), Vec3::NEG_Z)
            .intersect_aabb(&aabb)
            .unwrap();
        assert!((hit.point - Vec3::new(0.2, 0.0, 0.5)).length() < EPS);
    }

    #[test]
    fn plane_parallel_ray_never_hits() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        for origin in [Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0), Vec3::new(3.0, -7.0, 2.0)] {
            let ray = Ray::new(origin, Vec3::new(1.0, 0.0, -1.0));
            assert!(ray.intersect_plane(&plane).is_none());
        }
    }

    #[test]
    fn plane_behind_origin_is_a_miss() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, -1.0));
        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn plane_hit_lies_on_plane() {
        let plane = Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, -1.0, -1.0));
        let hit = ray.intersect_plane(&plane).unwrap();
        assert!(plane.signed_distance(hit.point).abs() < EPS);
        assert!((hit.point - Vec3::new(0.0, -1.0, 4.0)).length() < EPS);
    }

    #[test]
    fn degenerate_ray_hits_nothing() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(ray.intersect_sphere(&Sphere::new(Vec3::ZERO, 1.0)).is_none());
        assert!(ray
            .intersect_aabb(&Aabb::from_center_size(Vec3::ZERO, Vec3::ONE))
            .is_none());
        assert!(ray
            .intersect_plane(&Plane::new(Vec3::ZERO, Vec3::Y))
            .is_none());
    }

    #[test]
    fn first_hit_respects_order_over_distance() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let far_sphere = Primitive::Sphere(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0));
        let near_box = Primitive::Box(Aabb::from_center_size(Vec3::new(0.0, 0.0, 5.0), Vec3::ONE));

        let (index, hit) = first_hit(&ray, &[far_sphere, near_box]).unwrap();
        assert_eq!(index, 0);
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < EPS);
    }

    #[test]
    fn first_hit_falls_through_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, -1.0, -1.0));
        let missed_sphere = Primitive::Sphere(Sphere::new(Vec3::new(50.0, 0.0, 0.0), 1.0));
        let ground = Primitive::Plane(Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y));

        let (index, _) = first_hit(&ray, &[missed_sphere, ground]).unwrap();
        assert_eq!(index, 1);
        assert!(first_hit(&ray, &[missed_sphere]).is_none());
        assert!(first_hit(&ray, &[]).is_none());
    }
}
