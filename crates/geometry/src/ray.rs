use glam::Vec3;

/// Half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero-length direction yields a degenerate ray that never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when the direction could not be normalized.
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(2.5), Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn zero_direction_is_degenerate() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert!(ray.is_degenerate());
        assert_eq!(ray.at(10.0), Vec3::ONE);
    }
}
