#![warn(missing_docs)]
//! Rays, simple primitives, and closed-form ray intersection tests.

mod intersect;
mod ray;
mod shapes;

pub use intersect::{first_hit, Primitive, RayHit, PARALLEL_EPSILON};
pub use ray::Ray;
pub use shapes::{Aabb, Plane, Sphere};
