//! Tessellation of scene shapes into indexed triangle lists.
//!
//! Triangles wind counter-clockwise when seen from outside the shape.

use glam::Vec3;
use raypick_scene::Shape;

/// Latitude bands for sphere tessellation.
const SPHERE_STACKS: u32 = 24;
/// Longitude slices for sphere tessellation.
const SPHERE_SECTORS: u32 = 48;

/// Vertex layout shared by every mesh.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Local-space position.
    pub position: [f32; 3],
    /// Local-space unit normal.
    pub normal: [f32; 3],
}

/// CPU-side vertex and index data.
#[derive(Debug, Default, Clone)]
pub struct MeshBuffers {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        });
        index
    }

    /// Quad centered on `center`; `u × v` must point along `normal`.
    fn push_quad(&mut self, center: Vec3, normal: Vec3, u: Vec3, v: Vec3) {
        let a = self.push_vertex(center - u - v, normal);
        let b = self.push_vertex(center + u - v, normal);
        let c = self.push_vertex(center + u + v, normal);
        let d = self.push_vertex(center - u + v, normal);
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

/// Build triangle data for a shape.
pub fn tessellate(shape: &Shape) -> MeshBuffers {
    match *shape {
        Shape::Plane { width, height } => plane(width, height),
        Shape::Sphere { radius } => sphere(radius, SPHERE_STACKS, SPHERE_SECTORS),
        Shape::Box {
            width,
            height,
            depth,
        } => cuboid(Vec3::new(width, height, depth) * 0.5),
    }
}

fn plane(width: f32, height: f32) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();
    mesh.push_quad(
        Vec3::ZERO,
        Vec3::Y,
        Vec3::Z * (height * 0.5),
        Vec3::X * (width * 0.5),
    );
    mesh
}

fn cuboid(half: Vec3) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();
    // (normal, u, v) with u × v == normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    for (normal, u, v) in faces {
        mesh.push_quad(normal * half, normal, u * half, v * half);
    }
    mesh
}

fn sphere(radius: f32, stacks: u32, sectors: u32) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();

    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        let (phi_sin, phi_cos) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = std::f32::consts::TAU * j as f32 / sectors as f32;
            let (theta_sin, theta_cos) = theta.sin_cos();
            let normal = Vec3::new(phi_sin * theta_cos, phi_cos, phi_sin * theta_sin);
            mesh.push_vertex(normal * radius, normal);
        }
    }

    let row = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * row + j;
            let k2 = k1 + row;
            // Skip the zero-area triangles touching the poles
            if i != 0 {
                mesh.indices.extend_from_slice(&[k1, k1 + 1, k2]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[k1 + 1, k2 + 1, k2]);
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(mesh: &MeshBuffers, index: u32) -> Vec3 {
        Vec3::from_array(mesh.vertices[index as usize].position)
    }

    /// Every triangle's winding normal must agree with its vertex normals.
    fn assert_outward_winding(mesh: &MeshBuffers) {
        for tri in mesh.indices.chunks(3) {
            let (a, b, c) = (position(mesh, tri[0]), position(mesh, tri[1]), position(mesh, tri[2]));
            let face = (b - a).cross(c - a);
            let normal = Vec3::from_array(mesh.vertices[tri[0] as usize].normal)
                + Vec3::from_array(mesh.vertices[tri[1] as usize].normal)
                + Vec3::from_array(mesh.vertices[tri[2] as usize].normal);
            assert!(face.dot(normal) > 0.0, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn plane_faces_up() {
        let mesh = tessellate(&Shape::Plane {
            width: 4.0,
            height: 2.0,
        });
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
            assert_eq!(vertex.position[1], 0.0);
            assert_eq!(vertex.position[0].abs(), 2.0);
            assert_eq!(vertex.position[2].abs(), 1.0);
        }
        assert_outward_winding(&mesh);
    }

    #[test]
    fn box_has_six_faces_within_extents() {
        let mesh = tessellate(&Shape::Box {
            width: 0.01,
            height: 0.01,
            depth: 100.0,
        });
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for vertex in &mesh.vertices {
            assert!(vertex.position[0].abs() <= 0.005 + 1e-6);
            assert!(vertex.position[1].abs() <= 0.005 + 1e-6);
            assert!(vertex.position[2].abs() <= 50.0 + 1e-4);
        }
        assert_outward_winding(&mesh);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = tessellate(&Shape::Sphere { radius: 0.5 });
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            let n = Vec3::from_array(vertex.normal);
            assert!((p.length() - 0.5).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert!(mesh
            .indices
            .iter()
            .all(|&index| (index as usize) < mesh.vertices.len()));
        assert_outward_winding(&mesh);
    }
}
