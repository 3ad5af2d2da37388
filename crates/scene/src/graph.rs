//! Flat scene container.

use glam::Vec3;
use thiserror::Error;

use crate::{Color3, Mesh};

/// Handle to a mesh inside a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Scene lookup failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The id was not issued by this scene.
    #[error("no scene node with id {0:?}")]
    UnknownNode(NodeId),
}

/// Light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction.
    Ambient {
        /// Intensity per channel.
        color: Color3,
    },
    /// Parallel light arriving from `position` towards the origin.
    Directional {
        /// Intensity per channel.
        color: Color3,
        /// Where the light comes from.
        position: Vec3,
    },
}

/// Meshes and lights making up the world.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    lights: Vec<Light>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh and return its handle.
    pub fn add(&mut self, mesh: Mesh) -> NodeId {
        let id = NodeId(self.meshes.len());
        tracing::debug!(?id, name = %mesh.name, "mesh added to scene");
        self.meshes.push(mesh);
        id
    }

    /// Add a light.
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Look up a mesh.
    pub fn get(&self, id: NodeId) -> Result<&Mesh, SceneError> {
        self.meshes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    /// Look up a mesh for mutation.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Mesh, SceneError> {
        self.meshes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))
    }

    /// All meshes with their handles, in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(index, mesh)| (NodeId(index), mesh))
    }

    /// All lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Number of meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True if the scene has no meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Sum of all ambient lights.
    pub fn ambient_light(&self) -> Color3 {
        self.lights.iter().fold(Color3::BLACK, |acc, light| match light {
            Light::Ambient { color } => {
                Color3::new(acc.r + color.r, acc.g + color.g, acc.b + color.b)
            }
            Light::Directional { .. } => acc,
        })
    }

    /// First directional light, as (direction towards the light, color).
    pub fn key_light(&self) -> Option<(Vec3, Color3)> {
        self.lights.iter().find_map(|light| match light {
            Light::Directional { color, position } => {
                position.try_normalize().map(|direction| (direction, *color))
            }
            Light::Ambient { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn add_and_lookup() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let a = scene.add(Mesh::new("a", Shape::unit_box()));
        let b = scene.add(Mesh::new("b", Shape::Sphere { radius: 1.0 }));

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(a).unwrap().name, "a");
        assert_eq!(scene.get(b).unwrap().name, "b");

        scene.get_mut(a).unwrap().visible = false;
        assert!(!scene.get(a).unwrap().visible);

        let names: Vec<_> = scene.meshes().map(|(_, mesh)| mesh.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn foreign_id_is_an_error() {
        let mut other = Scene::new();
        other.add(Mesh::new("x", Shape::unit_box()));
        let foreign = other.add(Mesh::new("y", Shape::unit_box()));

        let scene = Scene::new();
        assert_eq!(scene.get(foreign), Err(SceneError::UnknownNode(foreign)));
    }

    #[test]
    fn lights_are_summarized() {
        let mut scene = Scene::new();
        assert_eq!(scene.ambient_light(), Color3::BLACK);
        assert!(scene.key_light().is_none());

        scene.add_light(Light::Ambient {
            color: Color3::new(0.5, 0.5, 0.5),
        });
        scene.add_light(Light::Directional {
            color: Color3::new(0.6, 0.6, 0.6),
            position: Vec3::new(10.0, 0.0, 0.0),
        });

        assert_eq!(scene.ambient_light(), Color3::new(0.5, 0.5, 0.5));
        let (direction, color) = scene.key_light().unwrap();
        assert_eq!(direction, Vec3::X);
        assert_eq!(color, Color3::new(0.6, 0.6, 0.6));
    }
}
