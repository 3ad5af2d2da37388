#![warn(missing_docs)]
//! Scene graph and application contract for the picking demo.
//!
//! A [`Scene`] is a flat list of meshes plus lights. Hosts own the scene and
//! hand it by `&mut` to a [`GraphicsApp`] on each callback.

pub mod app;
mod graph;
mod material;
mod mesh;
mod transform;

pub use app::{AppContext, GraphicsApp, PointerButton, PointerEvent};
pub use graph::{Light, NodeId, Scene, SceneError};
pub use material::{Color3, Material, Shading, Side};
pub use mesh::{Mesh, Shape};
pub use transform::Transform;
