//! Surface appearance of meshes.

use serde::{Deserialize, Serialize};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    /// Red channel (0.0 to 1.0).
    pub r: f32,
    /// Green channel (0.0 to 1.0).
    pub g: f32,
    /// Blue channel (0.0 to 1.0).
    pub b: f32,
}

impl Color3 {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels as an RGBA array with the given alpha (or any fourth value).
    pub fn to_array4(self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

/// Which faces of a mesh get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Outward-facing triangles only.
    #[default]
    Front,
    /// Inward-facing triangles only, for enclosing meshes such as a sky dome.
    Back,
    /// Both.
    Double,
}

/// Lighting model for a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Flat color, no lighting.
    Unlit {
        /// Surface color.
        color: Color3,
    },
    /// Per-vertex Phong lighting.
    Gouraud {
        /// Response to ambient light.
        ambient: Color3,
        /// Response to directional light.
        diffuse: Color3,
        /// Highlight color.
        specular: Color3,
        /// Specular exponent.
        shininess: f32,
    },
}

/// Shading plus face selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Lighting model and colors.
    pub shading: Shading,
    /// Faces to draw.
    pub side: Side,
}

impl Default for Material {
    fn default() -> Self {
        Self::gouraud()
    }
}

impl Material {
    /// Unlit material with `color`.
    pub fn unlit(color: Color3) -> Self {
        Self {
            shading: Shading::Unlit { color },
            side: Side::Front,
        }
    }

    /// Gouraud material: white ambient and diffuse, no specular.
    pub fn gouraud() -> Self {
        Self {
            shading: Shading::Gouraud {
                ambient: Color3::WHITE,
                diffuse: Color3::WHITE,
                specular: Color3::BLACK,
                shininess: 30.0,
            },
            side: Side::Front,
        }
    }

    /// Replace the ambient color (Gouraud only).
    pub fn with_ambient(mut self, color: Color3) -> Self {
        if let Shading::Gouraud { ambient, .. } = &mut self.shading {
            *ambient = color;
        }
        self
    }

    /// Replace the diffuse color (Gouraud only).
    pub fn with_diffuse(mut self, color: Color3) -> Self {
        if let Shading::Gouraud { diffuse, .. } = &mut self.shading {
            *diffuse = color;
        }
        self
    }

    /// Replace the specular color (Gouraud only).
    pub fn with_specular(mut self, color: Color3) -> Self {
        if let Shading::Gouraud { specular, .. } = &mut self.shading {
            *specular = color;
        }
        self
    }

    /// Set which faces get drawn.
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}
