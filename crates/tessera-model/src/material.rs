//! Material Definitions
//!
//! Fixed-function style surface attributes referenced by meshes. Materials
//! are owned by a [`Model`](crate::Model) and treated as immutable once the
//! model has finished loading. Texture names are resolved to handles by an
//! external texture manager; this crate only stores the result.

use glam::Vec4;

/// Surface attributes for a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name
    pub name: String,
    /// Ambient reflectance
    pub ambient: Vec4,
    /// Diffuse reflectance
    pub diffuse: Vec4,
    /// Specular reflectance
    pub specular: Vec4,
    /// Emissive color
    pub emissive: Vec4,
    /// Specular exponent
    pub shininess: f32,
    /// Texture name, if any (resolved externally)
    pub texture: Option<String>,
    /// Resolved texture handle, if the texture manager has provided one
    pub texture_handle: Option<u64>,
    /// Whether the material needs blending
    pub transparent: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emissive: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            texture: None,
            texture_handle: None,
            transparent: false,
        }
    }
}

impl Material {
    /// Create a named material with default attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether a texture name has been assigned
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}
