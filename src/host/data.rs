//! Scene datablocks: images, textures, brushes, materials, meshes, objects, collections.

use super::tree::{NodeTree, SocketValue};
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A loaded image datum, keyed by its filename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub name: String,
    pub filepath: PathBuf,
    /// Colorspace name, e.g. `"sRGB"` or `"Non-Color"`.
    pub colorspace: String,
    /// Whether the file existed when the image was created.
    pub loaded: bool,
    /// Pixel dimensions when the file could be decoded.
    pub size: Option<[u32; 2]>,
}

/// A texture datum wrapping an image (used by paint brushes).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Texture {
    pub name: String,
    pub image: Option<String>,
}

/// A paint brush.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brush {
    pub name: String,
    pub texture: Option<String>,
    pub mask_texture: Option<String>,
}

impl Brush {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
            mask_texture: None,
        }
    }
}

/// Material transparency handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BlendMethod {
    #[default]
    Opaque,
    AlphaHashed,
}

/// Asset-browser entry for a datablock marked as asset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AssetMark {
    pub preview: Option<PathBuf>,
    pub tags: Vec<String>,
}

/// A shader material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub node_tree: NodeTree,
    pub blend_method: BlendMethod,
    pub asset: Option<AssetMark>,
}

/// Mesh data with its material slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mesh {
    pub name: String,
    pub materials: Vec<Option<String>>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
        }
    }

    /// Assign a material to a slot, growing the slot list as needed.
    pub fn set_material(&mut self, slot: usize, material: &str) {
        if self.materials.len() <= slot {
            self.materials.resize(slot + 1, None);
        }
        self.materials[slot] = Some(material.to_string());
    }
}

/// Object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Mesh,
    Empty,
    Camera,
}

/// A geometry-nodes modifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifier {
    pub name: String,
    pub node_group: Option<String>,
    /// Per-input overrides, keyed by interface socket name.
    pub inputs: BTreeMap<String, SocketValue>,
}

/// A scene object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    /// Mesh datum name for mesh objects.
    pub data: Option<String>,
    pub parent: Option<String>,
    pub location: Vec3,
    pub scale: Vec3,
    pub hide_viewport: bool,
    pub hide_render: bool,
    pub modifiers: Vec<Modifier>,
}

impl Object {
    pub fn new(name: impl Into<String>, kind: ObjectKind, data: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            data,
            parent: None,
            location: Vec3::ZERO,
            scale: Vec3::ONE,
            hide_viewport: false,
            hide_render: false,
            modifiers: Vec::new(),
        }
    }

    /// Visible in both viewport and render.
    pub fn is_visible(&self) -> bool {
        !self.hide_viewport && !self.hide_render
    }

    /// Find a modifier by name.
    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.name == name)
    }
}

/// A named container of objects and child collections.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Collection {
    pub name: String,
    pub objects: Vec<String>,
    pub children: Vec<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
