//! In-memory model of the host scene database.
//!
//! The core only touches the host through the primitives on [`SceneDb`]:
//! name-keyed datablock maps, collection linking and object creation. Every
//! map is ordered by name, so two databases holding the same entities compare
//! equal with `==`.

pub mod data;
pub mod tree;

pub use data::{
    AssetMark, BlendMethod, Brush, Collection, Image, Material, Mesh, Modifier, Object,
    ObjectKind, Texture,
};
pub use tree::{
    InterfaceItem, Link, Node, NodeKind, NodeTree, Panel, Socket, SocketDirection, SocketSubtype,
    SocketType, SocketValue, TreeInterface, TreeKind,
};

use crate::types::HostVersion;
use glam::Vec3;
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the scene-level root collection.
pub const ROOT_COLLECTION: &str = "Scene Collection";

/// Default view transform of a fresh scene.
pub const DEFAULT_VIEW_TRANSFORM: &str = "AgX";

/// Reference to a node tree owned by the scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TreeRef {
    /// The node tree embedded in a material.
    Material(String),
    /// A standalone node group.
    NodeGroup(String),
}

/// The host's scene database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneDb {
    pub version: HostVersion,
    pub images: BTreeMap<String, Image>,
    pub textures: BTreeMap<String, Texture>,
    pub brushes: BTreeMap<String, Brush>,
    pub materials: BTreeMap<String, Material>,
    pub node_groups: BTreeMap<String, NodeTree>,
    pub meshes: BTreeMap<String, Mesh>,
    pub objects: BTreeMap<String, Object>,
    pub collections: BTreeMap<String, Collection>,
    pub root_collection: String,
    pub cursor: Vec3,
    pub active_camera: Option<String>,
    pub view_transform: String,
    pub selected_objects: Vec<String>,
    pub active_brush: Option<String>,
    /// Tree currently open in the node editor.
    pub editor: Option<TreeRef>,
}

impl Default for SceneDb {
    fn default() -> Self {
        Self::new(HostVersion::default())
    }
}

impl SceneDb {
    /// Create an empty scene with only the root collection.
    pub fn new(version: HostVersion) -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(ROOT_COLLECTION.to_string(), Collection::new(ROOT_COLLECTION));
        Self {
            version,
            images: BTreeMap::new(),
            textures: BTreeMap::new(),
            brushes: BTreeMap::new(),
            materials: BTreeMap::new(),
            node_groups: BTreeMap::new(),
            meshes: BTreeMap::new(),
            objects: BTreeMap::new(),
            collections,
            root_collection: ROOT_COLLECTION.to_string(),
            cursor: Vec3::ZERO,
            active_camera: None,
            view_transform: DEFAULT_VIEW_TRANSFORM.to_string(),
            selected_objects: Vec::new(),
            active_brush: None,
            editor: None,
        }
    }

    /// Get a tree by reference.
    pub fn tree(&self, tree: &TreeRef) -> Option<&NodeTree> {
        match tree {
            TreeRef::Material(name) => self.materials.get(name).map(|m| &m.node_tree),
            TreeRef::NodeGroup(name) => self.node_groups.get(name),
        }
    }

    /// Get a tree by reference (mutable).
    pub fn tree_mut(&mut self, tree: &TreeRef) -> Option<&mut NodeTree> {
        match tree {
            TreeRef::Material(name) => self.materials.get_mut(name).map(|m| &mut m.node_tree),
            TreeRef::NodeGroup(name) => self.node_groups.get_mut(name),
        }
    }

    /// Get or create a material with an empty shader tree.
    pub fn ensure_material(&mut self, name: &str) -> &mut Material {
        let version = self.version;
        self.materials
            .entry(name.to_string())
            .or_insert_with(|| Material {
                name: name.to_string(),
                node_tree: NodeTree::new(name, TreeKind::Shader, version),
                blend_method: BlendMethod::Opaque,
                asset: None,
            })
    }

    /// Get or create a node group.
    pub fn ensure_node_group(&mut self, name: &str, kind: TreeKind) -> &mut NodeTree {
        let version = self.version;
        self.node_groups
            .entry(name.to_string())
            .or_insert_with(|| NodeTree::new(name, kind, version))
    }

    /// Rename a material, keeping mesh slot references in sync.
    ///
    /// Returns the final name, which gets a numeric suffix if `new_name` is taken.
    pub fn rename_material(&mut self, old_name: &str, new_name: &str) -> Option<String> {
        if old_name == new_name {
            return self.materials.contains_key(old_name).then(|| old_name.to_string());
        }
        let mut material = self.materials.remove(old_name)?;
        let final_name = unique_name(new_name, |n| self.materials.contains_key(n));
        material.name = final_name.clone();
        material.node_tree.name = final_name.clone();
        self.materials.insert(final_name.clone(), material);
        for mesh in self.meshes.values_mut() {
            for slot in mesh.materials.iter_mut().flatten() {
                if slot == old_name {
                    *slot = final_name.clone();
                }
            }
        }
        Some(final_name)
    }

    /// Create a mesh datum and a mesh object using it. Returns the object name.
    pub fn add_mesh_object(&mut self, name: &str) -> String {
        let mesh_name = unique_name(name, |n| self.meshes.contains_key(n));
        self.meshes.insert(mesh_name.clone(), Mesh::new(&mesh_name));
        self.add_object(Object::new(name, ObjectKind::Mesh, Some(mesh_name)))
    }

    /// Insert an object, suffixing its name if taken. Returns the final name.
    pub fn add_object(&mut self, mut object: Object) -> String {
        let name = unique_name(&object.name, |n| self.objects.contains_key(n));
        object.name = name.clone();
        self.objects.insert(name.clone(), object);
        name
    }

    /// Mesh datum of a mesh object.
    pub fn object_mesh_mut(&mut self, object: &str) -> Option<&mut Mesh> {
        let data = self.objects.get(object)?.data.clone()?;
        self.meshes.get_mut(&data)
    }

    /// Mesh data names containing `needle`.
    pub fn meshes_containing(&self, needle: &str) -> Vec<&str> {
        self.meshes
            .keys()
            .filter(|name| name.contains(needle))
            .map(|s| s.as_str())
            .collect()
    }

    /// Get or create a collection (not linked anywhere). Returns true if created.
    pub fn ensure_collection(&mut self, name: &str) -> bool {
        if self.collections.contains_key(name) {
            return false;
        }
        self.collections.insert(name.to_string(), Collection::new(name));
        true
    }

    /// Whether `child` is a direct child of `parent`.
    pub fn is_child_collection(&self, parent: &str, child: &str) -> bool {
        self.collections
            .get(parent)
            .map(|c| c.children.iter().any(|n| n == child))
            .unwrap_or(false)
    }

    /// Whether `to` is `from` or one of its descendants.
    pub fn collection_reaches(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        self.collections
            .get(from)
            .map(|c| c.children.iter().any(|child| self.collection_reaches(child, to)))
            .unwrap_or(false)
    }

    /// Link `child` under `parent`. Refuses links that would create a cycle.
    pub fn link_collection(&mut self, parent: &str, child: &str) -> bool {
        if !self.collections.contains_key(child) || self.is_child_collection(parent, child) {
            return false;
        }
        if self.collection_reaches(child, parent) {
            log::warn!("Refusing to link collection {} under {}: cycle", child, parent);
            return false;
        }
        match self.collections.get_mut(parent) {
            Some(collection) => {
                collection.children.push(child.to_string());
                true
            }
            None => false,
        }
    }

    /// Link an object into a collection (no-op if already linked).
    pub fn link_object(&mut self, collection: &str, object: &str) {
        if let Some(c) = self.collections.get_mut(collection) {
            if !c.objects.iter().any(|o| o == object) {
                c.objects.push(object.to_string());
            }
        }
    }

    /// Unlink an object from every collection.
    pub fn unlink_object(&mut self, object: &str) {
        for collection in self.collections.values_mut() {
            collection.objects.retain(|o| o != object);
        }
    }

    /// Names of the collections holding an object.
    pub fn collections_of(&self, object: &str) -> Vec<&str> {
        self.collections
            .values()
            .filter(|c| c.objects.iter().any(|o| o == object))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Add a camera object and make it the active camera.
    pub fn add_camera(&mut self, name: &str, location: Vec3) -> String {
        let mut camera = Object::new(name, ObjectKind::Camera, None);
        camera.location = location;
        let name = self.add_object(camera);
        let root = self.root_collection.clone();
        self.link_object(&root, &name);
        self.active_camera = Some(name.clone());
        name
    }

    /// Add a brush and make it the active one.
    pub fn add_brush(&mut self, name: &str) {
        self.brushes.insert(name.to_string(), Brush::new(name));
        self.active_brush = Some(name.to_string());
    }
}

/// Host-style unique naming: `name`, then `name.001`, `name.002`, ...
pub fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{}.{:03}", base, i))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
