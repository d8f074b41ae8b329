//! Per-asset-type shader graphs.
//!
//! Every shape is built declaratively through [`GraphBuilder`], so composing
//! the same asset twice converges on one graph. Image nodes keep their place
//! whether or not their map exists; a missing map only mutes its node.

mod group;
mod material;

pub use group::{check_placement, place_group_instance, uv_node_name};

use crate::error::{MaterializeError, Result};
use crate::graph::GraphBuilder;
use crate::host::{SceneDb, TreeKind, TreeRef};
use crate::library::AssetType;
use crate::texture::TextureResolver;
use crate::types::MapRole;
use std::collections::BTreeMap;
use std::path::Path;

/// Graph shapes the composer can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphShape {
    /// Material for meshes and surfaces.
    SurfaceMaterial,
    /// Surface material plus a translucency branch.
    PlantMaterial,
    SurfaceGroup,
    DecalGroup,
    AtlasGroup,
    ImperfectionGroup,
}

impl GraphShape {
    /// Shape used for `asset_type`, as a material or as a node group.
    pub fn for_asset(asset_type: AssetType, as_group: bool) -> Option<Self> {
        let shape = match (asset_type, as_group) {
            (AssetType::Model | AssetType::Surface, false) => GraphShape::SurfaceMaterial,
            (AssetType::Plant, false) => GraphShape::PlantMaterial,
            (AssetType::Surface | AssetType::Displacement, true) => GraphShape::SurfaceGroup,
            (AssetType::Decal, true) => GraphShape::DecalGroup,
            (AssetType::Atlas | AssetType::Plant, true) => GraphShape::AtlasGroup,
            (AssetType::Imperfection, true) => GraphShape::ImperfectionGroup,
            _ => return None,
        };
        Some(shape)
    }

    /// Whether the shape is a reusable node group rather than a material.
    pub fn is_group(&self) -> bool {
        !matches!(self, GraphShape::SurfaceMaterial | GraphShape::PlantMaterial)
    }

    /// Map roles with an image node in this shape, in layout order.
    pub fn roles(&self) -> &'static [MapRole] {
        use MapRole::*;
        match self {
            GraphShape::SurfaceMaterial | GraphShape::SurfaceGroup => {
                &[Albedo, AmbientOcclusion, Roughness, Metallic, Opacity, Normal, Displacement]
            }
            GraphShape::PlantMaterial | GraphShape::AtlasGroup => &[
                Albedo,
                AmbientOcclusion,
                Roughness,
                Metallic,
                Opacity,
                Translucency,
                Normal,
                Displacement,
            ],
            GraphShape::DecalGroup => {
                &[Albedo, AmbientOcclusion, Roughness, Opacity, Normal, Displacement]
            }
            GraphShape::ImperfectionGroup => &[Roughness, Gloss, Mask],
        }
    }
}

/// What a composition produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Material or node group name (the canonical name).
    pub name: String,
    pub tree: TreeRef,
    /// Roles whose image node is muted.
    pub missing: Vec<MapRole>,
    /// Whether the material or group was created rather than reused.
    pub created: bool,
}

/// Loaded image name per role (`None` when the map is missing).
pub(crate) type RoleImages = BTreeMap<MapRole, Option<String>>;

/// Builds shader graphs for library assets.
#[derive(Debug, Clone, Copy)]
pub struct Composer {
    builder: GraphBuilder,
    resolver: TextureResolver,
}

impl Composer {
    pub fn new(builder: GraphBuilder, resolver: TextureResolver) -> Self {
        Self { builder, resolver }
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    pub fn resolver(&self) -> &TextureResolver {
        &self.resolver
    }

    /// Build or update the `shape` graph named `name` from the maps in `asset_dir`.
    ///
    /// Fails with [`MaterializeError::MissingAsset`] before touching the scene
    /// when not a single map of the shape exists.
    pub fn compose(
        &self,
        scene: &mut SceneDb,
        shape: GraphShape,
        name: &str,
        asset_dir: &Path,
    ) -> Result<Composition> {
        let stems: Vec<(MapRole, Option<String>)> = shape
            .roles()
            .iter()
            .map(|role| (*role, self.resolver.resolve(asset_dir, *role)))
            .collect();
        if stems.iter().all(|(_, stem)| stem.is_none()) {
            return Err(MaterializeError::MissingAsset(format!(
                "No texture maps found for {} in {}",
                name,
                asset_dir.display()
            )));
        }

        let mut images = RoleImages::new();
        for (role, stem) in stems {
            let image = stem
                .and_then(|stem| self.resolver.load(scene, asset_dir, &stem, role))
                .map(|handle| handle.image);
            images.insert(role, image);
        }
        let missing: Vec<MapRole> = images
            .iter()
            .filter(|(_, image)| image.is_none())
            .map(|(role, _)| *role)
            .collect();
        for role in &missing {
            log::warn!("{}", MaterializeError::MissingTexture(format!("{} for {}", role, name)));
        }

        let (tree, created) = if shape.is_group() {
            let created = !scene.node_groups.contains_key(name);
            let tree = scene.ensure_node_group(name, TreeKind::Shader);
            group::build(&self.builder, tree, shape, &images);
            (TreeRef::NodeGroup(name.to_string()), created)
        } else {
            let created = !scene.materials.contains_key(name);
            let material = scene.ensure_material(name);
            material::build(&self.builder, material, shape, &images);
            (TreeRef::Material(name.to_string()), created)
        };

        log::info!(
            "{} {:?} {} ({} of {} maps)",
            if created { "Created" } else { "Updated" },
            shape,
            name,
            images.len() - missing.len(),
            images.len()
        );
        Ok(Composition {
            name: name.to_string(),
            tree,
            missing,
            created,
        })
    }
}

/// Image node for `role`, placed in the image column.
pub(crate) fn image_node(
    builder: &GraphBuilder,
    tree: &mut crate::host::NodeTree,
    images: &RoleImages,
    role: MapRole,
    row: usize,
    vector_source: (&str, &str),
) {
    let image = images.get(&role).cloned().flatten();
    let params = crate::graph::NodeParams::at(-900.0, 400.0 - row as f32 * 300.0).label(role.suffix());
    builder.ensure_image_node(tree, role.node_name(), image.as_deref(), params);
    builder.link(tree, vector_source, (role.node_name(), "Vector"));
}

/// Whether the map for `role` was found.
pub(crate) fn is_present(images: &RoleImages, role: MapRole) -> bool {
    matches!(images.get(&role), Some(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BlendMethod, NodeKind, SocketDirection, SocketValue};
    use crate::types::{HostVersion, ResolutionTier};
    use glam::Vec4;
    use std::fs;
    use tempfile::TempDir;

    fn asset_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"").unwrap();
        }
        dir
    }

    fn composer(version: HostVersion) -> Composer {
        Composer::new(GraphBuilder::new(version), TextureResolver::new(ResolutionTier::K4))
    }

    #[test]
    fn test_surface_material_mutes_missing_maps() {
        let dir = asset_dir(&["abcd_4K_Albedo.jpg", "abcd_4K_Normal.jpg", "abcd_4K_Roughness.jpg"]);
        let mut scene = SceneDb::default();
        let out = composer(scene.version)
            .compose(&mut scene, GraphShape::SurfaceMaterial, "red_brick_abcd", dir.path())
            .unwrap();
        assert!(out.created);
        let tree = &scene.materials["red_brick_abcd"].node_tree;
        for name in ["albedo", "normal", "roughness"] {
            assert!(!tree.node(name).unwrap().mute, "{} muted", name);
        }
        for name in ["ao", "opacity", "displacement", "metallic"] {
            assert!(tree.node(name).unwrap().mute, "{} not muted", name);
        }
        let mix = tree.node("Mix AO").unwrap();
        assert_eq!(mix.property("blend_type"), Some("MULTIPLY"));
        assert_eq!(mix.input_default("Factor"), Some(&SocketValue::Float(1.0)));
        assert_eq!(mix.input_default("B"), Some(&SocketValue::Color(Vec4::ONE)));
        assert!(tree.has_link("Normal Map", "Normal", "Principled BSDF", "Normal"));
        assert!(tree.has_link("Displacement Map", "Displacement", "Material Output", "Displacement"));
        assert_eq!(scene.materials["red_brick_abcd"].blend_method, BlendMethod::Opaque);
        assert_eq!(out.missing.len(), 4);
    }

    #[test]
    fn test_compose_twice_is_identity() {
        let dir = asset_dir(&["a_2K_Albedo.jpg", "a_2K_Opacity.jpg", "a_2K_Translucency.jpg"]);
        let mut scene = SceneDb::default();
        let c = composer(scene.version);
        c.compose(&mut scene, GraphShape::PlantMaterial, "fern_a", dir.path()).unwrap();
        let once = scene.clone();
        let again = c.compose(&mut scene, GraphShape::PlantMaterial, "fern_a", dir.path()).unwrap();
        assert!(!again.created);
        assert_eq!(scene, once);
        assert_eq!(scene.materials["fern_a"].blend_method, BlendMethod::AlphaHashed);
    }

    #[test]
    fn test_plant_mix_shader_tracks_translucency() {
        let dir = asset_dir(&["a_2K_Albedo.jpg"]);
        let mut scene = SceneDb::default();
        composer(scene.version)
            .compose(&mut scene, GraphShape::PlantMaterial, "fern_a", dir.path())
            .unwrap();
        let tree = &scene.materials["fern_a"].node_tree;
        assert!(tree.node("Mix Shader").unwrap().mute);
        assert!(tree.has_link("Mix Shader", "Shader", "Material Output", "Surface"));
        assert!(tree.has_link("Add Shader", "Shader", "Mix Shader", "Shader_001"));
        assert!(tree.has_link("Principled BSDF", "BSDF", "Mix Shader", "Shader"));
    }

    #[test]
    fn test_all_maps_missing_is_hard_and_pure() {
        let dir = asset_dir(&[]);
        let mut scene = SceneDb::default();
        let before = scene.clone();
        let err = composer(scene.version)
            .compose(&mut scene, GraphShape::SurfaceGroup, "x_1", dir.path())
            .unwrap_err();
        assert!(matches!(err, MaterializeError::MissingAsset(_)));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_group_interface_by_version() {
        let dir = asset_dir(&["d_2K_Albedo.jpg", "d_2K_Opacity.jpg"]);
        for version in [HostVersion::new(3, 6, 0), HostVersion::new(4, 1, 0)] {
            let mut scene = SceneDb::new(version);
            composer(version)
                .compose(&mut scene, GraphShape::DecalGroup, "decal_d", dir.path())
                .unwrap();
            let tree = &scene.node_groups["decal_d"];
            let outputs: Vec<&str> = tree
                .interface
                .sockets(SocketDirection::Out)
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            assert_eq!(outputs, vec!["Base Color", "Roughness", "Alpha", "Normal", "Displacement", "Opacity"]);
            assert!(tree.interface.socket(SocketDirection::In, "Metallic").is_none());
            assert!(tree.has_link("albedo", "Alpha", "Group Output", "Alpha"));
            assert_eq!(tree.interface.panels().is_empty(), !version.has_interface_panels());
            assert_eq!(tree.nodes_of_kind(NodeKind::ImageTexture).count(), 6);
        }
    }

    #[test]
    fn test_imperfection_group() {
        let dir = asset_dir(&["i_2K_Roughness.jpg", "i_2K_Gloss.jpg"]);
        let mut scene = SceneDb::default();
        let out = composer(scene.version)
            .compose(&mut scene, GraphShape::ImperfectionGroup, "smudge_i", dir.path())
            .unwrap();
        assert_eq!(out.missing, vec![MapRole::Mask]);
        let tree = &scene.node_groups["smudge_i"];
        assert!(tree.has_link("gloss", "Color", "Group Output", "Gloss"));
        assert!(tree.node("Gamma").is_none());
        assert_eq!(scene.images["i_2K_Roughness.jpg"].colorspace, "Non-Color");
    }

    #[test]
    fn test_shape_for_asset() {
        assert_eq!(GraphShape::for_asset(AssetType::Plant, false), Some(GraphShape::PlantMaterial));
        assert_eq!(GraphShape::for_asset(AssetType::Decal, true), Some(GraphShape::DecalGroup));
        assert_eq!(GraphShape::for_asset(AssetType::Brush, true), None);
        assert!(GraphShape::AtlasGroup.roles().contains(&MapRole::Translucency));
    }
}
