//! Normalization of freshly imported objects.

use super::ImportedObject;
use crate::host::{ObjectKind, SceneDb};
use crate::lod::LodFile;
use regex::Regex;
use std::sync::OnceLock;

pub(super) struct Context<'a> {
    pub canonical: &'a str,
    pub asset_id: &'a str,
    pub hide_materials: bool,
    /// One LOD level spans several root files or objects.
    pub multi_part: bool,
}

fn lod_marker() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_?LOD\d+").ok()).as_ref()
}

fn duplicate_suffix() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\d{3}$").ok()).as_ref()
}

/// Part name of an object: the fragment after the asset id, minus LOD markers.
pub(super) fn part_suffix(object: &str, asset_id: &str) -> String {
    let fragment = match object.find(asset_id) {
        Some(i) => &object[i + asset_id.len()..],
        None => object,
    };
    let mut fragment = fragment.to_string();
    if let Some(re) = duplicate_suffix() {
        fragment = re.replace(&fragment, "").into_owned();
    }
    if let Some(re) = lod_marker() {
        fragment = re.replace_all(&fragment, "").into_owned();
    }
    fragment
        .trim_matches(|c: char| c == '_' || c == '.' || c == ' ')
        .to_string()
}

/// Move the objects imported from `file` into place.
///
/// Meshes are freed from imported empties (which are then deleted), moved to
/// their collection and to the cursor, and have their materials hidden.
pub(super) fn normalize(
    scene: &mut SceneDb,
    context: &Context<'_>,
    file: &LodFile,
    created: &[String],
) -> Vec<ImportedObject> {
    let kind_of = |scene: &SceneDb, name: &str| scene.objects.get(name).map(|o| o.kind);
    let empties: Vec<&String> = created
        .iter()
        .filter(|n| kind_of(scene, n) == Some(ObjectKind::Empty))
        .collect();
    let meshes: Vec<&String> = created
        .iter()
        .filter(|n| kind_of(scene, n) == Some(ObjectKind::Mesh))
        .collect();

    for mesh in &meshes {
        if let Some(object) = scene.objects.get_mut(mesh.as_str()) {
            if object.parent.as_ref().map(|p| empties.contains(&p)).unwrap_or(false) {
                object.parent = None;
            }
        }
    }
    for empty in &empties {
        scene.unlink_object(empty);
        scene.objects.remove(empty.as_str());
    }

    let split = context.multi_part || meshes.len() > 1;
    let cursor = scene.cursor;
    let mut placed = Vec::with_capacity(meshes.len());
    for mesh in meshes {
        let collection = match &file.variant {
            Some(variant) => format!("{}_{}", context.canonical, variant),
            None if split => match part_suffix(mesh, context.asset_id) {
                suffix if suffix.is_empty() => context.canonical.to_string(),
                suffix => format!("{}_{}", context.canonical, suffix),
            },
            None => context.canonical.to_string(),
        };
        if collection != context.canonical {
            scene.ensure_collection(&collection);
            scene.link_collection(context.canonical, &collection);
        }
        scene.unlink_object(mesh);
        scene.link_object(&collection, mesh);

        if context.hide_materials {
            hide_materials(scene, mesh);
        }
        if let Some(object) = scene.objects.get_mut(mesh.as_str()) {
            if object.parent.is_none() {
                object.location = cursor;
            }
        }
        log::debug!("Placed {} (LOD{}) in {}", mesh, file.lod, collection);
        placed.push(ImportedObject {
            object: mesh.clone(),
            lod: file.lod,
            collection,
        });
    }
    placed
}

/// Prefix the materials on `object` with `.` so the browser skips them.
fn hide_materials(scene: &mut SceneDb, object: &str) {
    let slots: Vec<String> = scene
        .objects
        .get(object)
        .and_then(|o| o.data.as_ref())
        .and_then(|data| scene.meshes.get(data))
        .map(|mesh| mesh.materials.iter().flatten().cloned().collect())
        .unwrap_or_default();
    for material in slots.iter().filter(|m| !m.starts_with('.')) {
        scene.rename_material(material, &format!(".{}", material));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Object, ROOT_COLLECTION};
    use std::path::PathBuf;

    fn context(multi_part: bool) -> Context<'static> {
        Context {
            canonical: "ruin_r9",
            asset_id: "r9",
            hide_materials: true,
            multi_part,
        }
    }

    fn root_file(lod: u8) -> LodFile {
        LodFile {
            lod,
            path: PathBuf::from(format!("/lib/r9_LOD{}.fbx", lod)),
            variant: None,
        }
    }

    #[test]
    fn test_part_suffix() {
        assert_eq!(part_suffix("r9_wall_LOD0", "r9"), "wall");
        assert_eq!(part_suffix("r9_LOD3_arch", "r9"), "arch");
        assert_eq!(part_suffix("r9_LOD0.001", "r9"), "");
        assert_eq!(part_suffix("Pillar_LOD1", "r9"), "Pillar");
    }

    #[test]
    fn test_multi_object_file_splits_parts() {
        let mut scene = SceneDb::default();
        scene.ensure_collection("ruin_r9");
        scene.link_collection(ROOT_COLLECTION, "ruin_r9");
        let root = scene.add_object(Object::new("r9_root", ObjectKind::Empty, None));
        let mut created = vec![root.clone()];
        for part in ["wall", "arch"] {
            let name = scene.add_mesh_object(&format!("r9_{}_LOD0", part));
            scene.objects.get_mut(&name).unwrap().parent = Some(root.clone());
            scene.ensure_material("Shared");
            scene.object_mesh_mut(&name).unwrap().set_material(0, "Shared");
            created.push(name);
        }

        let placed = normalize(&mut scene, &context(false), &root_file(0), &created);
        assert_eq!(placed.len(), 2);
        assert!(!scene.objects.contains_key("r9_root"));
        assert_eq!(scene.objects["r9_wall_LOD0"].parent, None);
        assert_eq!(scene.collections_of("r9_arch_LOD0"), vec!["ruin_r9_arch"]);
        assert!(scene.is_child_collection("ruin_r9", "ruin_r9_wall"));
        assert!(scene.materials.contains_key(".Shared"));
        assert!(!scene.materials.contains_key("Shared"));
    }

    #[test]
    fn test_variant_files_share_a_collection() {
        let mut scene = SceneDb::default();
        scene.ensure_collection("ruin_r9");
        for lod in [0, 1] {
            let name = scene.add_mesh_object(&format!("r9_Var2_LOD{}", lod));
            let file = LodFile {
                lod,
                path: PathBuf::from(format!("/lib/Var2/LOD{}.fbx", lod)),
                variant: Some("Var2".into()),
            };
            let placed = normalize(&mut scene, &context(false), &file, &[name]);
            assert_eq!(placed[0].collection, "ruin_r9_Var2");
        }
        assert_eq!(scene.collections["ruin_r9_Var2"].objects.len(), 2);
    }
}
