//! Checks against what earlier materializations left in the scene.
//!
//! Nothing here deletes: prior artifacts are found by canonical name and are
//! either reused or cause the conflicting piece to be skipped.

use crate::host::{AssetMark, SceneDb};
use crate::library::AssetDescriptor;
use crate::lod::LodFile;
use std::path::PathBuf;

/// Split planned files into those to import and one warning per conflicting file.
///
/// A file conflicts when a mesh whose name contains its import name exists.
pub fn partition_conflicts<'a>(
    scene: &SceneDb,
    files: &'a [LodFile],
    asset_id: &str,
) -> (Vec<&'a LodFile>, Vec<String>) {
    let mut keep = Vec::new();
    let mut warnings = Vec::new();
    for file in files {
        let name = file.import_name(asset_id);
        match scene.meshes_containing(&name).first() {
            Some(existing) => {
                let warning = format!("Mesh {} already exists; skipped {}", existing, name);
                log::warn!("{}", warning);
                warnings.push(warning);
            }
            None => keep.push(file),
        }
    }
    (keep, warnings)
}

/// Get or create the canonical collection and make sure the scene root links it.
///
/// Returns whether the collection was created.
pub fn ensure_canonical_collection(scene: &mut SceneDb, name: &str) -> bool {
    let created = scene.ensure_collection(name);
    let root = scene.root_collection.clone();
    if scene.collection_reaches(&root, name) {
        return created;
    }
    if scene.link_collection(&root, name) && !created {
        log::info!("Re-linked collection {} under {}", name, root);
    }
    created
}

/// Preview used when marking an asset's material for the asset browser.
///
/// Prefers `<asset dir>/<id>_Preview.png`, then the descriptor's preview.
pub fn asset_preview(descriptor: &AssetDescriptor) -> Option<PathBuf> {
    let conventional = descriptor
        .asset_dir()
        .join(format!("{}_Preview.png", descriptor.id));
    [conventional, descriptor.preview_path()]
        .into_iter()
        .find(|path| path.is_file())
}

/// Mark a material as an asset-browser entry. Returns whether a preview was applied.
pub fn mark_as_asset(scene: &mut SceneDb, material: &str, descriptor: &AssetDescriptor) -> bool {
    let Some(target) = scene.materials.get_mut(material) else {
        log::warn!("Cannot mark {} as asset: no such material", material);
        return false;
    };
    let preview = asset_preview(descriptor);
    let has_preview = preview.is_some();
    target.asset = Some(AssetMark {
        preview,
        tags: descriptor.tags.clone(),
    });
    has_preview
}
