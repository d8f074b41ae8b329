//! Geometry import: model files into a normalized collection hierarchy.
//!
//! Reading model files is the host's job; the core talks to it through
//! [`ModelImporter`] and then normalizes whatever objects came back.

mod normalize;

use crate::config::ModelFormat;
use crate::error::{MaterializeError, Result};
use crate::graph::GraphBuilder;
use crate::host::{SceneDb, ROOT_COLLECTION};
use crate::lod::{self, LodObject};
use crate::reconcile;
use glam::Vec3;
use std::collections::BTreeMap;
use std::path::Path;

/// Settings passed to the host importer for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    pub format: ModelFormat,
    /// Uniform scale applied on import.
    pub scale: f32,
    /// Name the imported mesh object should take.
    pub name: String,
}

impl ImportOptions {
    pub fn new(format: ModelFormat, name: impl Into<String>) -> Self {
        Self {
            format,
            scale: format.import_scale(),
            name: name.into(),
        }
    }
}

/// Format-specific model import performed by the host.
pub trait ModelImporter {
    /// Import `path` into `scene`. Returns the names of the objects created.
    fn import(&mut self, scene: &mut SceneDb, path: &Path, options: &ImportOptions) -> Result<Vec<String>>;
}

impl<T: ModelImporter + ?Sized> ModelImporter for &mut T {
    fn import(&mut self, scene: &mut SceneDb, path: &Path, options: &ImportOptions) -> Result<Vec<String>> {
        (**self).import(scene, path, options)
    }
}

impl<T: ModelImporter + ?Sized> ModelImporter for Box<T> {
    fn import(&mut self, scene: &mut SceneDb, path: &Path, options: &ImportOptions) -> Result<Vec<String>> {
        (**self).import(scene, path, options)
    }
}

/// Importer that creates one mesh object per file without reading it.
///
/// The object takes `options.name`, carries one material slot holding
/// `<name>_material` and lands in the root collection, like a host importer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StemImporter;

impl ModelImporter for StemImporter {
    fn import(&mut self, scene: &mut SceneDb, path: &Path, options: &ImportOptions) -> Result<Vec<String>> {
        if !path.is_file() {
            return Err(MaterializeError::MissingAsset(format!(
                "{} doesn't exist",
                path.display()
            )));
        }
        let object = scene.add_mesh_object(&options.name);
        let material = format!("{}_material", options.name);
        scene.ensure_material(&material);
        if let Some(mesh) = scene.object_mesh_mut(&object) {
            mesh.set_material(0, &material);
        }
        if let Some(obj) = scene.objects.get_mut(&object) {
            obj.scale = Vec3::splat(options.scale);
        }
        scene.link_object(ROOT_COLLECTION, &object);
        log::debug!("Imported {} as {} ({:?})", path.display(), object, options.format);
        Ok(vec![object])
    }
}

/// What to import for one asset.
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub asset_id: &'a str,
    pub canonical: &'a str,
    pub asset_dir: &'a Path,
    pub format: ModelFormat,
    /// Explicit LOD levels; `None` imports every level present.
    pub selection: Option<&'a [u8]>,
    /// Prefix materials that arrive with the files with `.`.
    pub hide_materials: bool,
}

/// An imported mesh object and where it was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedObject {
    pub object: String,
    pub lod: u8,
    pub collection: String,
}

/// Outcome of a geometry import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryImport {
    /// Canonical collection holding everything.
    pub collection: String,
    pub objects: Vec<ImportedObject>,
    /// Soft failures (skipped files, missing intermediate LODs).
    pub warnings: Vec<String>,
}

impl GeometryImport {
    /// Put `material` in slot 0 of every imported mesh.
    pub fn attach_material(&self, scene: &mut SceneDb, material: &str) {
        for imported in &self.objects {
            if let Some(mesh) = scene.object_mesh_mut(&imported.object) {
                mesh.set_material(0, material);
            }
        }
    }

    /// Objects grouped by the collection they were placed in.
    pub fn by_collection(&self) -> BTreeMap<&str, Vec<LodObject>> {
        let mut groups: BTreeMap<&str, Vec<LodObject>> = BTreeMap::new();
        for imported in &self.objects {
            groups
                .entry(imported.collection.as_str())
                .or_default()
                .push(LodObject::new(imported.lod, imported.object.clone()));
        }
        groups
    }

    /// Build one LOD switch per collection that holds more than one level.
    ///
    /// Returns the names of the switch trees built.
    pub fn build_lod_groups(&self, scene: &mut SceneDb, builder: &GraphBuilder) -> Vec<String> {
        let mut trees = Vec::new();
        for (collection, lods) in self.by_collection() {
            if !lods.iter().any(|l| l.lod > 0) {
                continue;
            }
            if let Some(tree) = lod::build_lod_switch(scene, builder, collection, &lods) {
                trees.push(tree);
            }
        }
        trees
    }
}

/// Import the model files of one asset.
///
/// Hard failures (missing primary LOD, every file conflicting) return before
/// the scene is touched. Files whose mesh already exists are skipped with a
/// warning each.
pub fn import_geometry<I: ModelImporter + ?Sized>(
    scene: &mut SceneDb,
    importer: &mut I,
    request: &ImportRequest<'_>,
) -> Result<GeometryImport> {
    let plan = lod::enumerate(request.asset_dir, request.format, request.selection);
    let primary = plan.primary();
    if !plan.has_lod(primary) {
        return Err(MaterializeError::MissingAsset(format!("LOD{} doesn't exist", primary)));
    }

    let (files, mut warnings) = reconcile::partition_conflicts(scene, &plan.files, request.asset_id);
    if files.is_empty() {
        return Err(MaterializeError::NameConflict(format!(
            "{} is already in the scene",
            request.canonical
        )));
    }
    warnings.extend(plan.missing.iter().map(|lod| format!("LOD{} doesn't exist", lod)));

    reconcile::ensure_canonical_collection(scene, request.canonical);
    let multi_part = plan
        .found_levels()
        .iter()
        .any(|lod| plan.files.iter().filter(|f| f.lod == *lod && f.variant.is_none()).count() > 1);
    let context = normalize::Context {
        canonical: request.canonical,
        asset_id: request.asset_id,
        hide_materials: request.hide_materials,
        multi_part,
    };

    let mut objects = Vec::new();
    for file in files {
        let options = ImportOptions::new(request.format, file.import_name(request.asset_id));
        match importer.import(scene, &file.path, &options) {
            Ok(created) => objects.extend(normalize::normalize(scene, &context, file, &created)),
            Err(e) => {
                log::warn!("Import of {} failed: {}", file.path.display(), e);
                warnings.push(e.to_string());
            }
        }
    }

    log::info!(
        "Imported {} objects into {} ({} warnings)",
        objects.len(),
        request.canonical,
        warnings.len()
    );
    Ok(GeometryImport {
        collection: request.canonical.to_string(),
        objects,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn request<'a>(dir: &'a Path, selection: Option<&'a [u8]>) -> ImportRequest<'a> {
        ImportRequest {
            asset_id: "r1",
            canonical: "rock_r1",
            asset_dir: dir,
            format: ModelFormat::Fbx,
            selection,
            hide_materials: true,
        }
    }

    #[test]
    fn test_single_file_goes_to_canonical() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "r1_LOD0.fbx");
        let mut scene = SceneDb::default();
        scene.cursor = Vec3::new(1.0, 2.0, 3.0);
        let out = import_geometry(&mut scene, &mut StemImporter, &request(dir.path(), Some(&[0]))).unwrap();
        assert_eq!(out.objects.len(), 1);
        assert_eq!(out.objects[0].collection, "rock_r1");
        let object = &scene.objects["r1_LOD0"];
        assert_eq!(object.location, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.collections_of("r1_LOD0"), vec!["rock_r1"]);
        assert!(scene.is_child_collection(ROOT_COLLECTION, "rock_r1"));
        assert!(scene.materials.contains_key(".r1_LOD0_material"));
    }

    #[test]
    fn test_missing_primary_is_pure() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "r1_LOD1.fbx");
        let mut scene = SceneDb::default();
        let before = scene.clone();
        let err = import_geometry(&mut scene, &mut StemImporter, &request(dir.path(), Some(&[0, 1]))).unwrap_err();
        assert_eq!(err.to_string(), "LOD0 doesn't exist");
        assert_eq!(scene, before);
    }

    #[test]
    fn test_abc_scale() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "r1_LOD0.abc");
        let mut scene = SceneDb::default();
        let mut req = request(dir.path(), None);
        req.format = ModelFormat::Abc;
        import_geometry(&mut scene, &mut StemImporter, &req).unwrap();
        assert_eq!(scene.objects["r1_LOD0"].scale, Vec3::splat(0.01));
    }

    #[test]
    fn test_lod_groups_per_collection() {
        let dir = TempDir::new().unwrap();
        for lod in 0..3 {
            touch(dir.path(), &format!("r1_LOD{}.fbx", lod));
        }
        let mut scene = SceneDb::default();
        let out = import_geometry(&mut scene, &mut StemImporter, &request(dir.path(), None)).unwrap();
        out.attach_material(&mut scene, "rock_r1");
        let builder = GraphBuilder::new(scene.version);
        let trees = out.build_lod_groups(&mut scene, &builder);
        assert_eq!(trees, vec!["rock_r1_LODGroup".to_string()]);
        assert!(!scene.objects["r1_LOD2"].is_visible());
        assert_eq!(scene.meshes["r1_LOD1"].materials[0].as_deref(), Some("rock_r1"));
    }
}
