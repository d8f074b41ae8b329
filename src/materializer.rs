//! Front-end entry points.
//!
//! A [`Materializer`] owns the configuration, the descriptor and preview
//! caches and the host importer. Each entry point takes an asset id, runs to
//! completion against the scene and answers with a [`Report`]; errors never
//! escape to the front-end.

use crate::compose::{check_placement, place_group_instance, Composer, GraphShape};
use crate::config::Config;
use crate::error::{MaterializeError, Result, Severity};
use crate::graph::GraphBuilder;
use crate::host::{ObjectKind, SceneDb, Texture};
use crate::import::{import_geometry, ImportRequest, ModelImporter, StemImporter};
use crate::library::{
    paginate, AssetDescriptor, AssetDetails, AssetType, IndexCache, LibraryIndex, PreviewCache,
};
use crate::reconcile;
use crate::texture::TextureResolver;
use crate::types::MapRole;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Outcome class shown by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Info,
    /// Soft failure; the scene was left unchanged.
    Warning,
    /// Hard failure; the operation was cancelled before any mutation.
    Cancelled,
}

/// Result of one entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub status: Status,
    pub message: String,
    /// Soft failures of individual pieces that did not stop the operation.
    pub warnings: Vec<String>,
}

impl Report {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            status: Status::Info,
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Map an error to `Warning` (soft) or `Cancelled` (hard).
    pub fn from_error(error: &MaterializeError) -> Self {
        let status = match error.severity() {
            Severity::Soft => Status::Warning,
            Severity::Hard => Status::Cancelled,
        };
        Self {
            status,
            message: error.to_string(),
            warnings: Vec::new(),
        }
    }

    pub fn is_info(&self) -> bool {
        self.status == Status::Info
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.status, self.message)?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Materialization mode selectable by a front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Import,
    Plant,
    Surface,
    Brush,
    SurfaceGroup,
    DecalGroup,
    AtlasGroup,
    ImperfectionGroup,
}

impl Mode {
    pub const ALL: [Mode; 8] = [
        Mode::Import,
        Mode::Plant,
        Mode::Surface,
        Mode::Brush,
        Mode::SurfaceGroup,
        Mode::DecalGroup,
        Mode::AtlasGroup,
        Mode::ImperfectionGroup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Import => "import",
            Mode::Plant => "plant",
            Mode::Surface => "surface",
            Mode::Brush => "brush",
            Mode::SurfaceGroup => "surface-group",
            Mode::DecalGroup => "decal-group",
            Mode::AtlasGroup => "atlas-group",
            Mode::ImperfectionGroup => "imperfection-group",
        }
    }

    /// Default mode for an asset type.
    pub fn for_asset(asset_type: AssetType) -> Mode {
        match asset_type {
            AssetType::Model => Mode::Import,
            AssetType::Plant => Mode::Plant,
            AssetType::Surface => Mode::Surface,
            AssetType::Brush => Mode::Brush,
            AssetType::Decal => Mode::DecalGroup,
            AssetType::Atlas => Mode::AtlasGroup,
            AssetType::Imperfection => Mode::ImperfectionGroup,
            AssetType::Displacement => Mode::SurfaceGroup,
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown mode {:?}", s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a library listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub assets: Vec<AssetDescriptor>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    /// Set when the descriptor file is absent or unreadable; the listing is then empty.
    pub missing: Option<String>,
}

impl Listing {
    fn missing(reason: String) -> Self {
        Self {
            assets: Vec::new(),
            page: 1,
            total_pages: 1,
            total: 0,
            missing: Some(reason),
        }
    }

    /// Whether the library could not be read.
    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }
}

/// Entry points driving one library against a scene.
pub struct Materializer<I: ModelImporter = StemImporter> {
    config: Config,
    index: IndexCache,
    previews: PreviewCache,
    importer: I,
}

impl Materializer<StemImporter> {
    pub fn new(config: Config) -> Self {
        Self::with_importer(config, StemImporter)
    }
}

impl<I: ModelImporter> Materializer<I> {
    pub fn with_importer(config: Config, importer: I) -> Self {
        Self {
            config,
            index: IndexCache::new(),
            previews: PreviewCache::new(),
            importer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn importer_mut(&mut self) -> &mut I {
        &mut self.importer
    }

    /// The library index, rebuilt when the descriptor file changed.
    pub fn index(&mut self) -> Result<&LibraryIndex> {
        let path = self.config.descriptor_path();
        self.index.get(&path)
    }

    /// Times the index was (re)built.
    pub fn index_rebuilds(&self) -> usize {
        self.index.rebuilds()
    }

    /// A page of assets of one type, filtered by category or search pattern.
    ///
    /// An unreadable library yields an empty listing flagged as missing.
    pub fn list(
        &mut self,
        asset_type: AssetType,
        category: Option<&str>,
        subcategory: Option<&str>,
        search: Option<&str>,
        page: usize,
    ) -> Listing {
        let page_size = self.config.page_size();
        let index = match self.index() {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Library unavailable: {}", e);
                return Listing::missing(e.to_string());
            }
        };
        let all = index.query(asset_type, category, subcategory, search);
        let page = paginate(&all, page, page_size);
        Listing {
            assets: page.items.iter().map(|a| (*a).clone()).collect(),
            page: page.page,
            total_pages: page.total_pages,
            total: all.len(),
            missing: None,
        }
    }

    /// Details and preview of one asset.
    pub fn preview_details(&mut self, asset_id: &str) -> Result<AssetDetails> {
        let descriptor = self.descriptor(asset_id)?;
        let preview = self.previews.get_or_load(&descriptor.preview_path());
        Ok(AssetDetails::new(&descriptor, preview))
    }

    /// Run the entry point for `mode` with front-end defaults.
    pub fn materialize(&mut self, scene: &mut SceneDb, asset_id: &str, mode: Mode) -> Report {
        match mode {
            Mode::Import => self.import_asset(scene, asset_id),
            Mode::Plant => self.import_plant(scene, asset_id),
            Mode::Surface => self.import_surface(scene, asset_id, true, false),
            Mode::Brush => self.add_brush_texture(scene, asset_id, true, false),
            Mode::SurfaceGroup => self.add_surface_group(scene, asset_id),
            Mode::DecalGroup => self.add_decal_group(scene, asset_id),
            Mode::AtlasGroup => self.add_atlas_group(scene, asset_id),
            Mode::ImperfectionGroup => self.add_imperfection_group(scene, asset_id),
        }
    }

    /// Import a 3D asset's geometry with its material.
    pub fn import_asset(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        let result =
            self.import_model(scene, asset_id, &[AssetType::Model], GraphShape::SurfaceMaterial);
        finish("import_asset", asset_id, result)
    }

    /// Import a plant, one sub-collection per variant, with its material.
    pub fn import_plant(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        let result =
            self.import_model(scene, asset_id, &[AssetType::Plant], GraphShape::PlantMaterial);
        finish("import_plant", asset_id, result)
    }

    /// Build a surface material, optionally applying it to the selected meshes
    /// and marking it for the asset browser.
    pub fn import_surface(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        apply_material: bool,
        mark_asset: bool,
    ) -> Report {
        let result = self.try_import_surface(scene, asset_id, apply_material, mark_asset);
        finish("import_surface", asset_id, result)
    }

    /// Load a brush texture, optionally assigning it to the active brush.
    pub fn add_brush_texture(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        assign_to_active_brush: bool,
        use_as_mask: bool,
    ) -> Report {
        let result = self.try_add_brush_texture(scene, asset_id, assign_to_active_brush, use_as_mask);
        finish("add_brush_texture", asset_id, result)
    }

    pub fn add_surface_group(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        self.add_group(scene, asset_id, GraphShape::SurfaceGroup)
    }

    pub fn add_decal_group(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        self.add_group(scene, asset_id, GraphShape::DecalGroup)
    }

    pub fn add_atlas_group(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        self.add_group(scene, asset_id, GraphShape::AtlasGroup)
    }

    pub fn add_imperfection_group(&mut self, scene: &mut SceneDb, asset_id: &str) -> Report {
        self.add_group(scene, asset_id, GraphShape::ImperfectionGroup)
    }

    fn add_group(&mut self, scene: &mut SceneDb, asset_id: &str, shape: GraphShape) -> Report {
        let result = self.try_add_group(scene, asset_id, shape);
        finish("add_group", asset_id, result)
    }

    fn try_import_surface(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        apply_material: bool,
        mark_asset: bool,
    ) -> Result<Report> {
        let descriptor = self.expect_type(asset_id, &[AssetType::Surface])?;
        let canonical = descriptor.canonical_name();
        let composition = composer_for(scene, &self.config).compose(
            scene,
            GraphShape::SurfaceMaterial,
            &canonical,
            descriptor.asset_dir(),
        )?;

        let mut warnings = Vec::new();
        if mark_asset && !reconcile::mark_as_asset(scene, &canonical, &descriptor) {
            warnings.push(format!("No preview found for {}", canonical));
        }
        if apply_material {
            let selected: Vec<String> = scene
                .selected_objects
                .iter()
                .filter(|name| scene.objects.get(*name).map(|o| o.kind) == Some(ObjectKind::Mesh))
                .cloned()
                .collect();
            if selected.is_empty() {
                warnings.push("No mesh selected; material not applied".to_string());
            }
            for object in &selected {
                if let Some(mesh) = scene.object_mesh_mut(object) {
                    mesh.set_material(0, &canonical);
                }
            }
        }
        let verb = if composition.created { "Created" } else { "Updated" };
        Ok(Report::info(format!("{} material {}", verb, canonical)).with_warnings(warnings))
    }

    fn try_add_brush_texture(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        assign_to_active_brush: bool,
        use_as_mask: bool,
    ) -> Result<Report> {
        let descriptor = self.expect_type(asset_id, &[AssetType::Brush])?;
        let canonical = descriptor.canonical_name();
        let resolver = TextureResolver::new(self.config.megascans_size);
        let handle = resolver
            .fetch(scene, descriptor.asset_dir(), MapRole::Brush)
            .ok_or_else(|| {
                MaterializeError::MissingAsset(format!("{} has no brush texture", canonical))
            })?;

        scene.textures.insert(
            canonical.clone(),
            Texture {
                name: canonical.clone(),
                image: Some(handle.image),
            },
        );

        let mut warnings = Vec::new();
        if assign_to_active_brush {
            let active = scene.active_brush.clone().unwrap_or_default();
            match scene.brushes.get_mut(&active) {
                Some(brush) if use_as_mask => brush.mask_texture = Some(canonical.clone()),
                Some(brush) => brush.texture = Some(canonical.clone()),
                None => warnings.push("No active brush; texture not assigned".to_string()),
            }
        }
        Ok(Report::info(format!("Added brush texture {}", canonical)).with_warnings(warnings))
    }

    fn try_add_group(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        shape: GraphShape,
    ) -> Result<Report> {
        let descriptor = self.descriptor(asset_id)?;
        if GraphShape::for_asset(descriptor.asset_type, true) != Some(shape) {
            return Err(MaterializeError::UnsupportedAssetType(format!(
                "{} cannot be added as {:?}",
                descriptor.asset_type, shape
            )));
        }
        let canonical = descriptor.canonical_name();
        // Refusals must come before the group is composed.
        check_placement(scene, &canonical)?;
        let composer = composer_for(scene, &self.config);
        let composition = composer.compose(scene, shape, &canonical, descriptor.asset_dir())?;
        let node = place_group_instance(scene, composer.builder(), &composition.name)?;
        Ok(Report::info(format!("Added group {} as node {}", canonical, node)))
    }

    fn import_model(
        &mut self,
        scene: &mut SceneDb,
        asset_id: &str,
        types: &[AssetType],
        shape: GraphShape,
    ) -> Result<Report> {
        let descriptor = self.expect_type(asset_id, types)?;
        let canonical = descriptor.canonical_name();
        let selection = self.config.model.selection();
        let request = ImportRequest {
            asset_id: &descriptor.id,
            canonical: &canonical,
            asset_dir: descriptor.asset_dir(),
            format: self.config.model.format,
            selection: selection.as_deref(),
            hide_materials: self.config.hide_imported_materials,
        };
        let import = import_geometry(scene, &mut self.importer, &request)?;
        let mut warnings = import.warnings.clone();

        let composer = composer_for(scene, &self.config);
        match composer.compose(scene, shape, &canonical, descriptor.asset_dir()) {
            Ok(composition) => import.attach_material(scene, &composition.name),
            Err(e) => warnings.push(e.to_string()),
        }
        if self.config.build_lod_group {
            import.build_lod_groups(scene, composer.builder());
        }
        Ok(Report::info(format!(
            "Imported {} ({} objects)",
            canonical,
            import.objects.len()
        ))
        .with_warnings(warnings))
    }

    fn descriptor(&mut self, asset_id: &str) -> Result<AssetDescriptor> {
        self.index()?
            .get(asset_id)
            .cloned()
            .ok_or_else(|| MaterializeError::UnknownAsset(asset_id.to_string()))
    }

    fn expect_type(&mut self, asset_id: &str, types: &[AssetType]) -> Result<AssetDescriptor> {
        let descriptor = self.descriptor(asset_id)?;
        if !types.contains(&descriptor.asset_type) {
            return Err(MaterializeError::UnsupportedAssetType(format!(
                "{} is a {} asset",
                asset_id, descriptor.asset_type
            )));
        }
        Ok(descriptor)
    }
}

fn composer_for(scene: &SceneDb, config: &Config) -> Composer {
    Composer::new(
        GraphBuilder::new(scene.version),
        TextureResolver::new(config.megascans_size),
    )
}

fn finish(operation: &str, asset_id: &str, result: Result<Report>) -> Report {
    match result {
        Ok(report) => {
            log::info!("{} {}: {}", operation, asset_id, report.message);
            report
        }
        Err(e) => {
            let report = Report::from_error(&e);
            match report.status {
                Status::Cancelled => log::error!("{} {} cancelled: {}", operation, asset_id, e),
                _ => log::warn!("{} {}: {}", operation, asset_id, e),
            }
            report
        }
    }
}
