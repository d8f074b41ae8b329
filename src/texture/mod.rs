//! Texture file resolution and image loading.
//!
//! Scanned assets ship their maps as `<...><TIER>_<Suffix>.<ext>` somewhere
//! under the asset directory. The resolver finds the best tier for a role,
//! loads it into the scene (reusing images already present) and applies the
//! role's colorspace policy. Nothing here fails: a missing map is `None`.

use crate::error::Result;
use crate::host::{Image, SceneDb};
use crate::types::{ColorSpacePolicy, MapRole, ResolutionTier};
use std::path::{Path, PathBuf};

/// Directories searched for texture files, relative to the asset directory.
pub const SEARCH_DIRS: [&str; 5] = ["", "Textures/Atlas", "Thumbs/4k", "Thumbs/2k", "Thumbs/1k"];

/// Image extensions in order of preference.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["exr", "jpg"];

/// View transforms under which Non-Color assignment is safe.
pub const KNOWN_VIEW_TRANSFORMS: [&str; 7] = [
    "Standard",
    "Khronos PBR Neutral",
    "AgX",
    "Filmic",
    "Filmic Log",
    "False Color",
    "Raw",
];

/// Colorspace name for raw data maps.
pub const NON_COLOR: &str = "Non-Color";

/// A loaded image as seen by the composers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    /// Image datum name (the file name).
    pub image: String,
    pub filepath: PathBuf,
    pub colorspace: String,
    pub loaded: bool,
}

/// Finds and loads texture maps for one preferred tier.
#[derive(Debug, Clone, Copy)]
pub struct TextureResolver {
    preferred: ResolutionTier,
}

impl TextureResolver {
    pub fn new(preferred: ResolutionTier) -> Self {
        Self { preferred }
    }

    pub fn preferred(&self) -> ResolutionTier {
        self.preferred
    }

    /// Find the filename stem for `role`, trying tiers in search order.
    pub fn resolve(&self, asset_dir: &Path, role: MapRole) -> Option<String> {
        let files: Vec<String> = SEARCH_DIRS
            .iter()
            .flat_map(|dir| list_file_names(&asset_dir.join(dir)))
            .collect();

        for tier in self.preferred.search_order() {
            let needle = format!("{}_{}", tier.as_str(), role.suffix());
            if let Some(file) = files.iter().find(|f| f.contains(&needle) && is_loadable(f)) {
                let stem = Path::new(file)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| file.clone());
                log::debug!("Resolved {} in {:?} as {}", role, asset_dir, stem);
                return Some(stem);
            }
        }
        None
    }

    /// Load the image for `stem`, preferring `.exr` over `.jpg`.
    ///
    /// Images already in the scene under the same file name are reused.
    pub fn load(
        &self,
        scene: &mut SceneDb,
        asset_dir: &Path,
        stem: &str,
        role: MapRole,
    ) -> Option<TextureHandle> {
        for ext in IMAGE_EXTENSIONS {
            let file_name = format!("{}.{}", stem, ext);
            for dir in SEARCH_DIRS {
                let path = asset_dir.join(dir).join(&file_name);
                if !path.is_file() {
                    continue;
                }
                let view_transform = scene.view_transform.clone();
                let image = scene
                    .images
                    .entry(file_name.clone())
                    .or_insert_with(|| new_image(&file_name, &path, ext));
                apply_colorspace(image, role, &view_transform);
                return Some(TextureHandle {
                    image: image.name.clone(),
                    filepath: image.filepath.clone(),
                    colorspace: image.colorspace.clone(),
                    loaded: image.loaded,
                });
            }
        }
        log::warn!("Texture {} resolved but no .exr/.jpg found in {:?}", stem, asset_dir);
        None
    }

    /// Resolve and load in one step.
    pub fn fetch(&self, scene: &mut SceneDb, asset_dir: &Path, role: MapRole) -> Option<TextureHandle> {
        let stem = self.resolve(asset_dir, role)?;
        self.load(scene, asset_dir, &stem, role)
    }
}

/// Colorspace an image should carry for `role` under `view_transform`.
///
/// Returns `None` when the current colorspace must be left untouched.
pub fn colorspace_for(role: MapRole, view_transform: &str) -> Option<&'static str> {
    match role.colorspace() {
        ColorSpacePolicy::SrgbDefault => None,
        ColorSpacePolicy::NonColor => KNOWN_VIEW_TRANSFORMS
            .contains(&view_transform)
            .then_some(NON_COLOR),
    }
}

fn apply_colorspace(image: &mut Image, role: MapRole, view_transform: &str) {
    if let Some(colorspace) = colorspace_for(role, view_transform) {
        image.colorspace = colorspace.to_string();
    }
}

/// Pixel dimensions of an image file, read from its header.
pub fn probe_dimensions(path: &Path) -> Result<[u32; 2]> {
    let (width, height) = image::image_dimensions(path)?;
    Ok([width, height])
}

/// Whether `load` can pick this file up.
fn is_loadable(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn new_image(name: &str, path: &Path, ext: &str) -> Image {
    let size = match probe_dimensions(path) {
        Ok(size) => Some(size),
        Err(e) => {
            log::debug!("Could not probe {:?}: {}", path, e);
            None
        }
    };
    let colorspace = if ext == "exr" { "Linear Rec.709" } else { "sRGB" };
    log::debug!("Loading image {} from {:?}", name, path);
    Image {
        name: name.to_string(),
        filepath: path.to_path_buf(),
        colorspace: colorspace.to_string(),
        loaded: true,
        size,
    }
}

/// File names directly inside `dir`, sorted. Missing directories yield nothing.
fn list_file_names(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
