//! Front-end configuration.

use crate::error::Result;
use crate::types::ResolutionTier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the descriptor file at the library root.
pub const DESCRIPTOR_FILE: &str = "assetsData.json";

/// Highest LOD level an asset may carry.
pub const MAX_LOD: u8 = 8;

/// Model file format used for geometry imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Model-native format.
    #[default]
    Fbx,
    /// Interchange format; imported at 1/100 scale.
    Abc,
}

impl ModelFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Fbx => "fbx",
            ModelFormat::Abc => "abc",
        }
    }

    /// Uniform scale applied by the host importer.
    pub fn import_scale(&self) -> f32 {
        match self {
            ModelFormat::Fbx => 1.0,
            ModelFormat::Abc => 0.01,
        }
    }
}

/// Geometry import settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Import format.
    pub format: ModelFormat,
    /// Import every LOD from 0 to 8 instead of `lods`.
    pub import_all_lods: bool,
    /// Explicit LOD selection (subset of 0..=8).
    pub lods: Vec<u8>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            format: ModelFormat::Fbx,
            import_all_lods: true,
            lods: vec![0],
        }
    }
}

impl ModelConfig {
    /// The user's LOD selection: `None` means "all 0-8".
    pub fn selection(&self) -> Option<Vec<u8>> {
        if self.import_all_lods {
            return None;
        }
        let mut lods: Vec<u8> = self.lods.iter().copied().filter(|l| *l <= MAX_LOD).collect();
        lods.sort_unstable();
        lods.dedup();
        Some(lods)
    }
}

/// Main configuration supplied by the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory containing `assetsData.json`.
    pub megascans_library_path: PathBuf,
    /// Preferred texture resolution tier.
    pub megascans_size: ResolutionTier,
    /// Geometry import settings.
    pub model: ModelConfig,
    /// Gallery page size.
    pub preview_limit: usize,
    /// Build an LOD switch graph after geometry imports.
    pub build_lod_group: bool,
    /// Hide materials that arrive with imported files from the material browser.
    pub hide_imported_materials: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            megascans_library_path: PathBuf::new(),
            megascans_size: ResolutionTier::K2,
            model: ModelConfig::default(),
            preview_limit: 20,
            build_lod_group: false,
            hide_imported_materials: true,
        }
    }
}

impl Config {
    /// Create a config for a library root with default settings.
    pub fn new(library_path: impl Into<PathBuf>) -> Self {
        Self {
            megascans_library_path: library_path.into(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Path of the descriptor file.
    pub fn descriptor_path(&self) -> PathBuf {
        self.megascans_library_path.join(DESCRIPTOR_FILE)
    }

    /// Gallery page size, never zero.
    pub fn page_size(&self) -> usize {
        self.preview_limit.max(1)
    }

    /// Set the preferred resolution tier.
    pub fn with_size(mut self, tier: ResolutionTier) -> Self {
        self.megascans_size = tier;
        self
    }

    /// Select explicit LODs (disables "import all").
    pub fn with_lods(mut self, lods: &[u8]) -> Self {
        self.model.import_all_lods = false;
        self.model.lods = lods.to_vec();
        self
    }

    /// Set the model import format.
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.model.format = format;
        self
    }

    /// Enable or disable LOD switch graph generation.
    pub fn with_lod_group(mut self, enabled: bool) -> Self {
        self.build_lod_group = enabled;
        self
    }
}
