//! Asset descriptor parsing.
//!
//! Descriptors come from the library's `assetsData.json`, a JSON array with
//! one object per asset.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Kind of library asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AssetType {
    #[serde(rename = "3d")]
    Model,
    #[serde(rename = "3dplant")]
    Plant,
    #[serde(rename = "surface")]
    Surface,
    #[serde(rename = "decal")]
    Decal,
    #[serde(rename = "atlas")]
    Atlas,
    #[serde(rename = "imperfection")]
    Imperfection,
    #[serde(rename = "displacement")]
    Displacement,
    #[serde(rename = "brush")]
    Brush,
}

impl AssetType {
    /// All asset types.
    pub const ALL: [AssetType; 8] = [
        AssetType::Model,
        AssetType::Plant,
        AssetType::Surface,
        AssetType::Decal,
        AssetType::Atlas,
        AssetType::Imperfection,
        AssetType::Displacement,
        AssetType::Brush,
    ];

    /// Key used in descriptor files and category trees.
    pub fn key(&self) -> &'static str {
        match self {
            AssetType::Model => "3d",
            AssetType::Plant => "3dplant",
            AssetType::Surface => "surface",
            AssetType::Decal => "decal",
            AssetType::Atlas => "atlas",
            AssetType::Imperfection => "imperfection",
            AssetType::Displacement => "displacement",
            AssetType::Brush => "brush",
        }
    }

    /// Parse from a descriptor key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "3d" | "3d-asset" => Some(AssetType::Model),
            "3dplant" | "3d-plant" => Some(AssetType::Plant),
            "surface" => Some(AssetType::Surface),
            "decal" => Some(AssetType::Decal),
            "atlas" => Some(AssetType::Atlas),
            "imperfection" => Some(AssetType::Imperfection),
            "displacement" => Some(AssetType::Displacement),
            "brush" => Some(AssetType::Brush),
            _ => None,
        }
    }

    /// Whether assets of this type carry geometry.
    pub fn has_geometry(&self) -> bool {
        matches!(self, AssetType::Model | AssetType::Plant)
    }
}

impl<'de> Deserialize<'de> for AssetType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        AssetType::from_key(&key).ok_or_else(|| {
            serde::de::Error::unknown_variant(
                &key,
                &["3d", "3dplant", "surface", "decal", "atlas", "imperfection", "displacement", "brush"],
            )
        })
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// One `{key, value}` metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Categories per asset type: `asset_type -> category -> {subcategories}`.
pub type CategoryTree = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

/// An immutable library entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub id: String,
    /// Display name; falls back to the id.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(rename = "parentDir")]
    pub parent_dir: PathBuf,
    /// Preview path segments relative to `parent_dir`.
    #[serde(default)]
    pub preview: Vec<String>,
    #[serde(rename = "searchStr", default)]
    pub search_string: String,
    #[serde(rename = "assetCategories", default, deserialize_with = "deserialize_categories")]
    pub categories: CategoryTree,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "semanticTags", default)]
    pub semantic_tags: serde_json::Value,
    #[serde(default)]
    pub meta: Vec<MetaEntry>,
}

impl AssetDescriptor {
    /// Parse one descriptor from a JSON value, filling the name fallback.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let mut descriptor: AssetDescriptor = serde_json::from_value(value)?;
        if descriptor.name.trim().is_empty() {
            descriptor.name = descriptor.id.clone();
        }
        Ok(descriptor)
    }

    /// Canonical name keying this asset's collections, materials and groups.
    pub fn canonical_name(&self) -> String {
        crate::types::canonical_name(&self.name, &self.id)
    }

    /// Directory holding the asset's files.
    pub fn asset_dir(&self) -> &std::path::Path {
        &self.parent_dir
    }

    /// Full path of the preview image.
    pub fn preview_path(&self) -> PathBuf {
        self.preview
            .iter()
            .fold(self.parent_dir.clone(), |path, segment| path.join(segment))
    }

    /// Look up a metadata value by key.
    pub fn meta_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.meta.iter().find(|m| m.key == key).map(|m| &m.value)
    }

    /// `(category, subcategory)` pairs for this asset's own type.
    ///
    /// Categories without subcategories yield an empty subcategory. Type keys
    /// are matched the same way as the `type` field.
    pub fn category_pairs(&self) -> Vec<(String, Option<String>)> {
        let mut pairs = Vec::new();
        let own = self
            .categories
            .iter()
            .filter(|(key, _)| AssetType::from_key(key) == Some(self.asset_type));
        for (_, categories) in own {
            for (category, subcategories) in categories {
                if subcategories.is_empty() {
                    pairs.push((category.clone(), None));
                }
                for sub in subcategories {
                    pairs.push((category.clone(), Some(sub.clone())));
                }
            }
        }
        pairs.sort();
        pairs.dedup();
        pairs
    }
}

/// Accept any nesting under `assetCategories`, keeping the first three levels.
fn deserialize_categories<'de, D>(deserializer: D) -> Result<CategoryTree, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let mut tree = CategoryTree::new();
    if let serde_json::Value::Object(types) = value {
        for (asset_type, categories) in types {
            let entry = tree.entry(asset_type).or_default();
            if let serde_json::Value::Object(categories) = categories {
                for (category, subcategories) in categories {
                    let subs = entry.entry(category).or_default();
                    if let serde_json::Value::Object(subcategories) = subcategories {
                        subs.extend(subcategories.keys().cloned());
                    }
                }
            }
        }
    }
    Ok(tree)
}
