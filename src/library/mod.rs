//! Local asset library: descriptor parsing, indexing, caching and previews.

pub mod cache;
pub mod descriptor;
pub mod index;

pub use cache::{IndexCache, Preview, PreviewCache};
pub use descriptor::{AssetDescriptor, AssetType, CategoryTree, MetaEntry};
pub use index::{paginate, LibraryIndex, Page, ALL};

use serde::Serialize;
use std::path::PathBuf;

/// Everything the details popup shows for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetails {
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub asset_type: AssetType,
    pub directory: PathBuf,
    pub preview: PathBuf,
    pub preview_size: Option<[u32; 2]>,
    pub tags: Vec<String>,
    /// `(label, value)` pairs in descriptor order.
    pub meta: Vec<(String, String)>,
}

impl AssetDetails {
    pub fn new(descriptor: &AssetDescriptor, preview: &Preview) -> Self {
        let meta = descriptor
            .meta
            .iter()
            .map(|m| {
                let label = m.name.clone().unwrap_or_else(|| m.key.clone());
                let value = match &m.value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (label, value)
            })
            .collect();
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            canonical_name: descriptor.canonical_name(),
            asset_type: descriptor.asset_type,
            directory: descriptor.parent_dir.clone(),
            preview: preview.path.clone(),
            preview_size: preview.size,
            tags: descriptor.tags.clone(),
            meta,
        }
    }
}
