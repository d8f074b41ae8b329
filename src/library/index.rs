//! In-memory library index: category buckets, search and pagination.

use super::descriptor::{AssetDescriptor, AssetType};
use crate::error::{MaterializeError, Result};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Bucket key collecting every category or subcategory.
pub const ALL: &str = "ALL";

type Buckets = BTreeMap<AssetType, BTreeMap<String, BTreeMap<String, Vec<usize>>>>;

/// Parsed descriptor file, organized for browsing.
#[derive(Debug, Clone)]
pub struct LibraryIndex {
    path: PathBuf,
    assets: Vec<AssetDescriptor>,
    by_id: HashMap<String, usize>,
    buckets: Buckets,
}

impl LibraryIndex {
    /// Load and index a descriptor file.
    ///
    /// The file must hold a JSON array. Malformed entries and entries whose
    /// preview image is missing on disk are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MaterializeError::MissingDescriptor(format!("{}: {}", path.display(), e))
        })?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            MaterializeError::MissingDescriptor(format!("{}: {}", path.display(), e))
        })?;
        let serde_json::Value::Array(entries) = value else {
            return Err(MaterializeError::MissingDescriptor(format!(
                "{}: expected a JSON array",
                path.display()
            )));
        };

        let mut descriptors = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            match AssetDescriptor::from_value(entry) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => log::warn!("Skipping descriptor entry {} in {}: {}", i, path.display(), e),
            }
        }
        let index = Self::from_descriptors(path, descriptors);
        log::info!("Indexed {} assets from {}", index.len(), path.display());
        Ok(index)
    }

    /// Index already-parsed descriptors, dropping those without a preview file.
    pub fn from_descriptors(path: impl Into<PathBuf>, descriptors: Vec<AssetDescriptor>) -> Self {
        let mut index = Self {
            path: path.into(),
            assets: Vec::new(),
            by_id: HashMap::new(),
            buckets: Buckets::new(),
        };
        for descriptor in descriptors {
            if !descriptor.preview_path().is_file() {
                log::debug!("Dropping {}: no preview at {:?}", descriptor.id, descriptor.preview_path());
                continue;
            }
            if index.by_id.contains_key(&descriptor.id) {
                log::warn!("Duplicate asset id {}; keeping the first entry", descriptor.id);
                continue;
            }
            index.insert(descriptor);
        }
        index
    }

    fn insert(&mut self, descriptor: AssetDescriptor) {
        let idx = self.assets.len();
        let by_type = self.buckets.entry(descriptor.asset_type).or_default();
        push_unique(by_type.entry(ALL.to_string()).or_default().entry(ALL.to_string()).or_default(), idx);
        for (category, subcategory) in descriptor.category_pairs() {
            let by_category = by_type.entry(category).or_default();
            push_unique(by_category.entry(ALL.to_string()).or_default(), idx);
            if let Some(sub) = subcategory {
                push_unique(by_category.entry(sub).or_default(), idx);
            }
        }
        self.by_id.insert(descriptor.id.clone(), idx);
        self.assets.push(descriptor);
    }

    /// Descriptor file this index was built from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// All indexed assets in file order.
    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    /// Look up an asset by id.
    pub fn get(&self, id: &str) -> Option<&AssetDescriptor> {
        self.by_id.get(id).map(|&idx| &self.assets[idx])
    }

    /// Categories known for an asset type, `ALL` first.
    pub fn categories(&self, asset_type: AssetType) -> Vec<&str> {
        self.buckets
            .get(&asset_type)
            .map(|by_category| sorted_keys(by_category.keys()))
            .unwrap_or_default()
    }

    /// Subcategories of a category, `ALL` first.
    pub fn subcategories(&self, asset_type: AssetType, category: &str) -> Vec<&str> {
        self.buckets
            .get(&asset_type)
            .and_then(|by_category| by_category.get(category))
            .map(|by_sub| sorted_keys(by_sub.keys()))
            .unwrap_or_default()
    }

    /// List assets of one type.
    ///
    /// A non-empty `search` matches `search_string` as a case-insensitive
    /// regex across the whole type; otherwise the category bucket is returned
    /// (`None` selects `ALL`).
    pub fn query(
        &self,
        asset_type: AssetType,
        category: Option<&str>,
        subcategory: Option<&str>,
        search: Option<&str>,
    ) -> Vec<&AssetDescriptor> {
        if let Some(pattern) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let Some(matcher) = search_regex(pattern) else {
                return Vec::new();
            };
            return self
                .assets
                .iter()
                .filter(|a| a.asset_type == asset_type && matcher.is_match(&a.search_string))
                .collect();
        }

        let category = category.unwrap_or(ALL);
        let subcategory = subcategory.unwrap_or(ALL);
        self.buckets
            .get(&asset_type)
            .and_then(|by_category| by_category.get(category))
            .and_then(|by_sub| by_sub.get(subcategory))
            .map(|ids| ids.iter().map(|&idx| &self.assets[idx]).collect())
            .unwrap_or_default()
    }
}

fn push_unique(bucket: &mut Vec<usize>, idx: usize) {
    if bucket.last() != Some(&idx) {
        bucket.push(idx);
    }
}

fn sorted_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = keys.map(|k| k.as_str()).filter(|k| *k != ALL).collect();
    keys.insert(0, ALL);
    keys
}

/// Case-insensitive regex; patterns that fail to compile match literally.
fn search_regex(pattern: &str) -> Option<Regex> {
    let build = |p: &str| RegexBuilder::new(p).case_insensitive(true).build();
    build(pattern)
        .or_else(|e| {
            log::debug!("Search pattern {:?} is not a valid regex ({}); matching literally", pattern, e);
            build(&regex::escape(pattern))
        })
        .ok()
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-indexed page number after clamping.
    pub page: usize,
    pub total_pages: usize,
}

/// Slice `list` into 1-indexed pages of `page_size`, clamping `page` into range.
pub fn paginate<T>(list: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = list.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(list.len());
    let end = (start + page_size).min(list.len());
    Page {
        items: &list[start..end],
        page,
        total_pages,
    }
}
