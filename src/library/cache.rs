//! Descriptor and preview caches.

use super::index::LibraryIndex;
use crate::error::{MaterializeError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug)]
struct CachedIndex {
    path: PathBuf,
    modified: SystemTime,
    index: LibraryIndex,
}

/// Keeps the last parsed index keyed on `(path, mtime)`.
///
/// Touching the descriptor file makes the next [`IndexCache::get`] rebuild.
#[derive(Debug, Default)]
pub struct IndexCache {
    entry: Option<CachedIndex>,
    rebuilds: usize,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index for `path`, rebuilt if the file changed since the last call.
    pub fn get(&mut self, path: &Path) -> Result<&LibraryIndex> {
        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                self.entry = None;
                return Err(MaterializeError::MissingDescriptor(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let fresh = matches!(&self.entry, Some(c) if c.path == path && c.modified == modified);
        if !fresh {
            log::debug!("Descriptor cache miss for {}", path.display());
            let index = match LibraryIndex::load(path) {
                Ok(index) => index,
                Err(e) => {
                    self.entry = None;
                    return Err(e);
                }
            };
            self.rebuilds += 1;
            self.entry = Some(CachedIndex {
                path: path.to_path_buf(),
                modified,
                index,
            });
        }
        match &self.entry {
            Some(cached) => Ok(&cached.index),
            None => Err(MaterializeError::MissingDescriptor(path.display().to_string())),
        }
    }

    /// Number of times an index was (re)built.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Drop the cached index.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// A gallery preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub path: PathBuf,
    /// Pixel dimensions; `None` if the file could not be decoded.
    pub size: Option<[u32; 2]>,
}

/// Preview handles keyed by image path.
#[derive(Debug, Default)]
pub struct PreviewCache {
    previews: HashMap<PathBuf, Preview>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the preview for `path`.
    pub fn get_or_load(&mut self, path: &Path) -> &Preview {
        self.previews.entry(path.to_path_buf()).or_insert_with(|| {
            let size = match crate::texture::probe_dimensions(path) {
                Ok(size) => Some(size),
                Err(e) => {
                    log::debug!("Preview {} not decodable: {}", path.display(), e);
                    None
                }
            };
            Preview {
                path: path.to_path_buf(),
                size,
            }
        })
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    pub fn clear(&mut self) {
        self.previews.clear();
    }
}
