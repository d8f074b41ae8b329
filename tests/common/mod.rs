//! Shared on-disk library fixtures.

#![allow(dead_code)]

use megascans_materializer::config::DESCRIPTOR_FILE;
use megascans_materializer::{Config, ResolutionTier};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty file, with parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// A library root in a temp directory with one asset directory per id.
pub struct Library {
    pub dir: TempDir,
    entries: Vec<Value>,
}

impl Library {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            entries: Vec::new(),
        }
    }

    pub fn asset_dir(&self, id: &str) -> PathBuf {
        self.dir.path().join(id)
    }

    /// Register an asset, creating its preview and the given files.
    pub fn add(&mut self, id: &str, name: &str, asset_type: &str, files: &[&str]) -> PathBuf {
        let dir = self.asset_dir(id);
        let preview = format!("{}_Preview.png", id);
        image::RgbaImage::new(2, 2).save(dir_join(&dir, &preview)).unwrap();
        for file in files {
            touch(&dir.join(file));
        }
        self.entries.push(json!({
            "id": id,
            "name": name,
            "type": asset_type,
            "parentDir": dir,
            "preview": [preview],
            "searchStr": format!("{} {}", name.to_lowercase(), id),
            "assetCategories": { asset_type: { "test": { "fixture": {} } } },
            "tags": [asset_type],
        }));
        dir
    }

    /// Write `assetsData.json`.
    pub fn write(&self) -> PathBuf {
        let path = self.dir.path().join(DESCRIPTOR_FILE);
        fs::write(&path, serde_json::to_string(&self.entries).unwrap()).unwrap();
        path
    }

    pub fn config(&self) -> Config {
        self.write();
        Config::new(self.dir.path()).with_size(ResolutionTier::K4)
    }
}

fn dir_join(dir: &Path, file: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    dir.join(file)
}
