//! LOD file enumeration and the distance-based LOD switch.
//!
//! Scanned models ship one file per level of detail: `<id>_LOD<N>.<ext>` at
//! the asset root (optionally `<id>_LOD<N>_<part>.<ext>` for multi-part
//! assets), or one `Var<M>` directory per variant holding `..LOD<N>.<ext>`.

pub mod switch;

pub use switch::{build_lod_switch, evaluate, exposed_distances, LodObject};

use crate::config::{ModelFormat, MAX_LOD};
use std::path::{Path, PathBuf};

/// One model file to import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LodFile {
    pub lod: u8,
    pub path: PathBuf,
    /// Variant directory name (`Var1`, ...) for variant layouts.
    pub variant: Option<String>,
}

impl LodFile {
    /// File name without extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Object name an importer should give this file's mesh.
    ///
    /// Root files already carry the asset id; variant files are qualified
    /// with it so `Var1/LOD0` of two assets never collide.
    pub fn import_name(&self, asset_id: &str) -> String {
        let stem = self.stem();
        match &self.variant {
            Some(variant) if !stem.contains(asset_id) => format!("{}_{}_{}", asset_id, variant, stem),
            _ => stem,
        }
    }
}

/// Result of scanning an asset directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LodPlan {
    /// LOD levels that were looked for, ascending.
    pub levels: Vec<u8>,
    /// Files found, ordered by LOD level, then variant, then name.
    pub files: Vec<LodFile>,
    /// Levels with no file that lie below the highest level found.
    pub missing: Vec<u8>,
}

impl LodPlan {
    /// The level the asset cannot be imported without (lowest requested).
    pub fn primary(&self) -> u8 {
        self.levels.first().copied().unwrap_or(0)
    }

    /// Whether any file exists for `lod`.
    pub fn has_lod(&self, lod: u8) -> bool {
        self.files.iter().any(|f| f.lod == lod)
    }

    /// Levels with at least one file, ascending.
    pub fn found_levels(&self) -> Vec<u8> {
        let mut levels: Vec<u8> = self.files.iter().map(|f| f.lod).collect();
        levels.dedup();
        levels
    }

    /// Variant directory names in import order (empty for root layouts).
    pub fn variants(&self) -> Vec<&str> {
        let mut variants: Vec<&str> = Vec::new();
        for name in self.files.iter().filter_map(|f| f.variant.as_deref()) {
            if !variants.contains(&name) {
                variants.push(name);
            }
        }
        variants
    }
}

/// Decide which model files to import from `asset_dir`.
///
/// `selection` is an explicit set of levels; `None` means every level from 0
/// to 8, truncated to the file count of the first variant directory when the
/// asset uses a variant layout.
pub fn enumerate(asset_dir: &Path, format: ModelFormat, selection: Option<&[u8]>) -> LodPlan {
    let ext = format.extension();
    let root_files = model_files(asset_dir, ext);
    let variant_dirs = variant_dirs(asset_dir);

    let levels: Vec<u8> = match selection {
        Some(lods) if !lods.is_empty() => {
            let mut lods: Vec<u8> = lods.iter().copied().filter(|l| *l <= MAX_LOD).collect();
            lods.sort_unstable();
            lods.dedup();
            lods
        }
        Some(_) => vec![0],
        None => {
            let count = variant_dirs
                .first()
                .map(|(_, dir)| model_files(dir, ext).len())
                .filter(|count| *count > 0)
                .unwrap_or(MAX_LOD as usize + 1);
            (0..=MAX_LOD).take(count).collect()
        }
    };

    let mut files = Vec::new();
    for &lod in &levels {
        let at_root: Vec<&PathBuf> = root_files
            .iter()
            .filter(|p| file_name(p).map(|n| has_lod_marker(&n, lod)).unwrap_or(false))
            .collect();
        if !at_root.is_empty() {
            files.extend(at_root.into_iter().map(|path| LodFile {
                lod,
                path: path.clone(),
                variant: None,
            }));
            continue;
        }
        for (name, dir) in &variant_dirs {
            let suffix = format!("lod{}.{}", lod, ext);
            let found = model_files(dir, ext).into_iter().find(|p| {
                file_name(p)
                    .map(|n| n.to_lowercase().ends_with(&suffix))
                    .unwrap_or(false)
            });
            if let Some(path) = found {
                files.push(LodFile {
                    lod,
                    path,
                    variant: Some(name.clone()),
                });
            }
        }
    }

    let highest = files.iter().map(|f| f.lod).max();
    let explicit = matches!(selection, Some(lods) if !lods.is_empty());
    let missing: Vec<u8> = levels
        .iter()
        .copied()
        .filter(|lod| !files.iter().any(|f| f.lod == *lod))
        .filter(|lod| explicit || *lod == 0 || highest.map(|h| *lod < h).unwrap_or(false))
        .collect();
    for lod in &missing {
        log::warn!("LOD{} not found in {:?}", lod, asset_dir);
    }

    LodPlan {
        levels,
        files,
        missing,
    }
}

/// Whether `name` contains `_LOD<lod>` not followed by another digit.
fn has_lod_marker(name: &str, lod: u8) -> bool {
    let marker = format!("_LOD{}", lod);
    name.match_indices(&marker).any(|(i, _)| {
        !name[i + marker.len()..]
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    })
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Files in `dir` with extension `ext` (case-insensitive), sorted by name.
fn model_files(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Subdirectories whose name contains "var", ordered by their integer suffix.
fn variant_dirs(asset_dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(asset_dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<(u32, String, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            if !name.to_lowercase().contains("var") {
                return None;
            }
            let digits: String = name
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_digit())
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let number = digits.parse().unwrap_or(u32::MAX);
            Some((number, name, e.path()))
        })
        .collect();
    dirs.sort();
    dirs.into_iter().map(|(_, name, path)| (name, path)).collect()
}
