//! # Megascans Materializer
//!
//! Turns a local library of scanned assets into shader graphs, collections
//! and LOD switches inside a host scene.
//!
//! ## Overview
//!
//! The library reads the `assetsData.json` descriptor file of a downloaded
//! asset library, and for a chosen asset builds the host-side structures:
//! a material or node group wired from its texture maps, the imported
//! geometry organized into collections, and an optional geometry-nodes
//! switch that picks an LOD by camera distance. Every entry point is
//! idempotent: running it twice leaves the scene as running it once.
//!
//! ## Quick Start
//!
//! ```ignore
//! use megascans_materializer::{Config, Materializer, SceneDb, AssetType};
//!
//! let config = Config::from_file("megascans.json")?;
//! let mut materializer = Materializer::new(config);
//!
//! // Browse the library
//! let listing = materializer.list(AssetType::Surface, None, None, Some("brick"), 1);
//!
//! // Build a material for the first hit
//! let mut scene = SceneDb::default();
//! let report = materializer.import_surface(&mut scene, &listing.assets[0].id, false, false);
//! println!("{}", report);
//! ```
//!
//! ## Host Integration
//!
//! The scene is modelled by [`SceneDb`]. Hosts that import model files
//! themselves implement [`ModelImporter`] and hand it to
//! [`Materializer::with_importer`]:
//!
//! ```ignore
//! use megascans_materializer::{ImportOptions, Materializer, ModelImporter, SceneDb};
//!
//! struct HostImporter;
//!
//! impl ModelImporter for HostImporter {
//!     fn import(&mut self, scene: &mut SceneDb, path: &Path, options: &ImportOptions)
//!         -> megascans_materializer::Result<Vec<String>> {
//!         /* ... */
//!     }
//! }
//!
//! let materializer = Materializer::with_importer(config, HostImporter);
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod graph;
pub mod host;
pub mod import;
pub mod library;
pub mod lod;
pub mod materializer;
pub mod reconcile;
pub mod texture;
pub mod types;

// Re-export main types for convenience
pub use compose::{Composer, Composition, GraphShape};
pub use config::{Config, ModelConfig, ModelFormat};
pub use error::{MaterializeError, Result, Severity};
pub use graph::GraphBuilder;
pub use host::{SceneDb, TreeRef};
pub use import::{ImportOptions, ModelImporter, StemImporter};
pub use library::{AssetDescriptor, AssetDetails, AssetType, LibraryIndex};
pub use materializer::{Listing, Materializer, Mode, Report, Status};
pub use texture::TextureResolver;
pub use types::{HostVersion, MapRole, ResolutionTier};

/// Load and index a descriptor file.
pub fn load_library<P: AsRef<std::path::Path>>(path: P) -> Result<LibraryIndex> {
    LibraryIndex::load(path)
}
