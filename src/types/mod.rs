//! Shared types used throughout the library.

mod role;
mod tier;
mod version;

pub use role::{ColorSpacePolicy, MapRole};
pub use tier::ResolutionTier;
pub use version::HostVersion;

/// Build the canonical name used to key collections, materials and node groups.
///
/// `"Red Brick"`, `"abcd1234"` -> `"red_brick_abcd1234"`.
pub fn canonical_name(name: &str, id: &str) -> String {
    format!("{}_{}", slug(name), id)
}

/// Lowercase a display name and replace spaces with underscores.
pub fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
