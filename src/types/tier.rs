//! Texture resolution tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A textual resolution marker embedded in texture filenames.
///
/// Tiers are totally ordered: `1K < 2K < 4K < 8K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[serde(rename = "1K", alias = "1k")]
    K1,
    #[serde(rename = "2K", alias = "2k")]
    K2,
    #[serde(rename = "4K", alias = "4k")]
    K4,
    #[serde(rename = "8K", alias = "8k")]
    K8,
}

impl Default for ResolutionTier {
    fn default() -> Self {
        ResolutionTier::K2
    }
}

impl ResolutionTier {
    /// All tiers from highest to lowest.
    pub const DESCENDING: [ResolutionTier; 4] = [
        ResolutionTier::K8,
        ResolutionTier::K4,
        ResolutionTier::K2,
        ResolutionTier::K1,
    ];

    /// The marker as it appears in filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTier::K1 => "1K",
            ResolutionTier::K2 => "2K",
            ResolutionTier::K4 => "4K",
            ResolutionTier::K8 => "8K",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "1K" => Some(ResolutionTier::K1),
            "2K" => Some(ResolutionTier::K2),
            "4K" => Some(ResolutionTier::K4),
            "8K" => Some(ResolutionTier::K8),
            _ => None,
        }
    }

    /// Search order when this tier is preferred: this tier first, then the
    /// remaining tiers from highest to lowest.
    pub fn search_order(self) -> [ResolutionTier; 4] {
        let mut order = [self; 4];
        let mut i = 1;
        for tier in Self::DESCENDING {
            if tier != self {
                order[i] = tier;
                i += 1;
            }
        }
        order
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
