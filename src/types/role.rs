//! Texture map roles and their colorspace policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic function of a texture, independent of its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapRole {
    Albedo,
    AmbientOcclusion,
    Roughness,
    Opacity,
    Translucency,
    Normal,
    Displacement,
    Metallic,
    Gloss,
    Mask,
    Brush,
}

/// How an image's colorspace is treated once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpacePolicy {
    /// Keep the host default (sRGB for 8-bit images).
    SrgbDefault,
    /// Raw data; assigned only under a known view transform.
    NonColor,
}

impl MapRole {
    /// All roles in declaration order.
    pub const ALL: [MapRole; 11] = [
        MapRole::Albedo,
        MapRole::AmbientOcclusion,
        MapRole::Roughness,
        MapRole::Opacity,
        MapRole::Translucency,
        MapRole::Normal,
        MapRole::Displacement,
        MapRole::Metallic,
        MapRole::Gloss,
        MapRole::Mask,
        MapRole::Brush,
    ];

    /// Filename suffix following the tier marker, e.g. `4K_Albedo`.
    pub fn suffix(&self) -> &'static str {
        match self {
            MapRole::Albedo => "Albedo",
            MapRole::AmbientOcclusion => "AO",
            MapRole::Roughness => "Roughness",
            MapRole::Opacity => "Opacity",
            MapRole::Translucency => "Translucency",
            MapRole::Normal => "Normal",
            MapRole::Displacement => "Displacement",
            MapRole::Metallic => "Metalness",
            MapRole::Gloss => "Gloss",
            MapRole::Mask => "Mask",
            MapRole::Brush => "Brush",
        }
    }

    /// Stable node name for the image node carrying this role.
    pub fn node_name(&self) -> &'static str {
        match self {
            MapRole::Albedo => "albedo",
            MapRole::AmbientOcclusion => "ao",
            MapRole::Roughness => "roughness",
            MapRole::Opacity => "opacity",
            MapRole::Translucency => "translucency",
            MapRole::Normal => "normal",
            MapRole::Displacement => "displacement",
            MapRole::Metallic => "metallic",
            MapRole::Gloss => "gloss",
            MapRole::Mask => "mask",
            MapRole::Brush => "brush",
        }
    }

    /// Colorspace policy: color maps keep the default, data maps are Non-Color.
    pub fn colorspace(&self) -> ColorSpacePolicy {
        match self {
            MapRole::Albedo | MapRole::Translucency => ColorSpacePolicy::SrgbDefault,
            _ => ColorSpacePolicy::NonColor,
        }
    }
}

impl fmt::Display for MapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_name())
    }
}
