//! Host version tuple.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the host application.
///
/// Node and socket APIs changed shape across host releases; the graph builder
/// takes this tuple explicitly and branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Default for HostVersion {
    fn default() -> Self {
        Self::new(4, 2, 0)
    }
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Whether `self >= (major, minor)`.
    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }

    /// Group interfaces are an item tree with panels (4.0+), not flat lists.
    pub fn has_interface_panels(&self) -> bool {
        self.at_least(4, 0)
    }

    /// The generic Mix node replaced MixRGB in 3.4.
    pub fn has_mix_node(&self) -> bool {
        self.at_least(3, 4)
    }

    /// Principled BSDF inputs were renamed in 4.0.
    pub fn has_principled_v2(&self) -> bool {
        self.at_least(4, 0)
    }

    /// The Switch node gained a single typed False/True pair in 4.1.
    pub fn has_unified_switch(&self) -> bool {
        self.at_least(4, 1)
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
