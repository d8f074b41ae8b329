//! Error types for asset materialization.

use thiserror::Error;

/// Result type alias using MaterializeError.
pub type Result<T> = std::result::Result<T, MaterializeError>;

/// How far a failure reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation (or one piece of it) is skipped; the scene is left as it was.
    Soft,
    /// The operation is cancelled before any scene mutation.
    Hard,
}

/// Main error type for library and materialization operations.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// The descriptor file is absent or is not a JSON array.
    #[error("Asset descriptor file missing or unreadable: {0}")]
    MissingDescriptor(String),

    /// No descriptor carries the requested asset id.
    #[error("Unknown asset id: {0}")]
    UnknownAsset(String),

    /// A primary file of the asset (LOD0, or every texture map) is absent.
    #[error("{0}")]
    MissingAsset(String),

    /// A role-specific texture is absent.
    #[error("Missing texture: {0}")]
    MissingTexture(String),

    /// An existing mesh, material or node collides with a canonical name.
    #[error("Name conflict: {0}")]
    NameConflict(String),

    /// The target node tree cannot receive the requested group.
    #[error("Invalid node tree: {0}")]
    InvalidNodeTree(String),

    /// The entry point does not handle this kind of asset.
    #[error("Unsupported asset type for this operation: {0}")]
    UnsupportedAssetType(String),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or probe an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MaterializeError {
    /// Classify this error for the front-end.
    pub fn severity(&self) -> Severity {
        match self {
            MaterializeError::MissingTexture(_) | MaterializeError::NameConflict(_) => {
                Severity::Soft
            }
            _ => Severity::Hard,
        }
    }
}
