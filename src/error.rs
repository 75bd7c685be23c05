/// Error types shared by the scanner, the catalog and the view-model
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The photo root exists but may not be listed
    #[error("Permission denied while reading {}", .0.display())]
    PermissionDenied(PathBuf),

    /// A photo's containing folder matched neither the root nor a scanned directory
    #[error("Cannot link photo {photo} to a directory (parent path: {parent})")]
    LinkResolution { photo: String, parent: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Config(#[from] serde_json::Error),

    /// A refresh was requested while another one is still running
    #[error("A refresh is already in progress")]
    RefreshInFlight,

    #[error("Background task failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
