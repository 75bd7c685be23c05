/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the scanner, the database layer and the UI layer.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Identifier of the gallery root (always the bottom of the path stack)
pub const ROOT_ID: &str = "";

/// Represents a single image file in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    /// Unique ID, derived from locator, size and modification time
    pub id: String,
    /// Pixel width (0 if the header could not be read)
    pub width: u32,
    /// Pixel height (0 if the header could not be read)
    pub height: u32,
    /// Filename only (e.g., "beach.png")
    pub name: String,
    /// MIME type guessed from the extension
    pub mime_type: String,
    /// Full path to the image file
    pub locator: String,
    /// ID of the containing directory, empty for root-level photos
    pub parent_id: String,
    /// Last modification time of the file
    pub modified: DateTime<Utc>,
    /// True for pre-rendered thumbnails living in an overlay directory
    pub is_thumbnail: bool,
}

/// Represents a folder directly below the photo root
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    /// Unique ID, derived from the normalized path
    pub id: String,
    /// Folder name only (e.g., "Vacation")
    pub name: String,
    /// Full path to the folder
    pub path: String,
    /// True for thumbnail overlay folders
    pub is_thumbnail: bool,
}

/// The complete set of records produced by one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub photos: Vec<Photo>,
    pub directories: Vec<Directory>,
}

/// Immutable working set for one scan generation.
///
/// Content records and the thumbnail overlay are kept apart so the grid never
/// has to filter overlay entries out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub root: PathBuf,
    pub photos: Vec<Photo>,
    pub directories: Vec<Directory>,
    pub overlay_photos: Vec<Photo>,
    pub overlay_directories: Vec<Directory>,
}

impl Snapshot {
    /// Split a generation into content and overlay sets
    pub fn from_generation(root: PathBuf, generation: Generation) -> Self {
        let (overlay_photos, photos): (Vec<Photo>, Vec<Photo>) = generation
            .photos
            .into_iter()
            .partition(|photo| photo.is_thumbnail);
        let (overlay_directories, directories): (Vec<Directory>, Vec<Directory>) = generation
            .directories
            .into_iter()
            .partition(|dir| dir.is_thumbnail);

        Self {
            root,
            photos,
            directories,
            overlay_photos,
            overlay_directories,
        }
    }

    /// Content directory by ID
    pub fn directory(&self, id: &str) -> Option<&Directory> {
        self.directories.iter().find(|dir| dir.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.directories.is_empty()
    }
}

/// What a grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridItemKind {
    Folder,
    Photo,
}

/// Display-ready record consumed by the grid view
#[derive(Debug, Clone, PartialEq)]
pub struct GridItem {
    pub kind: GridItemKind,
    pub name: String,
    /// ID of the Directory or Photo this cell was built from
    pub source_id: String,
    /// Decode target: thumbnail overlay if one exists, else the photo itself
    pub image_locator: Option<String>,
}
