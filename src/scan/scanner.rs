/// Storage enumeration
///
/// The scanner only ever looks at the immediate children of the photo root:
/// child folders (content or thumbnail overlay) and the image files directly
/// inside a given folder. Anything deeper is ignored.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Settings;
use crate::error::{GalleryError, Result};

/// A file or folder as reported by the storage layer
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub name: String,
    pub path: PathBuf,
    /// Size in bytes (0 for folders)
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// The two capabilities the indexer needs from the platform
pub trait StorageSource {
    /// The folder being browsed
    fn root(&self) -> &Path;

    /// Immediate child folders of the root
    fn list_directories(&self) -> Result<Vec<RawEntry>>;

    /// Image files directly inside `dir`
    fn list_images(&self, dir: &Path) -> Result<Vec<RawEntry>>;
}

/// Child folders of the root, split by role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryScan {
    pub content: Vec<RawEntry>,
    pub thumbnails: Vec<RawEntry>,
}

/// Local filesystem implementation of [`StorageSource`]
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            extensions,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.photo_root.clone(), settings.image_extensions.clone())
    }

    /// Walk one level below `dir`, keeping entries accepted by `keep`.
    ///
    /// A missing folder yields nothing; a folder we may not read is an error.
    fn children(&self, dir: &Path, keep: impl Fn(&walkdir::DirEntry) -> bool) -> Result<Vec<RawEntry>> {
        if let Err(err) = fs::read_dir(dir) {
            return unreadable(dir, err);
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("⚠️  Skipping unreadable entry in {}: {}", dir.display(), err);
                    continue;
                }
            };

            if !keep(&entry) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!("⚠️  No metadata for {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            let modified = metadata
                .modified()
                .map(|time| {
                    // Whole seconds, so stored and scanned values compare equal
                    let time: DateTime<Utc> = time.into();
                    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
                })
                .unwrap_or_default();

            entries.push(RawEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path().to_path_buf(),
                size: if metadata.is_file() { metadata.len() } else { 0 },
                modified,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl StorageSource for FsStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list_directories(&self) -> Result<Vec<RawEntry>> {
        self.children(&self.root, |entry| entry.file_type().is_dir())
    }

    fn list_images(&self, dir: &Path) -> Result<Vec<RawEntry>> {
        self.children(dir, |entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| {
                        let ext = ext.to_string_lossy();
                        self.extensions.iter().any(|allowed| allowed.as_str() == ext.as_ref())
                    })
                    .unwrap_or(false)
        })
    }
}

/// Outcome of a folder that could not be opened.
///
/// Only a permission failure is an error; anything else reads as empty.
fn unreadable(dir: &Path, err: io::Error) -> Result<Vec<RawEntry>> {
    match err.kind() {
        ErrorKind::NotFound => {
            debug!("Skipping missing folder {}", dir.display());
            Ok(Vec::new())
        }
        ErrorKind::PermissionDenied => Err(GalleryError::PermissionDenied(dir.to_path_buf())),
        _ => {
            warn!("⚠️  Cannot read {}: {}", dir.display(), err);
            Ok(Vec::new())
        }
    }
}

/// Split the root's child folders into content and thumbnail overlay sets.
///
/// Names starting with `thumbnail_prefix` are overlays; any other hidden
/// (dot-prefixed) folder is dropped.
pub fn scan_directories(source: &dyn StorageSource, thumbnail_prefix: &str) -> Result<DirectoryScan> {
    let mut scan = DirectoryScan::default();

    for entry in source.list_directories()? {
        if !thumbnail_prefix.is_empty() && entry.name.starts_with(thumbnail_prefix) {
            scan.thumbnails.push(entry);
        } else if entry.name.starts_with('.') {
            debug!("Ignoring hidden folder {}", entry.name);
        } else {
            scan.content.push(entry);
        }
    }

    debug!(
        "🔍 Found {} folders, {} thumbnail folders in {}",
        scan.content.len(),
        scan.thumbnails.len(),
        source.root().display()
    );
    Ok(scan)
}

/// Comparable form of a path: forward slashes, no trailing separator.
///
/// Case is kept, so `Vacation` and `vacation` stay two folders.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_string()
}
