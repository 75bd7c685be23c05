/// Background refresh and restore
///
/// Both run on a blocking worker and open their own database connection,
/// because rusqlite::Connection cannot be shared with the UI thread.

use tokio::task;
use tracing::info;

use super::metadata::build_generation;
use super::scanner::{normalize_path, FsStorage, StorageSource};
use crate::config::Settings;
use crate::error::{GalleryError, Result};
use crate::state::data::Snapshot;
use crate::state::library::Library;

/// Scan the photo root, store the new generation and return it as a snapshot
pub async fn refresh_library(settings: Settings) -> Result<Snapshot> {
    task::spawn_blocking(move || {
        let source = FsStorage::from_settings(&settings);
        let mut library = Library::open(&settings.database_path())?;
        refresh_with(&source, &mut library, &settings)
    })
    .await
    .map_err(|e| GalleryError::Worker(e.to_string()))?
}

/// Read the last stored generation without scanning
pub async fn restore_library(settings: Settings) -> Result<Snapshot> {
    task::spawn_blocking(move || {
        let library = Library::open(&settings.database_path())?;
        restore_with(&library, &settings)
    })
    .await
    .map_err(|e| GalleryError::Worker(e.to_string()))?
}

/// Scan + persist. Nothing is stored unless the whole scan succeeded.
pub fn refresh_with(source: &dyn StorageSource, library: &mut Library, settings: &Settings) -> Result<Snapshot> {
    info!("🔍 Scanning folder: {}", source.root().display());

    let generation = build_generation(source, settings)?;
    library.replace_generation(source.root(), &generation)?;

    Ok(Snapshot::from_generation(source.root().to_path_buf(), generation))
}

/// Read the stored generation back.
///
/// A catalog scanned from another root than the configured one restores as
/// empty, which makes the caller rescan.
pub fn restore_with(library: &Library, settings: &Settings) -> Result<Snapshot> {
    let scanned_from = match library.scan_root()? {
        Some(root) if normalize_path(&root) == normalize_path(&settings.photo_root) => root,
        Some(root) => {
            info!(
                "📚 Catalog belongs to {}, not {}; rescan needed",
                root.display(),
                settings.photo_root.display()
            );
            return Ok(Snapshot {
                root: settings.photo_root.clone(),
                ..Snapshot::default()
            });
        }
        None => settings.photo_root.clone(),
    };

    let generation = library.load_generation()?;
    info!(
        "📚 Restored {} photos ({} with thumbnails), {} folders from catalog",
        library.photo_count()?,
        generation.photos.len(),
        generation.directories.len()
    );
    Ok(Snapshot::from_generation(scanned_from, generation))
}
