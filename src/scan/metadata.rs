/// Metadata builder
///
/// Turns the raw entries reported by a [`StorageSource`] into the Photo and
/// Directory records of one scan generation, with identifiers and parent
/// linkage resolved.

use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::scanner::{normalize_path, scan_directories, RawEntry, StorageSource};
use crate::config::Settings;
use crate::error::{GalleryError, Result};
use crate::state::data::{Directory, Generation, Photo, ROOT_ID};

/// Scan the source and build a complete generation.
///
/// Photos come from the root itself, every content folder and every thumbnail
/// folder. A photo that cannot be linked to a folder aborts the whole pass.
pub fn build_generation(source: &dyn StorageSource, settings: &Settings) -> Result<Generation> {
    let scan = scan_directories(source, &settings.thumbnail_prefix)?;

    let mut directories: Vec<Directory> = scan
        .content
        .iter()
        .map(|entry| build_directory(entry, false))
        .collect();
    directories.extend(scan.thumbnails.iter().map(|entry| build_directory(entry, true)));

    let mut photos = Vec::new();
    let root = source.root();

    for entry in source.list_images(root)? {
        photos.push(build_photo(&entry, root, &directories, false)?);
    }
    for dir in &scan.content {
        for entry in source.list_images(&dir.path)? {
            photos.push(build_photo(&entry, root, &directories, false)?);
        }
    }
    for dir in &scan.thumbnails {
        for entry in source.list_images(&dir.path)? {
            photos.push(build_photo(&entry, root, &directories, true)?);
        }
    }

    // Name order keeps thumbnail lookups deterministic
    photos.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.locator.cmp(&b.locator)));

    info!(
        "✅ Scanned {}: {} photos in {} folders",
        root.display(),
        photos.len(),
        directories.len()
    );

    Ok(Generation { photos, directories })
}

/// Resolve the folder a photo lives in.
///
/// Paths are compared after normalization, case included. The root maps to
/// [`ROOT_ID`].
pub fn link_parent(photo_name: &str, parent: &Path, root: &Path, directories: &[Directory]) -> Result<String> {
    let parent_key = normalize_path(parent);

    if parent_key == normalize_path(root) {
        return Ok(ROOT_ID.to_string());
    }

    directories
        .iter()
        .find(|dir| normalize_path(Path::new(&dir.path)) == parent_key)
        .map(|dir| dir.id.clone())
        .ok_or_else(|| GalleryError::LinkResolution {
            photo: photo_name.to_string(),
            parent: parent.display().to_string(),
        })
}

fn build_directory(entry: &RawEntry, is_thumbnail: bool) -> Directory {
    Directory {
        id: directory_id(&entry.path),
        name: entry.name.clone(),
        path: entry.path.to_string_lossy().to_string(),
        is_thumbnail,
    }
}

fn build_photo(entry: &RawEntry, root: &Path, directories: &[Directory], is_thumbnail: bool) -> Result<Photo> {
    let parent = entry.path.parent().unwrap_or(root);
    let parent_id = link_parent(&entry.name, parent, root, directories)?;
    let locator = entry.path.to_string_lossy().to_string();

    let (width, height) = match image::image_dimensions(&entry.path) {
        Ok(dims) => dims,
        Err(err) => {
            debug!("No dimensions for {}: {}", entry.name, err);
            (0, 0)
        }
    };

    let photo = Photo {
        id: photo_id(&locator, entry.size, entry.modified.timestamp()),
        width,
        height,
        name: entry.name.clone(),
        mime_type: mime_type_for(&entry.path).to_string(),
        locator,
        parent_id,
        modified: entry.modified,
        is_thumbnail,
    };

    if photo.width == 0 && !photo.is_thumbnail {
        warn!("⚠️  Unreadable image header: {}", photo.locator);
    }
    Ok(photo)
}

/// Stable photo ID: same file, same size, same mtime → same ID
pub fn photo_id(locator: &str, size: u64, modified: i64) -> String {
    let key = format!("{}|{}|{}", locator, size, modified);
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
}

/// Stable directory ID derived from the normalized path
pub fn directory_id(path: &Path) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, normalize_path(path).as_bytes()).to_string()
}

/// MIME type from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scanner::FsStorage;
    use std::collections::HashSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(path).unwrap();
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("Vacation")).unwrap();
        fs::create_dir(root.join("Work")).unwrap();
        fs::create_dir(root.join(".thumbnails")).unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();
        write_png(&root.join("Vacation").join("beach.png"), 4, 3);
        write_png(&root.join(".thumbnails").join("beach.png"), 2, 1);
        write_png(&root.join(".hidden").join("secret.png"), 1, 1);
        fs::write(root.join("selfie.jpg"), b"not really a jpeg").unwrap();
        dir
    }

    fn build(root: &Path) -> Generation {
        let source = FsStorage::new(root, vec!["jpg".to_string(), "png".to_string()]);
        build_generation(&source, &Settings::default()).unwrap()
    }

    #[test]
    fn test_every_parent_references_a_directory() {
        let dir = sample_tree();
        let generation = build(dir.path());

        let ids: HashSet<_> = generation.directories.iter().map(|d| d.id.as_str()).collect();
        for photo in &generation.photos {
            assert!(
                photo.parent_id.is_empty() || ids.contains(photo.parent_id.as_str()),
                "dangling parent for {}",
                photo.name
            );
        }
    }

    #[test]
    fn test_builds_photo_attributes() {
        let dir = sample_tree();
        let generation = build(dir.path());

        let vacation = generation.directories.iter().find(|d| d.name == "Vacation").unwrap();
        let beach = generation
            .photos
            .iter()
            .find(|p| p.name == "beach.png" && !p.is_thumbnail)
            .unwrap();

        assert_eq!((beach.width, beach.height), (4, 3));
        assert_eq!(beach.mime_type, "image/png");
        assert_eq!(beach.parent_id, vacation.id);
        assert!(beach.locator.ends_with("beach.png"));

        let selfie = generation.photos.iter().find(|p| p.name == "selfie.jpg").unwrap();
        assert_eq!(selfie.parent_id, ROOT_ID);
        assert_eq!(selfie.mime_type, "image/jpeg");
        assert_eq!((selfie.width, selfie.height), (0, 0));
    }

    #[test]
    fn test_overlay_and_hidden_folders() {
        let dir = sample_tree();
        let generation = build(dir.path());

        let overlay: Vec<_> = generation.directories.iter().filter(|d| d.is_thumbnail).collect();
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay[0].name, ".thumbnails");

        let thumbs: Vec<_> = generation.photos.iter().filter(|p| p.is_thumbnail).collect();
        assert_eq!(thumbs.len(), 1);
        assert_eq!(thumbs[0].parent_id, overlay[0].id);

        assert!(generation.directories.iter().all(|d| d.name != ".hidden"));
        assert!(generation.photos.iter().all(|p| p.name != "secret.png"));
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let dir = sample_tree();
        let first = build(dir.path());
        let second = build(dir.path());

        let ids: HashSet<_> = first.photos.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), first.photos.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_link_parent_exact_match() {
        let root = PathBuf::from("/storage/DCIM");
        let dirs = vec![
            Directory {
                id: "cam".to_string(),
                name: "Camera".to_string(),
                path: "/storage/DCIM/Camera".to_string(),
                is_thumbnail: false,
            },
            Directory {
                id: "cam2".to_string(),
                name: "Camera2".to_string(),
                path: "/storage/DCIM/Camera2".to_string(),
                is_thumbnail: false,
            },
        ];

        assert_eq!(link_parent("a.jpg", &root, &root, &dirs).unwrap(), ROOT_ID);
        assert_eq!(
            link_parent("a.jpg", Path::new("/storage/DCIM/Camera2/"), &root, &dirs).unwrap(),
            "cam2"
        );
        assert_eq!(
            link_parent("a.jpg", Path::new("/storage/DCIM/Camera"), &root, &dirs).unwrap(),
            "cam"
        );
    }

    #[test]
    fn test_link_parent_unknown_folder_fails() {
        let root = PathBuf::from("/storage/DCIM");
        let err = link_parent("a.jpg", Path::new("/storage/Other"), &root, &[]).unwrap_err();
        assert!(matches!(err, GalleryError::LinkResolution { .. }));

        let dirs = vec![Directory {
            id: "cam".to_string(),
            name: "Camera".to_string(),
            path: "/storage/DCIM/Camera".to_string(),
            is_thumbnail: false,
        }];
        let err = link_parent("a.jpg", Path::new("/storage/DCIM/camera"), &root, &dirs).unwrap_err();
        assert!(matches!(err, GalleryError::LinkResolution { .. }));
    }

    #[test]
    fn test_folders_differing_in_case_stay_apart() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("Vacation")).unwrap();
        if fs::create_dir(root.join("vacation")).is_err() {
            // Case-insensitive filesystem: only one folder can exist
            return;
        }
        fs::write(root.join("Vacation").join("a.png"), b"png").unwrap();
        fs::write(root.join("vacation").join("b.png"), b"png").unwrap();

        let generation = build(root);
        assert_eq!(generation.directories.len(), 2);

        let upper = generation.directories.iter().find(|d| d.name == "Vacation").unwrap();
        let lower = generation.directories.iter().find(|d| d.name == "vacation").unwrap();
        assert_ne!(upper.id, lower.id);
        assert_ne!(directory_id(Path::new("/p/Vacation")), directory_id(Path::new("/p/vacation")));

        let a = generation.photos.iter().find(|p| p.name == "a.png").unwrap();
        let b = generation.photos.iter().find(|p| p.name == "b.png").unwrap();
        assert_eq!(a.parent_id, upper.id);
        assert_eq!(b.parent_id, lower.id);
    }

    #[test]
    fn test_photo_id_depends_on_content_key() {
        let id = photo_id("/a/b.jpg", 10, 100);
        assert_eq!(id, photo_id("/a/b.jpg", 10, 100));
        assert_ne!(id, photo_id("/a/b.jpg", 11, 100));
        assert_ne!(id, photo_id("/a/b.jpg", 10, 101));
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for(Path::new("x.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("x.png")), "image/png");
        assert_eq!(mime_type_for(Path::new("x")), "application/octet-stream");
    }
}
