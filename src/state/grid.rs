/// Grid presenter
///
/// Maps the current directory to the ordered list of cells the grid view
/// draws: folders first, then photos, each group sorted by name.

use std::path::Path;

use super::data::{GridItem, GridItemKind, Photo, Snapshot, ROOT_ID};
use crate::scan::scanner::normalize_path;

/// Build the display list for `directory_id` (empty string = root).
///
/// Unknown directory IDs produce an empty list.
pub fn present(snapshot: &Snapshot, directory_id: &str) -> Vec<GridItem> {
    let context_path = if directory_id == ROOT_ID {
        normalize_path(&snapshot.root)
    } else {
        match snapshot.directory(directory_id) {
            Some(dir) => normalize_path(Path::new(&dir.path)),
            None => return Vec::new(),
        }
    };

    let mut folders: Vec<_> = snapshot
        .directories
        .iter()
        .filter(|dir| {
            Path::new(&dir.path)
                .parent()
                .map(|parent| normalize_path(parent) == context_path)
                .unwrap_or(false)
        })
        .collect();
    folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let mut photos: Vec<_> = snapshot
        .photos
        .iter()
        .filter(|photo| photo.parent_id == directory_id)
        .collect();
    photos.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let folder_items = folders.into_iter().map(|dir| GridItem {
        kind: GridItemKind::Folder,
        name: dir.name.clone(),
        source_id: dir.id.clone(),
        image_locator: None,
    });

    let photo_items = photos.into_iter().map(|photo| GridItem {
        kind: GridItemKind::Photo,
        name: photo.name.clone(),
        source_id: photo.id.clone(),
        image_locator: Some(resolve_thumbnail(photo, &snapshot.overlay_photos).to_string()),
    });

    folder_items.chain(photo_items).collect()
}

/// Pick the decode target for a photo.
///
/// Overlay entries are matched by file name only, regardless of folder; the
/// first match in overlay order wins.
pub fn resolve_thumbnail<'a>(photo: &'a Photo, overlay: &'a [Photo]) -> &'a str {
    overlay
        .iter()
        .find(|thumb| thumb.name == photo.name)
        .map(|thumb| thumb.locator.as_str())
        .unwrap_or(photo.locator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Directory;
    use std::path::PathBuf;

    fn dir(id: &str, name: &str) -> Directory {
        Directory {
            id: id.to_string(),
            name: name.to_string(),
            path: format!("/dcim/{}", name),
            is_thumbnail: false,
        }
    }

    fn photo(id: &str, name: &str, parent_id: &str, locator: &str) -> Photo {
        Photo {
            id: id.to_string(),
            width: 0,
            height: 0,
            name: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            locator: locator.to_string(),
            parent_id: parent_id.to_string(),
            modified: Default::default(),
            is_thumbnail: false,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            root: PathBuf::from("/dcim/"),
            directories: vec![dir("w", "Work"), dir("v", "Vacation")],
            photos: vec![
                photo("p2", "zebra.jpg", "", "/dcim/zebra.jpg"),
                photo("p1", "apple.jpg", "", "/dcim/apple.jpg"),
                photo("p3", "beach.png", "v", "/dcim/Vacation/beach.png"),
            ],
            overlay_photos: vec![photo("t1", "beach.png", "o", "/dcim/.thumbnails/beach.png")],
            overlay_directories: Vec::new(),
        }
    }

    fn names(items: &[GridItem]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn test_root_lists_folders_then_photos() {
        let items = present(&snapshot(), ROOT_ID);
        assert_eq!(names(&items), vec!["Vacation", "Work", "apple.jpg", "zebra.jpg"]);
        assert_eq!(items[0].kind, GridItemKind::Folder);
        assert_eq!(items[0].source_id, "v");
        assert_eq!(items[2].kind, GridItemKind::Photo);
        assert!(items[0].image_locator.is_none());
    }

    #[test]
    fn test_directory_lists_its_photos() {
        let items = present(&snapshot(), "v");
        assert_eq!(names(&items), vec!["beach.png"]);
        assert_eq!(items[0].source_id, "p3");
    }

    #[test]
    fn test_unknown_directory_is_empty() {
        assert!(present(&snapshot(), "missing").is_empty());
    }

    #[test]
    fn test_thumbnail_substitution() {
        let snap = snapshot();
        let beach = &snap.photos[2];
        let apple = &snap.photos[1];

        assert_eq!(resolve_thumbnail(beach, &snap.overlay_photos), "/dcim/.thumbnails/beach.png");
        assert_eq!(resolve_thumbnail(apple, &snap.overlay_photos), "/dcim/apple.jpg");

        let items = present(&snap, "v");
        assert_eq!(items[0].image_locator.as_deref(), Some("/dcim/.thumbnails/beach.png"));
    }

    #[test]
    fn test_groups_are_strictly_ascending() {
        let items = present(&snapshot(), ROOT_ID);
        let split = items
            .iter()
            .position(|item| item.kind == GridItemKind::Photo)
            .unwrap();

        assert!(items[..split].iter().all(|i| i.kind == GridItemKind::Folder));
        assert!(items[split..].iter().all(|i| i.kind == GridItemKind::Photo));
        for group in [&items[..split], &items[split..]] {
            assert!(group.windows(2).all(|w| w[0].name < w[1].name));
        }
    }
}
