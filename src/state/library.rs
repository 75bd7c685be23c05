use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::data::{Directory, Generation, Photo};
use crate::error::Result;

const META_SCAN_ROOT: &str = "scan_root";

/// The Library manages the SQLite catalog database.
/// It stores the Photo and Directory records of the latest scan generation.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog at `db_path` and initialize the schema.
    pub fn open(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Database opened at: {}", db_path.display());

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Catalog that lives only as long as this value (tests, dry runs)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let library = Library {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id              TEXT PRIMARY KEY,
                width           INTEGER NOT NULL,
                height          INTEGER NOT NULL,
                name            TEXT NOT NULL,
                mime_type       TEXT NOT NULL,
                locator         TEXT NOT NULL,
                parent_id       TEXT NOT NULL DEFAULT '',
                modified        INTEGER NOT NULL,
                is_thumbnail    INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS directories (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                path            TEXT NOT NULL,
                is_thumbnail    INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        // Facts about the stored generation (currently: the scanned root)
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS catalog_meta (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            )",
            [],
        )?;

        // Thumbnail lookups go by name
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_name
             ON photos(name)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_parent_id
             ON photos(parent_id)",
            [],
        )?;

        debug!("✅ Database schema initialized");
        Ok(())
    }

    /// Count the photos in the catalog, thumbnails excluded
    pub fn photo_count(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE is_thumbnail = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert or replace a batch of photos in one transaction
    pub fn upsert_photos(&mut self, photos: &[Photo]) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_photos(&tx, photos)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert or replace a batch of directories in one transaction
    pub fn upsert_directories(&mut self, directories: &[Directory]) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_directories(&tx, directories)?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete_all_photos(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM photos", [])?)
    }

    pub fn delete_all_directories(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM directories", [])?)
    }

    /// Swap the stored generation for a new one scanned from `root`.
    ///
    /// Delete and insert share a single transaction, so a failure leaves the
    /// previous generation (and its root) untouched.
    pub fn replace_generation(&mut self, root: &Path, generation: &Generation) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM photos", [])?;
        tx.execute("DELETE FROM directories", [])?;
        insert_directories(&tx, &generation.directories)?;
        insert_photos(&tx, &generation.photos)?;
        tx.execute(
            "INSERT OR REPLACE INTO catalog_meta (key, value) VALUES (?1, ?2)",
            params![META_SCAN_ROOT, root.to_string_lossy().to_string()],
        )?;
        tx.commit()?;

        info!(
            "💾 Stored generation: {} photos, {} directories",
            generation.photos.len(),
            generation.directories.len()
        );
        Ok(())
    }

    /// Root folder the stored generation was scanned from, if any
    pub fn scan_root(&self) -> Result<Option<PathBuf>> {
        let root: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM catalog_meta WHERE key = ?1",
                params![META_SCAN_ROOT],
                |row| row.get(0),
            )
            .optional()?;
        Ok(root.map(PathBuf::from))
    }

    /// Get all photos (thumbnails included)
    pub fn all_photos(&self) -> Result<Vec<Photo>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, width, height, name, mime_type, locator, parent_id, modified, is_thumbnail
             FROM photos ORDER BY name, locator",
        )?;

        let photos = stmt
            .query_map([], photo_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(photos)
    }

    /// Get all directories (thumbnail overlays included)
    pub fn all_directories(&self) -> Result<Vec<Directory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, path, is_thumbnail FROM directories ORDER BY name, path",
        )?;

        let directories = stmt
            .query_map([], |row| {
                Ok(Directory {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    path: row.get(2)?,
                    is_thumbnail: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(directories)
    }

    /// Read the stored generation back in bulk
    pub fn load_generation(&self) -> Result<Generation> {
        Ok(Generation {
            photos: self.all_photos()?,
            directories: self.all_directories()?,
        })
    }
}

fn insert_photos(tx: &Transaction<'_>, photos: &[Photo]) -> Result<()> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO photos
         (id, width, height, name, mime_type, locator, parent_id, modified, is_thumbnail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for photo in photos {
        stmt.execute(params![
            photo.id,
            photo.width,
            photo.height,
            photo.name,
            photo.mime_type,
            photo.locator,
            photo.parent_id,
            photo.modified.timestamp(),
            photo.is_thumbnail,
        ])?;
    }
    Ok(())
}

fn insert_directories(tx: &Transaction<'_>, directories: &[Directory]) -> Result<()> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO directories (id, name, path, is_thumbnail)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for dir in directories {
        stmt.execute(params![dir.id, dir.name, dir.path, dir.is_thumbnail])?;
    }
    Ok(())
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<Photo> {
    let modified: i64 = row.get(7)?;
    Ok(Photo {
        id: row.get(0)?,
        width: row.get(1)?,
        height: row.get(2)?,
        name: row.get(3)?,
        mime_type: row.get(4)?,
        locator: row.get(5)?,
        parent_id: row.get(6)?,
        modified: DateTime::from_timestamp(modified, 0).unwrap_or_default(),
        is_thumbnail: row.get(8)?,
    })
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
