/// Photo indexing module
///
/// This module handles:
/// - Enumerating folders and image files below the photo root
/// - Building Photo and Directory records with stable IDs
/// - Running scan + persist off the UI thread

pub mod metadata;
pub mod refresh;
pub mod scanner;
