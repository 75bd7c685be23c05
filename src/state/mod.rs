/// State management module
///
/// This module handles all application state, including:
/// - Database connections and queries (library.rs)
/// - Shared data structures (data.rs)
/// - Grid ordering and thumbnail lookup (grid.rs)
/// - Directory navigation and refresh bookkeeping (navigation.rs)

pub mod data;
pub mod grid;
pub mod library;
pub mod navigation;
