/// Navigation view-model
///
/// Holds the working set of the current session (an immutable snapshot of
/// one scan generation), the stack of visited directories and the grid for
/// the directory on top of that stack.

use std::sync::Arc;
use tracing::{debug, warn};

use super::data::{GridItem, Snapshot, ROOT_ID};
use super::grid;
use crate::error::{GalleryError, Result};

/// Proof that a refresh was started; needed to apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

#[derive(Debug)]
pub struct Navigator {
    snapshot: Arc<Snapshot>,
    /// Visited directory IDs; `path[0]` is always the root
    path: Vec<String>,
    items: Vec<GridItem>,
    root_label: String,
    next_ticket: u64,
    in_flight: Option<RefreshTicket>,
}

impl Navigator {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            snapshot: Arc::new(Snapshot::default()),
            path: vec![ROOT_ID.to_string()],
            items: Vec::new(),
            root_label: root_label.into(),
            next_ticket: 0,
            in_flight: None,
        }
    }

    /// Open a directory and show its contents.
    ///
    /// Returns false (and stays put) if the ID is not a content directory of
    /// the current generation. The root is always accepted.
    pub fn enter(&mut self, directory_id: &str) -> bool {
        if directory_id != ROOT_ID && self.snapshot.directory(directory_id).is_none() {
            warn!("⚠️  Unknown directory {}", directory_id);
            return false;
        }

        self.path.push(directory_id.to_string());
        self.recompute();
        true
    }

    /// Go up one level.
    ///
    /// At the root this returns false: the host decides what "back" means there.
    pub fn back(&mut self) -> bool {
        if self.path.len() <= 1 {
            return false;
        }
        self.path.pop();
        self.recompute();
        true
    }

    /// Start a refresh. Only one may run at a time.
    pub fn begin_refresh(&mut self) -> Result<RefreshTicket> {
        if self.in_flight.is_some() {
            return Err(GalleryError::RefreshInFlight);
        }
        self.next_ticket += 1;
        let ticket = RefreshTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Apply the result of a refresh and return to the root.
    ///
    /// Returns false if `ticket` is not the refresh currently in flight; the
    /// snapshot is then dropped.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, snapshot: Arc<Snapshot>) -> bool {
        if self.in_flight != Some(ticket) {
            debug!("Discarding stale refresh {:?}", ticket);
            return false;
        }
        self.in_flight = None;
        self.install(snapshot);
        true
    }

    /// Give up on a refresh that failed; the current working set stays.
    pub fn abort_refresh(&mut self, ticket: RefreshTicket) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Install a snapshot read back from the catalog
    pub fn restore(&mut self, snapshot: Arc<Snapshot>) {
        self.install(snapshot);
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_directory_id(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or(ROOT_ID)
    }

    /// Number of entries on the path stack (1 at the root)
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn items(&self) -> &[GridItem] {
        &self.items
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Name of the current directory, or the root label
    pub fn folder_title(&self) -> String {
        self.snapshot
            .directory(self.current_directory_id())
            .map(|dir| dir.name.clone())
            .unwrap_or_else(|| self.root_label.clone())
    }

    fn install(&mut self, snapshot: Arc<Snapshot>) {
        self.snapshot = snapshot;
        self.path.clear();
        self.enter(ROOT_ID);
    }

    fn recompute(&mut self) {
        self.items = grid::present(&self.snapshot, self.current_directory_id());
    }
}
