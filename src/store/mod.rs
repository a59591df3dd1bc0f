//! Graph store: the single writer of project state
//!
//! Every mutation goes through a named transition. A transition clones the
//! current snapshot, applies its change, stamps `last_modified`, and swaps
//! the new snapshot in; readers holding an earlier `Arc<Project>` keep a
//! consistent view. All transitions are total: unknown ids are logged and
//! ignored, never raised as errors.

pub mod patch;

use std::sync::Arc;

use chrono::Utc;

use crate::models::{Connection, Highlight, Note, Point, Project};
use crate::reconcile;

pub use patch::NotePatch;

/// Owns the authoritative project snapshot and applies transitions to it
#[derive(Debug, Clone)]
pub struct GraphStore {
    current: Arc<Project>,
    revision: u64,
}

impl GraphStore {
    /// Wrap an existing project (typically loaded through the persistence port)
    pub fn new(project: Project) -> Self {
        Self {
            current: Arc::new(project),
            revision: 0,
        }
    }

    /// Start an empty project with the two special notes seeded
    pub fn with_title(title: &str) -> Self {
        Self::new(Project::new(title))
    }

    /// The latest committed snapshot. Cheap to clone; stays consistent while
    /// later transitions commit new snapshots.
    pub fn snapshot(&self) -> Arc<Project> {
        Arc::clone(&self.current)
    }

    /// Monotonic change counter, bumped once per committed transition.
    /// Pollers compare revisions to detect change cheaply.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn commit(&mut self, mut next: Project) {
        next.last_modified = Utc::now();
        self.current = Arc::new(next);
        self.revision += 1;
    }

    pub fn add_highlight(&mut self, highlight: Highlight) {
        if self.current.highlight(&highlight.id).is_some() {
            log::warn!("add_highlight: duplicate id {}, ignoring", highlight.id);
            return;
        }
        log::debug!("add_highlight {}", highlight.id);
        let mut next = (*self.current).clone();
        next.poem.highlights.push(highlight);
        self.commit(next);
    }

    pub fn remove_highlight(&mut self, id: &str) {
        if self.current.highlight(id).is_none() {
            log::debug!("remove_highlight: unknown id {}, no-op", id);
            return;
        }
        let mut next = (*self.current).clone();
        next.poem.highlights.retain(|h| h.id != id);
        self.commit(next);
    }

    pub fn add_note(&mut self, note: Note) {
        if self.current.note(&note.id).is_some() {
            log::warn!("add_note: duplicate id {}, ignoring", note.id);
            return;
        }
        log::debug!("add_note {}", note.id);
        let mut next = (*self.current).clone();
        next.notes.push(note);
        self.commit(next);
    }

    /// Merge partial fields into an existing note; no-op for unknown ids
    pub fn update_note(&mut self, id: &str, patch: NotePatch) {
        if self.current.note(id).is_none() {
            log::debug!("update_note: unknown id {}, no-op", id);
            return;
        }
        let mut next = (*self.current).clone();
        if let Some(note) = next.note_mut(id) {
            patch.apply(note);
        }
        self.commit(next);
    }

    pub fn update_note_position(&mut self, id: &str, position: Point) {
        if self.current.note(id).is_none() {
            log::debug!("update_note_position: unknown id {}, no-op", id);
            return;
        }
        let mut next = (*self.current).clone();
        if let Some(note) = next.note_mut(id) {
            note.position = position;
        }
        self.commit(next);
    }

    /// Delete a note and strip every reference to it, atomically:
    /// its id leaves every highlight's `note_ids` (highlights emptied out are
    /// dropped), every connection touching it goes, and every other note's
    /// `linked_notes` forgets it. Special notes are never deleted.
    ///
    /// Deletion does not prune newly-orphaned neighbors; that is the
    /// reconciler's job on the next content change.
    pub fn delete_note(&mut self, id: &str) {
        let note = match self.current.note(id) {
            Some(n) => n,
            None => {
                log::debug!("delete_note: unknown id {}, no-op", id);
                return;
            }
        };
        if note.is_special() {
            log::warn!("delete_note: {} is a special note, refusing", id);
            return;
        }
        log::info!("delete_note {}", id);

        let mut next = (*self.current).clone();
        for highlight in &mut next.poem.highlights {
            highlight.note_ids.retain(|n| n != id);
        }
        next.poem.highlights.retain(|h| !h.note_ids.is_empty());
        next.connections.retain(|c| !c.touches(id));
        for other in &mut next.notes {
            other.linked_notes.retain(|n| n != id);
        }
        next.notes.retain(|n| n.id != id);
        self.commit(next);
    }

    /// Add a directed link; idempotent when the link already exists
    pub fn link_notes(&mut self, from_id: &str, to_id: &str) {
        if self.current.note(from_id).is_none() || self.current.note(to_id).is_none() {
            log::debug!("link_notes: unknown endpoint {} -> {}, no-op", from_id, to_id);
            return;
        }
        if self
            .current
            .note(from_id)
            .map(|n| n.linked_notes.iter().any(|l| l == to_id))
            .unwrap_or(false)
        {
            return;
        }
        let mut next = (*self.current).clone();
        if let Some(from) = next.note_mut(from_id) {
            from.linked_notes.push(to_id.to_string());
        }
        self.commit(next);
    }

    /// Remove a directed link and any connection exactly matching it
    pub fn unlink_notes(&mut self, from_id: &str, to_id: &str) {
        if self.current.note(from_id).is_none() {
            log::debug!("unlink_notes: unknown id {}, no-op", from_id);
            return;
        }
        let mut next = (*self.current).clone();
        if let Some(from) = next.note_mut(from_id) {
            from.linked_notes.retain(|l| l != to_id);
        }
        next.connections
            .retain(|c| !(c.from_note_id == from_id && c.to_note_id == to_id));
        self.commit(next);
    }

    /// Append a connection. No deduplication: two identical directed edges
    /// may coexist if created twice.
    pub fn add_connection(&mut self, connection: Connection) {
        log::debug!(
            "add_connection {} -> {}",
            connection.from_note_id,
            connection.to_note_id
        );
        let mut next = (*self.current).clone();
        next.connections.push(connection);
        self.commit(next);
    }

    pub fn remove_connection(&mut self, id: &str) {
        if !self.current.connections.iter().any(|c| c.id == id) {
            log::debug!("remove_connection: unknown id {}, no-op", id);
            return;
        }
        let mut next = (*self.current).clone();
        next.connections.retain(|c| c.id != id);
        self.commit(next);
    }

    pub fn toggle_collapse(&mut self, id: &str) {
        if self.current.note(id).is_none() {
            log::debug!("toggle_collapse: unknown id {}, no-op", id);
            return;
        }
        let mut next = (*self.current).clone();
        if let Some(note) = next.note_mut(id) {
            note.collapsed = !note.collapsed;
        }
        self.commit(next);
    }

    /// Replace the poem content and reconcile the graph against it within
    /// the same transition
    pub fn set_document_content(&mut self, content: &str) {
        log::debug!("set_document_content ({} bytes)", content.len());
        let mut next = (*self.current).clone();
        next.poem.content = content.to_string();
        reconcile::reconcile(&mut next);
        self.commit(next);
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::with_title("Untitled")
    }
}
