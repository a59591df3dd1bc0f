//! Project snapshot: the single authoritative state object
//!
//! A `Project` is both the in-memory snapshot the store owns and the shape
//! that gets persisted as JSON. State is only changed through the store's
//! named transitions; a snapshot handed out earlier stays valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::core::{Connection, Highlight, Note, NoteType};

/// Current project file format version
pub const PROJECT_VERSION: u32 = 1;

/// The poem text and the highlights anchored in it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Poem {
    /// Rich-text content with embedded anchor markers. Owned by the external
    /// document model; the core only replaces it wholesale.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub highlights: Vec<Highlight>,
}

/// Complete project state, also the persisted JSON shape
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
    pub version: u32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub poem: Poem,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Project {
    /// Create an empty project seeded with the two permanent special notes
    pub fn new(title: &str) -> Self {
        let now = Utc::now();
        Self {
            project_id: Uuid::new_v4().to_string(),
            version: PROJECT_VERSION,
            title: title.to_string(),
            created_at: now,
            last_modified: now,
            poem: Poem::default(),
            notes: vec![
                Note::special(NoteType::Context),
                Note::special(NoteType::PersonalResponse),
            ],
            connections: Vec::new(),
        }
    }

    /// Re-seed any missing special note. Invariant: exactly one `context`
    /// and one `personal-response` note exist at all times; import relies on
    /// this after accepting a payload.
    pub fn ensure_special_notes(&mut self) {
        for kind in [NoteType::Context, NoteType::PersonalResponse] {
            if !self.notes.iter().any(|n| n.note_type == kind) {
                log::warn!("project missing special note {:?}, re-seeding", kind);
                self.notes.push(Note::special(kind));
            }
        }
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub fn highlight(&self, id: &str) -> Option<&Highlight> {
        self.poem.highlights.iter().find(|h| h.id == id)
    }

    pub fn highlight_mut(&mut self, id: &str) -> Option<&mut Highlight> {
        self.poem.highlights.iter_mut().find(|h| h.id == id)
    }
}
