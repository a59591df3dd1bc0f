//! Core data structures for the poetry annotation graph
//!
//! A Highlight records a text range (anchor) in the poem and the notes that
//! reference it. Notes are free-floating annotation cards that may reference
//! highlights and link to other notes; Connections materialize individual
//! note-to-note links for rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Point;

/// Default width of a note card in pixels
pub const DEFAULT_NOTE_WIDTH: f64 = 280.0;

/// A highlighted text span in the poem, addressed by an anchor marker
/// embedded in the document content
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,

    /// Line of the poem the span starts on (0-based)
    pub line_index: usize,

    /// Character offset of the span start within the line
    pub start_offset: usize,

    /// Character offset one past the span end
    pub end_offset: usize,

    /// Snapshot of the highlighted text at creation time
    pub text: String,

    /// Display color assigned when the highlight was created, if any
    #[serde(default)]
    pub color: Option<String>,

    /// Ids of notes referencing this highlight. Every entry must name a live
    /// note; a highlight whose set empties out is garbage and gets dropped.
    #[serde(default)]
    pub note_ids: Vec<String>,
}

impl Highlight {
    /// Create a new highlight with a fresh id and no referencing notes
    pub fn new(line_index: usize, start_offset: usize, end_offset: usize, text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            line_index,
            start_offset,
            end_offset,
            text: text.to_string(),
            color: None,
            note_ids: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// The kind of a note. The two special kinds exist exactly once per project,
/// are never deleted, and are exempt from reconciliation pruning.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NoteType {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "context")]
    Context,
    #[serde(rename = "personal-response")]
    PersonalResponse,
}

impl NoteType {
    /// Special notes are permanent: excluded from deletion and pruning
    pub fn is_special(&self) -> bool {
        !matches!(self, NoteType::None)
    }
}

/// A free-floating annotation card
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,

    /// Free-text body of the note
    pub content: String,

    /// Top-left corner on the canvas. The origin (0, 0) means "not yet
    /// placed" to the layout engine.
    #[serde(default)]
    pub position: Point,

    #[serde(default = "default_note_width")]
    pub width: f64,

    #[serde(default)]
    pub collapsed: bool,

    /// Ids of highlights this note annotates
    #[serde(default)]
    pub text_references: Vec<String>,

    /// Directed out-edges to other notes
    #[serde(default)]
    pub linked_notes: Vec<String>,

    #[serde(rename = "type", default)]
    pub note_type: NoteType,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_note_width() -> f64 {
    DEFAULT_NOTE_WIDTH
}

impl Note {
    /// Create a new ordinary note with a fresh id at the unplaced origin
    pub fn new(content: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            position: Point::default(),
            width: DEFAULT_NOTE_WIDTH,
            collapsed: false,
            text_references: Vec::new(),
            linked_notes: Vec::new(),
            note_type: NoteType::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create one of the two permanent special notes
    pub fn special(note_type: NoteType) -> Self {
        let mut note = Self::new("");
        note.note_type = note_type;
        note
    }

    pub fn is_special(&self) -> bool {
        self.note_type.is_special()
    }
}

/// A directed, renderable edge between two notes.
///
/// Connections mirror a subset of `linked_notes` and are not deduplicated:
/// creating the same directed edge twice yields two coexisting connections.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub from_note_id: String,
    pub to_note_id: String,
}

impl Connection {
    pub fn new(from_note_id: &str, to_note_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from_note_id: from_note_id.to_string(),
            to_note_id: to_note_id.to_string(),
        }
    }

    /// True if either endpoint is the given note
    pub fn touches(&self, note_id: &str) -> bool {
        self.from_note_id == note_id || self.to_note_id == note_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&NoteType::PersonalResponse).unwrap(),
            "\"personal-response\""
        );
        assert_eq!(serde_json::to_string(&NoteType::None).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::from_str::<NoteType>("\"context\"").unwrap(),
            NoteType::Context
        );
    }

    #[test]
    fn test_special_note_detection() {
        assert!(Note::special(NoteType::Context).is_special());
        assert!(!Note::new("ordinary").is_special());
    }

    #[test]
    fn test_connection_touches() {
        let c = Connection::new("a", "b");
        assert!(c.touches("a"));
        assert!(c.touches("b"));
        assert!(!c.touches("c"));
    }
}
