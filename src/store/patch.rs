//! Patch-based partial updates for notes
//!
//! The presentation layer edits one field at a time (content while typing,
//! width while resizing); a patch carries only the fields to merge so the
//! store can apply it without clobbering the rest of the note.

use serde::{Deserialize, Serialize};

use crate::models::{Note, Point};

/// A partial update merged into an existing note. `None` fields are left
/// untouched.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub content: Option<String>,
    pub position: Option<Point>,
    pub width: Option<f64>,
    pub collapsed: Option<bool>,
    pub text_references: Option<Vec<String>>,
    pub linked_notes: Option<Vec<String>>,
}

impl NotePatch {
    pub fn content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            ..Default::default()
        }
    }

    /// Merge this patch into a note, stamping `updated_at`
    pub fn apply(self, note: &mut Note) {
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(position) = self.position {
            note.position = position;
        }
        if let Some(width) = self.width {
            note.width = width;
        }
        if let Some(collapsed) = self.collapsed {
            note.collapsed = collapsed;
        }
        if let Some(text_references) = self.text_references {
            note.text_references = text_references;
        }
        if let Some(linked_notes) = self.linked_notes {
            note.linked_notes = linked_notes;
        }
        note.updated_at = chrono::Utc::now();
    }
}
