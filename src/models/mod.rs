//! Data models for the annotation graph
//!
//! This module contains all the data structures for highlights, notes,
//! connections, project snapshots, and shared geometry.

pub mod core;
pub mod geometry;
pub mod project;

// Re-export commonly used types
pub use core::{Connection, Highlight, Note, NoteType, DEFAULT_NOTE_WIDTH};
pub use geometry::{Point, Rect};
pub use project::{Poem, Project, PROJECT_VERSION};
