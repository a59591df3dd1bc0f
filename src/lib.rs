//! Poetry annotation core
//!
//! Backs a poetry-annotation tool: a graph store owning highlights, notes
//! and connections; a reconciler that prunes the graph when text anchors
//! disappear; a layout engine that places note cards without overlap; and
//! connector geometry between anchors and notes.
//!
//! The rich-text surface, UI chrome and storage transport are external
//! collaborators reached through the [`connector::GeometryProvider`] and
//! [`persistence::PersistencePort`] traits.

pub mod connector;
pub mod layout;
pub mod models;
pub mod persistence;
pub mod reconcile;
pub mod store;

// Re-export commonly used types
pub use models::{Connection, Highlight, Note, NoteType, Point, Poem, Project, Rect};
pub use store::{GraphStore, NotePatch};
