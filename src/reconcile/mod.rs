//! Reconciliation: pruning graph elements the text no longer backs
//!
//! Runs synchronously whenever the document content changes. Highlights
//! whose anchor marker vanished from the content are dropped, then ordinary
//! notes that lost every tie to the graph are removed. Both passes are
//! deliberately single-pass: a note orphaned only by this pass's removals is
//! picked up on the next content change, not re-evaluated now.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Project;

/// Anchor markers embedded by the document surface look like
/// `data-hl="id"` or `data-hl="id1,id2"` when spans share a range.
static ANCHOR_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-hl="([^"]*)""#).expect("anchor marker pattern is valid"));

/// Extract every highlight id that still appears in an anchor marker.
/// Ids co-located on one span are comma-joined inside a single marker.
pub fn anchor_ids(content: &str) -> HashSet<String> {
    let mut ids = HashSet::new();
    for caps in ANCHOR_MARKER.captures_iter(content) {
        for id in caps[1].split(',') {
            let id = id.trim();
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
    }
    ids
}

/// Prune highlights and orphaned notes against the project's current content.
///
/// Survival rule for an ordinary note: at least one surviving text reference,
/// or at least one connection touching it, or a non-empty `linked_notes`, or
/// being named in another note's `linked_notes`. Special notes always survive.
pub fn reconcile(project: &mut Project) {
    let live_anchors = anchor_ids(&project.poem.content);

    // Pass 1: drop highlights whose anchor vanished from the content
    let before = project.poem.highlights.len();
    project
        .poem
        .highlights
        .retain(|h| live_anchors.contains(&h.id));
    let dropped_highlights = before - project.poem.highlights.len();
    if dropped_highlights > 0 {
        log::info!("reconcile: dropped {} highlight(s)", dropped_highlights);
    }

    let surviving_highlights: HashSet<String> = project
        .poem
        .highlights
        .iter()
        .map(|h| h.id.clone())
        .collect();

    // Pass 2: single survival pass over ordinary notes, evaluated against
    // the pre-removal note set (no transitive re-evaluation)
    let incoming_links: HashSet<String> = project
        .notes
        .iter()
        .flat_map(|n| n.linked_notes.iter().cloned())
        .collect();

    let survivors: HashSet<String> = project
        .notes
        .iter()
        .filter(|note| {
            if note.is_special() {
                return true;
            }
            let has_live_reference = note
                .text_references
                .iter()
                .any(|id| surviving_highlights.contains(id));
            let has_connection = project.connections.iter().any(|c| c.touches(&note.id));
            has_live_reference
                || has_connection
                || !note.linked_notes.is_empty()
                || incoming_links.contains(&note.id)
        })
        .map(|n| n.id.clone())
        .collect();

    let pruned = project.notes.len() - survivors.len();
    if pruned > 0 {
        log::info!("reconcile: pruned {} orphaned note(s)", pruned);
    }
    project.notes.retain(|n| survivors.contains(&n.id));

    // Hygiene: strip ids of removed elements so the snapshot never holds
    // dangling references
    project
        .connections
        .retain(|c| survivors.contains(&c.from_note_id) && survivors.contains(&c.to_note_id));
    for note in &mut project.notes {
        note.text_references
            .retain(|id| surviving_highlights.contains(id));
        note.linked_notes.retain(|id| survivors.contains(id));
    }
    for highlight in &mut project.poem.highlights {
        highlight.note_ids.retain(|id| survivors.contains(id));
    }
    // A highlight with no referencing notes left is garbage
    project.poem.highlights.retain(|h| !h.note_ids.is_empty());
}
