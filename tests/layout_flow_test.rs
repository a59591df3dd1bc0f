// Layout engine driven from store snapshots, as the host wires it

use versemark::layout::{place_all, place_near, LayoutConfig};
use versemark::{GraphStore, Note, Point, Rect};

#[test]
fn test_bulk_layout_then_commit_positions() {
    let mut store = GraphStore::with_title("layout");
    for i in 0..4 {
        store.add_note(Note::new(&format!("note {i}")));
    }

    let config = LayoutConfig::default();
    let placements = place_all(&store.snapshot().notes, &config);
    for (id, position) in placements {
        store.update_note_position(&id, position);
    }

    let snap = store.snapshot();
    assert!(snap.notes.iter().all(|n| !n.position.is_origin()));

    // Re-running bulk layout keeps every now-placed note where it is
    let again = place_all(&snap.notes, &config);
    for (id, position) in again {
        assert_eq!(snap.note(&id).unwrap().position, position);
    }
}

#[test]
fn test_new_note_placed_near_its_anchor() {
    let mut store = GraphStore::with_title("layout");
    let config = LayoutConfig::default();
    let canvas = Rect::new(0.0, 0.0, config.canvas_width, config.canvas_height);

    // Existing notes already on canvas
    let placements = place_all(&store.snapshot().notes, &config);
    for (id, position) in placements {
        store.update_note_position(&id, position);
    }
    let existing: Vec<Rect> = store
        .snapshot()
        .notes
        .iter()
        .map(|n| Rect::new(n.position.x, n.position.y, n.width, config.note_height))
        .collect();

    let anchor = Rect::new(500.0, 420.0, 200.0, 24.0);
    let mut note = Note::new("near the anchor");
    note.position = place_near(&existing, &anchor, &canvas, &config);
    let id = note.id.clone();
    store.add_note(note);

    let snap = store.snapshot();
    let placed = snap.note(&id).unwrap();
    // Level with the anchor, clear of every existing card
    assert_eq!(placed.position, Point::new(config.start_x, 420.0));
    let placed_rect = Rect::new(
        placed.position.x,
        placed.position.y,
        config.note_width,
        config.note_height,
    );
    assert!(existing.iter().all(|r| !r.overlaps(&placed_rect)));
}
