// Connector computation over a project snapshot: segments, colors, fallbacks

use versemark::connector::{compute_connectors, ConnectorKind, StaticGeometry};
use versemark::{Connection, GraphStore, Highlight, Note, Point, Rect};

/// Store with one colored highlight feeding note `a`, plus notes `b` and `c`
fn build_store() -> (GraphStore, String, [String; 3]) {
    let mut store = GraphStore::with_title("colors");

    let mut highlight = Highlight::new(0, 0, 6, "season").with_color("#d08a2e");
    let a = Note::new("a");
    let b = Note::new("b");
    let c = Note::new("c");
    let ids = [a.id.clone(), b.id.clone(), c.id.clone()];
    highlight.note_ids = vec![ids[0].clone()];
    let mut a = a;
    a.text_references = vec![highlight.id.clone()];
    let h_id = highlight.id.clone();

    // Content first: a content change reconciles, and b/c have no ties yet
    store.set_document_content(&format!(r#"<span data-hl="{h_id}">season</span>"#));
    store.add_highlight(highlight);
    store.add_note(a);
    store.add_note(b);
    store.add_note(c);
    (store, h_id, ids)
}

fn geometry(h_id: &str, ids: &[String; 3]) -> StaticGeometry {
    let mut geo = StaticGeometry {
        viewport: Rect::new(0.0, 0.0, 1600.0, 900.0),
        ..Default::default()
    };
    geo.anchors.insert(h_id.to_string(), Rect::new(100.0, 200.0, 300.0, 24.0));
    geo.notes.insert(ids[0].clone(), Rect::new(600.0, 180.0, 280.0, 160.0));
    geo.notes.insert(ids[1].clone(), Rect::new(600.0, 400.0, 280.0, 160.0));
    geo.notes.insert(ids[2].clone(), Rect::new(600.0, 620.0, 280.0, 160.0));
    geo
}

#[test]
fn test_anchor_connector_emitted_with_highlight_color() {
    let (store, h_id, ids) = build_store();
    let set = compute_connectors(&store.snapshot(), &geometry(&h_id, &ids));

    let anchor = set
        .connectors
        .iter()
        .find(|c| c.kind == ConnectorKind::Anchor)
        .expect("anchor connector present");
    assert_eq!(anchor.from_id, h_id);
    assert_eq!(anchor.to_id, ids[0]);
    assert_eq!(anchor.color.as_deref(), Some("#d08a2e"));
    // Note sits right of the anchor line: origin on the line's right edge
    assert_eq!(anchor.segment.from, Point::new(400.0, 212.0));
}

#[test]
fn test_color_propagates_forward_in_list_order() {
    let (mut store, h_id, ids) = build_store();
    // a -> b first, then b -> c: one pass colors both b and c
    store.add_connection(Connection::new(&ids[0], &ids[1]));
    store.add_connection(Connection::new(&ids[1], &ids[2]));

    let set = compute_connectors(&store.snapshot(), &geometry(&h_id, &ids));
    assert_eq!(set.note_colors.get(&ids[1]).map(String::as_str), Some("#d08a2e"));
    assert_eq!(set.note_colors.get(&ids[2]).map(String::as_str), Some("#d08a2e"));
}

#[test]
fn test_color_does_not_propagate_backward_in_one_pass() {
    let (mut store, h_id, ids) = build_store();
    // b -> c comes first: when processed, neither endpoint is colored yet.
    // c stays uncolored on this pass even though b is colored by the later
    // connection.
    store.add_connection(Connection::new(&ids[1], &ids[2]));
    store.add_connection(Connection::new(&ids[0], &ids[1]));

    let set = compute_connectors(&store.snapshot(), &geometry(&h_id, &ids));
    assert_eq!(set.note_colors.get(&ids[1]).map(String::as_str), Some("#d08a2e"));
    assert!(set.note_colors.get(&ids[2]).is_none());

    // Re-running with the same inputs is idempotent
    let again = compute_connectors(&store.snapshot(), &geometry(&h_id, &ids));
    assert_eq!(again, set);
}

#[test]
fn test_link_connector_ends_on_both_borders() {
    let (mut store, h_id, ids) = build_store();
    store.add_connection(Connection::new(&ids[0], &ids[1]));

    let set = compute_connectors(&store.snapshot(), &geometry(&h_id, &ids));
    let link = set
        .connectors
        .iter()
        .find(|c| c.kind == ConnectorKind::Link)
        .unwrap();
    // Vertically stacked, horizontally aligned: bottom edge of a to top
    // edge of b
    assert_eq!(link.segment.from, Point::new(740.0, 340.0));
    assert_eq!(link.segment.to, Point::new(740.0, 400.0));
}

#[test]
fn test_missing_geometry_falls_back_to_horizontal_stub() {
    let (store, h_id, ids) = build_store();
    // Anchor never rendered: only note rects available
    let mut geo = geometry(&h_id, &ids);
    geo.anchors.clear();

    let set = compute_connectors(&store.snapshot(), &geo);
    let anchor = set
        .connectors
        .iter()
        .find(|c| c.kind == ConnectorKind::Anchor)
        .unwrap();
    assert_eq!(anchor.segment.from.y, anchor.segment.to.y);
    // Stub ends at the note's left edge
    assert_eq!(anchor.segment.to, Point::new(600.0, 260.0));
}
