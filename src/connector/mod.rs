//! Connector geometry
//!
//! Pure functions from current rectangle geometry to the line segments drawn
//! between text anchors and notes, and between pairs of notes. Rectangles
//! come from the injected [`GeometryProvider`]; recomputing with unchanged
//! inputs yields identical output, so the host may call this as often as it
//! likes (on store change and on the bounded-interval re-poll).

pub mod provider;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::models::{Point, Project, Rect};

pub use provider::{GeometryProvider, StaticGeometry};

/// Length of the fallback stub drawn when geometry is missing
const FALLBACK_STUB: f64 = 60.0;

/// A straight line segment; the arrowhead, if any, sits at `to`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// What a connector joins
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// Text anchor to note; no arrowhead
    Anchor,
    /// Directed note-to-note edge; arrowhead at the terminus
    Link,
}

/// A renderable connector handed to the presentation layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub kind: ConnectorKind,
    pub from_id: String,
    pub to_id: String,
    pub segment: Segment,
    pub color: Option<String>,
}

/// Result of one connector recomputation
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConnectorSet {
    pub connectors: Vec<Connector>,

    /// Display color each note ended up with after propagation
    pub note_colors: HashMap<String, String>,
}

/// Point where the ray from `origin` toward `target`'s center crosses the
/// target's border. The crossed edge is chosen by comparing |Δy|/height
/// against |Δx|/width, so the point lands on the edge facing the approach.
/// Degenerate case (origin at the center) returns the center.
pub fn border_intersect(origin: Point, target: &Rect) -> Point {
    let center = target.center();
    let dx = center.x - origin.x;
    let dy = center.y - origin.y;
    if dx == 0.0 && dy == 0.0 {
        return center;
    }

    if (dy / target.height).abs() > (dx / target.width).abs() {
        // Vertical approach: top edge when the ray points down, else bottom
        let edge_y = if dy > 0.0 { target.top() } else { target.bottom() };
        let x = origin.x + dx * (edge_y - origin.y) / dy;
        Point::new(x, edge_y)
    } else {
        let edge_x = if dx > 0.0 { target.left() } else { target.right() };
        let y = origin.y + dy * (edge_x - origin.x) / dx;
        Point::new(edge_x, y)
    }
}

/// Connector from a text anchor's enclosing line to a note. The origin sits
/// on the line's left or right edge, picked so the segment leaves the poem
/// text away from the note instead of crossing through it.
pub fn anchor_connector(line: &Rect, note: &Rect) -> Segment {
    let origin = if note.center().x < line.center().x {
        Point::new(line.left(), line.center().y)
    } else {
        Point::new(line.right(), line.center().y)
    };
    Segment {
        from: origin,
        to: border_intersect(origin, note),
    }
}

/// Connector between two notes: each end is the border point aimed at the
/// other note's center, so the segment starts and ends exactly on the two
/// borders. Arrowhead at `to`.
pub fn note_connector(from: &Rect, to: &Rect) -> Segment {
    Segment {
        from: border_intersect(to.center(), from),
        to: border_intersect(from.center(), to),
    }
}

/// Horizontal stub used when geometry is unavailable: anchored at the known
/// rectangle's left edge if one side is rendered, else at a default origin.
fn fallback_segment(known: Option<&Rect>) -> Segment {
    match known {
        Some(rect) => {
            let end = Point::new(rect.left(), rect.center().y);
            Segment {
                from: Point::new(end.x - FALLBACK_STUB, end.y),
                to: end,
            }
        }
        None => Segment {
            from: Point::new(0.0, 0.0),
            to: Point::new(FALLBACK_STUB, 0.0),
        },
    }
}

/// Recompute every connector and note color from the current snapshot and
/// geometry.
///
/// Color propagation is a single left-to-right pass: a note is colored by
/// the first colored anchor that names it (highlights in list order), and an
/// uncolored note inherits from the first already-colored neighbor while
/// connections are walked in list order. A neighbor colored only later in
/// the list does not propagate on this pass.
pub fn compute_connectors(project: &Project, geometry: &dyn GeometryProvider) -> ConnectorSet {
    let mut note_colors: HashMap<String, String> = HashMap::new();

    for highlight in &project.poem.highlights {
        if let Some(color) = &highlight.color {
            for note_id in &highlight.note_ids {
                note_colors
                    .entry(note_id.clone())
                    .or_insert_with(|| color.clone());
            }
        }
    }

    let mut connectors = Vec::new();

    for highlight in &project.poem.highlights {
        let anchor_rect = geometry.anchor_rect(&highlight.id);
        for note_id in &highlight.note_ids {
            let note_rect = geometry.note_rect(note_id);
            let segment = match (anchor_rect, note_rect) {
                (Some(line), Some(note)) => anchor_connector(&line, &note),
                (_, note) => fallback_segment(note.as_ref()),
            };
            connectors.push(Connector {
                kind: ConnectorKind::Anchor,
                from_id: highlight.id.clone(),
                to_id: note_id.clone(),
                segment,
                color: highlight
                    .color
                    .clone()
                    .or_else(|| note_colors.get(note_id).cloned()),
            });
        }
    }

    for connection in &project.connections {
        // Single-pass inheritance between the two endpoints
        let from_color = note_colors.get(&connection.from_note_id).cloned();
        let to_color = note_colors.get(&connection.to_note_id).cloned();
        match (&from_color, &to_color) {
            (Some(c), None) => {
                note_colors.insert(connection.to_note_id.clone(), c.clone());
            }
            (None, Some(c)) => {
                note_colors.insert(connection.from_note_id.clone(), c.clone());
            }
            _ => {}
        }

        let from_rect = geometry.note_rect(&connection.from_note_id);
        let to_rect = geometry.note_rect(&connection.to_note_id);
        let segment = match (from_rect, to_rect) {
            (Some(from), Some(to)) => note_connector(&from, &to),
            (from, to) => fallback_segment(from.or(to).as_ref()),
        };
        connectors.push(Connector {
            kind: ConnectorKind::Link,
            from_id: connection.from_note_id.clone(),
            to_id: connection.to_note_id.clone(),
            segment,
            color: note_colors
                .get(&connection.from_note_id)
                .or_else(|| note_colors.get(&connection.to_note_id))
                .cloned(),
        });
    }

    ConnectorSet {
        connectors,
        note_colors,
    }
}

/// Named gate for the unconditional low-frequency recomputation.
///
/// Rectangle geometry changes without any store transition (reflow, font
/// loading), so the host re-polls on a bounded interval in addition to
/// reacting to store revisions.
#[derive(Debug, Clone)]
pub struct Repoll {
    interval: Duration,
    last_poll: Option<Instant>,
    last_revision: Option<u64>,
}

impl Repoll {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_poll: None,
            last_revision: None,
        }
    }

    /// True when the store changed since the last poll or the interval
    /// elapsed; records the poll either way it fires.
    pub fn should_recompute(&mut self, now: Instant, revision: u64) -> bool {
        let store_changed = self.last_revision != Some(revision);
        let interval_elapsed = self
            .last_poll
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        if store_changed || interval_elapsed {
            self.last_poll = Some(now);
            self.last_revision = Some(revision);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_intersect_degenerate_returns_center() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(border_intersect(rect.center(), &rect), rect.center());
    }

    #[test]
    fn test_border_intersect_from_left() {
        let rect = Rect::new(100.0, 100.0, 100.0, 50.0);
        // Origin level with the center, far to the left: hits the left edge
        let p = border_intersect(Point::new(0.0, 125.0), &rect);
        assert_eq!(p, Point::new(100.0, 125.0));
    }

    #[test]
    fn test_border_intersect_from_above() {
        let rect = Rect::new(100.0, 100.0, 100.0, 50.0);
        let p = border_intersect(Point::new(150.0, 0.0), &rect);
        assert_eq!(p, Point::new(150.0, 100.0));
    }

    #[test]
    fn test_border_intersect_lands_on_border() {
        let rect = Rect::new(50.0, 50.0, 80.0, 40.0);
        let p = border_intersect(Point::new(0.0, 0.0), &rect);
        let on_vertical = (p.x == rect.left() || p.x == rect.right())
            && p.y >= rect.top()
            && p.y <= rect.bottom();
        let on_horizontal = (p.y == rect.top() || p.y == rect.bottom())
            && p.x >= rect.left()
            && p.x <= rect.right();
        assert!(on_vertical || on_horizontal, "{:?} not on border", p);
    }

    #[test]
    fn test_anchor_connector_picks_edge_away_from_text() {
        let line = Rect::new(100.0, 200.0, 400.0, 24.0);
        let note_left = Rect::new(0.0, 180.0, 80.0, 60.0);
        let note_right = Rect::new(600.0, 180.0, 80.0, 60.0);

        let seg_left = anchor_connector(&line, &note_left);
        assert_eq!(seg_left.from, Point::new(100.0, 212.0));

        let seg_right = anchor_connector(&line, &note_right);
        assert_eq!(seg_right.from, Point::new(500.0, 212.0));
    }

    #[test]
    fn test_note_connector_ends_on_both_borders() {
        let a = Rect::new(0.0, 0.0, 100.0, 50.0);
        let b = Rect::new(300.0, 0.0, 100.0, 50.0);
        let seg = note_connector(&a, &b);
        // Horizontally separated, vertically aligned: right edge of a to
        // left edge of b
        assert_eq!(seg.from, Point::new(100.0, 25.0));
        assert_eq!(seg.to, Point::new(300.0, 25.0));
    }

    #[test]
    fn test_repoll_fires_on_revision_change() {
        let mut repoll = Repoll::new(Duration::from_secs(2));
        let t0 = Instant::now();
        assert!(repoll.should_recompute(t0, 1));
        assert!(!repoll.should_recompute(t0, 1));
        assert!(repoll.should_recompute(t0, 2));
    }

    #[test]
    fn test_repoll_fires_on_interval() {
        let mut repoll = Repoll::new(Duration::from_millis(10));
        let t0 = Instant::now();
        assert!(repoll.should_recompute(t0, 1));
        assert!(repoll.should_recompute(t0 + Duration::from_millis(20), 1));
    }
}
