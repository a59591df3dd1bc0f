//! Note layout engine
//!
//! Assigns collision-free canvas positions to note cards. Bulk layout drops
//! unplaced notes into a grid; single placement puts a new note roughly level
//! with the text it annotates. Both run the same bounded down-then-wrap
//! collision search and accept the last candidate when the attempt cap runs
//! out, so the result is best-effort rather than guaranteed collision-free.

use serde::{Deserialize, Serialize};

use crate::models::{Note, Point, Rect};

/// Attempt cap for the bulk grid search
const MAX_GRID_ATTEMPTS: usize = 50;

/// Attempt cap for single-note placement
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Configuration for layout calculations, supplied by the host
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,

    /// Nominal note card size used for collision rectangles
    pub note_width: f64,
    pub note_height: f64,

    /// Gap kept between neighboring cards
    pub padding: f64,

    /// Top-left corner of the first grid cell, also the default left offset
    /// for single placement
    pub start_x: f64,
    pub start_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1600.0,
            canvas_height: 900.0,
            note_width: 280.0,
            note_height: 160.0,
            padding: 20.0,
            start_x: 40.0,
            start_y: 40.0,
        }
    }
}

impl LayoutConfig {
    fn cell_width(&self) -> f64 {
        self.note_width + self.padding
    }

    fn row_height(&self) -> f64 {
        self.note_height + self.padding
    }

    fn columns(&self) -> usize {
        let fit = ((self.canvas_width - self.start_x) / self.cell_width()).floor();
        (fit as usize).max(1)
    }
}

/// Down-then-wrap collision search shared by both entry points.
/// Shifts down one row per collision; wraps to `wrap_y` and advances one
/// column when the shift would leave the canvas bottom. Returns the last
/// candidate when `max_attempts` runs out.
fn search_free_spot(
    mut candidate: Rect,
    reserved: &[Rect],
    config: &LayoutConfig,
    canvas_bottom: f64,
    wrap_y: f64,
    max_attempts: usize,
) -> Point {
    for _ in 0..max_attempts {
        if !reserved.iter().any(|r| candidate.overlaps(r)) {
            break;
        }
        candidate.y += config.row_height();
        if candidate.y + config.note_height > canvas_bottom {
            candidate.y = wrap_y;
            candidate.x += config.cell_width();
        }
    }
    Point::new(candidate.x, candidate.y)
}

/// Bulk layout: keep already-placed notes fixed, drop the rest into a grid.
///
/// Returns `(note_id, position)` pairs for every note, placed or kept.
pub fn place_all(notes: &[Note], config: &LayoutConfig) -> Vec<(String, Point)> {
    let mut reserved: Vec<Rect> = notes
        .iter()
        .filter(|n| !n.position.is_origin())
        .map(|n| note_rect(n.position, config))
        .collect();

    let columns = config.columns();
    let mut placements = Vec::with_capacity(notes.len());
    let mut next_cell = 0usize;

    for note in notes {
        if !note.position.is_origin() {
            placements.push((note.id.clone(), note.position));
            continue;
        }

        let col = next_cell % columns;
        let row = next_cell / columns;
        next_cell += 1;

        let raw = Rect::new(
            config.start_x + col as f64 * config.cell_width(),
            config.start_y + row as f64 * config.row_height(),
            config.note_width,
            config.note_height,
        );
        let position = search_free_spot(
            raw,
            &reserved,
            config,
            config.canvas_height,
            config.start_y,
            MAX_GRID_ATTEMPTS,
        );
        reserved.push(note_rect(position, config));
        placements.push((note.id.clone(), position));
    }

    placements
}

/// Place a single new note near its text anchor: level with the anchor's
/// vertical position, at the configured left offset, then searched away from
/// the rectangles of all existing notes.
pub fn place_near(
    existing: &[Rect],
    anchor: &Rect,
    canvas: &Rect,
    config: &LayoutConfig,
) -> Point {
    let candidate = Rect::new(
        config.start_x,
        anchor.top(),
        config.note_width,
        config.note_height,
    );
    search_free_spot(
        candidate,
        existing,
        config,
        canvas.bottom(),
        canvas.top() + config.start_y,
        MAX_PLACEMENT_ATTEMPTS,
    )
}

fn note_rect(position: Point, config: &LayoutConfig) -> Rect {
    Rect::new(position.x, position.y, config.note_width, config.note_height)
}
