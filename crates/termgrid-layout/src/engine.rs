//! Rectangle computation for each layout mode.

use termgrid_core::{LayoutMode, Rect, Size};

/// Inset from the container edges, in points.
pub const PADDING: f32 = 8.0;
/// Gap between adjacent panes, in points.
pub const GAP: f32 = 8.0;

/// Compute one rectangle per visible pane.
///
/// The result is index-aligned with the visible-set order: rect `i`
/// hosts visible session `i`. `count` is clamped to the mode's capacity,
/// so the result never has more rects than the mode can show.
///
/// Topology contract:
/// - single: one rect filling the padded container
/// - side-by-side: two equal columns, index 0 left
/// - grid: two equal columns, `ceil(count / 2)` rows; with an odd count
///   the last pane spans the full container width
pub fn rects_for(count: usize, mode: LayoutMode, container: Size) -> Vec<Rect> {
    let count = count.min(mode.max_panes());
    if count == 0 {
        return Vec::new();
    }

    let inner = Rect::from_size(container).inset(PADDING);

    // A lone pane fills the container regardless of mode
    if count == 1 {
        return vec![inner];
    }

    match mode {
        LayoutMode::Single => vec![inner],
        LayoutMode::SideBySide => side_by_side(inner),
        LayoutMode::Grid => grid(count, inner),
    }
}

fn side_by_side(inner: Rect) -> Vec<Rect> {
    let col_width = (inner.width - GAP) / 2.0;
    vec![
        Rect::new(inner.x, inner.y, col_width, inner.height),
        Rect::new(inner.x + col_width + GAP, inner.y, col_width, inner.height),
    ]
}

fn grid(count: usize, inner: Rect) -> Vec<Rect> {
    let rows = count.div_ceil(2);
    let col_width = (inner.width - GAP) / 2.0;
    let row_height = (inner.height - GAP * (rows as f32 - 1.0)) / rows as f32;

    (0..count)
        .map(|i| {
            let row = i / 2;
            let col = i % 2;
            let y = inner.y + row as f32 * (row_height + GAP);

            // An odd trailing pane spans both columns
            if i == count - 1 && count % 2 == 1 {
                Rect::new(inner.x, y, inner.width, row_height)
            } else {
                Rect::new(
                    inner.x + col as f32 * (col_width + GAP),
                    y,
                    col_width,
                    row_height,
                )
            }
        })
        .collect()
}
