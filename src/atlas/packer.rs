//! Glyph placement
//!
//! Walks the character sequence once with a cursor that starts at
//! `(padding, padding)`. A row wraps when the next glyph's own width no
//! longer fits, but the cursor always advances by the full cell pitch.
//! Narrow glyphs therefore leave unused space at row ends; runtimes size
//! their quads from the recorded W/H, so the pitch is never visible.

use log::{debug, error, info, warn};

use super::{Atlas, CellGrid, GlyphPlacement};
use crate::font::GlyphSource;

/// Rasterize `chars` into a fresh atlas laid out by `grid`
///
/// Returns one placement per input character, in input order.
pub fn place(
    chars: &[char],
    source: &dyn GlyphSource,
    grid: &CellGrid,
) -> (Atlas, Vec<GlyphPlacement>) {
    let mut atlas = Atlas::new(grid.atlas_width, grid.atlas_height);
    let mut placements = Vec::with_capacity(chars.len());

    let pad = grid.padding;
    let mut cursor_x = pad;
    let mut cursor_y = pad;

    for &ch in chars {
        let (width, height) = source.measure(ch);

        if width + pad > grid.cell_width || height + pad > grid.cell_height {
            report_oversized(ch, width, height, grid);
        }

        // Move to next row if doesn't fit in current row
        if cursor_x + width > grid.atlas_width {
            cursor_x = pad;
            cursor_y += grid.cell_height;
        }

        source.render(ch, &mut atlas, cursor_x, cursor_y);

        placements.push(GlyphPlacement {
            character: ch,
            x: cursor_x,
            y: cursor_y,
            width,
            height,
        });

        cursor_x += grid.cell_width;
    }

    debug!(
        "Placed {} glyphs, last row top at y={}",
        placements.len(),
        cursor_y
    );
    info!(
        "Glyph atlas generated: {}x{}, {} glyphs",
        grid.atlas_width,
        grid.atlas_height,
        placements.len()
    );

    (atlas, placements)
}

/// A glyph larger than its cell means the grid was sized from different
/// measurements. Placement continues; the neighbours may be overdrawn.
fn report_oversized(ch: char, width: u32, height: u32, grid: &CellGrid) {
    if cfg!(debug_assertions) {
        error!(
            "Glyph U+{:04X} ({}x{}) larger than cell {}x{} minus padding {}",
            ch as u32, width, height, grid.cell_width, grid.cell_height, grid.padding
        );
    } else {
        warn!(
            "Glyph U+{:04X} ({}x{}) larger than cell {}x{}",
            ch as u32, width, height, grid.cell_width, grid.cell_height
        );
    }
}
