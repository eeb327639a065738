//! Atlas sizing
//!
//! Uniform cells of `max glyph size + padding`, laid out row-major in
//! the smallest power-of-two texture that holds them all.

use log::debug;

use super::{AtlasError, GlyphSpec};

/// Smallest power of two >= `v` (`v` must be non-zero)
pub fn next_power_of_two(v: u32) -> u32 {
    debug_assert!(v > 0, "next_power_of_two(0)");
    v.next_power_of_two()
}

/// Cell layout derived once from the full glyph set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGrid {
    pub padding: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
    pub atlas_width: u32,
    pub atlas_height: u32,
}

impl CellGrid {
    pub fn compute(specs: &[GlyphSpec], padding: u32) -> Result<Self, AtlasError> {
        if specs.is_empty() {
            return Err(AtlasError::EmptyGlyphSet);
        }
        let count = specs.len() as u32;

        // Zero-sized glyphs with zero padding still need a 1px pitch
        let max_w = specs.iter().map(|s| s.width).max().unwrap_or(0);
        let max_h = specs.iter().map(|s| s.height).max().unwrap_or(0);
        let cell_width = (max_w + padding).max(1);
        let cell_height = (max_h + padding).max(1);

        // Square-ish first guess, then recount columns after rounding
        let columns_estimate = ceil_sqrt(count);
        let atlas_width = next_power_of_two(columns_estimate * cell_width);
        let columns = atlas_width / cell_width;
        let rows = count.div_ceil(columns);
        let atlas_height = next_power_of_two(rows * cell_height);

        debug!(
            "Cell grid: cell={}x{}, {}x{} cells, atlas={}x{}",
            cell_width, cell_height, columns, rows, atlas_width, atlas_height
        );

        Ok(Self {
            padding,
            cell_width,
            cell_height,
            columns,
            rows,
            atlas_width,
            atlas_height,
        })
    }
}

/// ceil(sqrt(n)) without going through floats
fn ceil_sqrt(n: u32) -> u32 {
    let mut r = (n as f64).sqrt() as u32;
    while r * r < n {
        r += 1;
    }
    while r > 0 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(sizes: &[(u32, u32)]) -> Vec<GlyphSpec> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(width, height))| GlyphSpec {
                character: char::from_u32('A' as u32 + i as u32).unwrap(),
                width,
                height,
            })
            .collect()
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
        assert_eq!(next_power_of_two(9), 16);
        for v in 1..5000u32 {
            let p = next_power_of_two(v);
            assert!(p.is_power_of_two());
            assert!(p >= v);
            assert!(p / 2 < v);
        }
    }

    #[test]
    fn test_ceil_sqrt() {
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(2), 2);
        assert_eq!(ceil_sqrt(4), 2);
        assert_eq!(ceil_sqrt(5), 3);
        assert_eq!(ceil_sqrt(159), 13);
    }

    #[test]
    fn test_two_glyph_grid() {
        let grid = CellGrid::compute(&specs(&[(10, 14), (9, 14)]), 2).unwrap();
        assert_eq!(grid.cell_width, 12);
        assert_eq!(grid.cell_height, 16);
        assert_eq!(grid.atlas_width, 32);
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows, 1);
        assert_eq!(grid.atlas_height, 16);
    }

    #[test]
    fn test_single_glyph_grid() {
        let grid = CellGrid::compute(&specs(&[(13, 21)]), 3).unwrap();
        assert_eq!((grid.columns, grid.rows), (1, 1));
        assert_eq!(grid.atlas_width, next_power_of_two(16));
        assert_eq!(grid.atlas_height, next_power_of_two(24));
    }

    #[test]
    fn test_columns_recomputed_after_rounding() {
        // 3 columns of 12 -> 36 -> 64, which fits 5 columns
        let grid = CellGrid::compute(&specs(&[(10, 10); 9]), 2).unwrap();
        assert_eq!(grid.atlas_width, 64);
        assert_eq!(grid.columns, 5);
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.atlas_height, 32);
    }

    #[test]
    fn test_grid_dimensions_are_powers_of_two() {
        for count in 1..120usize {
            for padding in [0, 1, 5, 32] {
                let sizes: Vec<(u32, u32)> = (0..count)
                    .map(|i| (3 + (i as u32 * 7) % 17, 5 + (i as u32 * 3) % 11))
                    .collect();
                let grid = CellGrid::compute(&specs(&sizes), padding).unwrap();
                assert!(grid.atlas_width.is_power_of_two());
                assert!(grid.atlas_height.is_power_of_two());
                assert!(grid.atlas_width >= grid.cell_width);
                assert!(grid.atlas_height >= grid.cell_height);
                assert!(grid.columns * grid.rows >= count as u32);
            }
        }
    }

    #[test]
    fn test_zero_sized_glyphs() {
        let grid = CellGrid::compute(&specs(&[(0, 0), (0, 0)]), 0).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (1, 1));
        assert_eq!(grid.atlas_width, 2);
        assert_eq!(grid.atlas_height, 1);
    }

    #[test]
    fn test_empty_glyph_set() {
        assert_eq!(CellGrid::compute(&[], 2), Err(AtlasError::EmptyGlyphSet));
    }
}
