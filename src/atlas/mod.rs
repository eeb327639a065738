//! Glyph atlas packer
//!
//! Measures glyphs, sizes a power-of-two grid of uniform cells,
//! rasterizes every glyph into its cell and turns the result into
//! an alpha-coverage texture.
//!
//! ```text
//! chars ─→ measure ─→ CellGrid ─→ place ─→ coverage ─→ Atlas + placements
//! ```

pub mod coverage;
pub mod grid;
pub mod measure;
pub mod packer;

pub use coverage::to_coverage_alpha;
pub use grid::CellGrid;
pub use measure::measure_glyphs;
pub use packer::place;

use thiserror::Error;

use crate::constants::MAX_PADDING;

/// Atlas pixel buffer (RGBA8, row-major)
pub type Atlas = image::RgbaImage;

/// Measured size of one character's glyph box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSpec {
    pub character: char,
    /// Box width (pixels)
    pub width: u32,
    /// Box height (pixels)
    pub height: u32,
}

/// Where one glyph ended up in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub character: char,
    /// Left edge in atlas pixels
    pub x: u32,
    /// Top edge in atlas pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GlyphPlacement {
    /// True if the two rectangles share at least one pixel
    #[cfg(test)]
    pub fn overlaps(&self, other: &GlyphPlacement) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Packer failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    #[error("empty glyph set: nothing to pack")]
    EmptyGlyphSet,
    #[error("padding {0} out of range (0-{max})", max = MAX_PADDING)]
    InvalidPadding(u32),
}

/// Reject padding outside [0, MAX_PADDING]
pub fn validate_padding(padding: u32) -> Result<u32, AtlasError> {
    if padding > MAX_PADDING {
        return Err(AtlasError::InvalidPadding(padding));
    }
    Ok(padding)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic glyph source for packer tests

    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::Atlas;
    use crate::font::GlyphSource;

    /// Returns fixed sizes and fills each glyph box with a solid value
    /// derived from the code point
    pub struct FakeSource {
        sizes: HashMap<char, (u32, u32)>,
        default_size: (u32, u32),
        pub measured: RefCell<Vec<char>>,
    }

    impl FakeSource {
        pub fn new(sizes: &[(char, u32, u32)]) -> Self {
            Self {
                sizes: sizes.iter().map(|&(c, w, h)| (c, (w, h))).collect(),
                default_size: (8, 12),
                measured: RefCell::new(Vec::new()),
            }
        }

        pub fn uniform(width: u32, height: u32) -> Self {
            Self {
                sizes: HashMap::new(),
                default_size: (width, height),
                measured: RefCell::new(Vec::new()),
            }
        }

        /// Pixel value written for `ch`
        pub fn shade(ch: char) -> u8 {
            (ch as u32 % 200) as u8 + 40
        }
    }

    impl GlyphSource for FakeSource {
        fn measure(&self, ch: char) -> (u32, u32) {
            self.measured.borrow_mut().push(ch);
            self.sizes.get(&ch).copied().unwrap_or(self.default_size)
        }

        fn render(&self, ch: char, atlas: &mut Atlas, x: u32, y: u32) {
            let (w, h) = self.sizes.get(&ch).copied().unwrap_or(self.default_size);
            let v = Self::shade(ch);
            for py in y..(y + h).min(atlas.height()) {
                for px in x..(x + w).min(atlas.width()) {
                    atlas.put_pixel(px, py, image::Rgba([v, v, v, 255]));
                }
            }
        }
    }
}
