//! Font loading and glyph rendering
//!
//! Handles:
//! - System font lookup (fontconfig)
//! - TTF/OTF loading and rasterization (fontdue)
//! - The `GlyphSource` seam the atlas packer renders through

pub mod fontconfig;
pub mod raster;

pub use self::fontconfig::resolve_font;
pub use self::raster::FontdueSource;

use crate::atlas::Atlas;

/// Something that can size and draw single characters
///
/// The packer only ever talks to fonts through this trait, so tests can
/// substitute a fake with fixed sizes.
pub trait GlyphSource {
    /// Pixel box `(width, height)` the character is drawn into
    fn measure(&self, ch: char) -> (u32, u32);

    /// Draw the character as white-on-black coverage with the box's
    /// top-left corner at `(x, y)`. Pixels outside the atlas are dropped.
    fn render(&self, ch: char, atlas: &mut Atlas, x: u32, y: u32);
}
