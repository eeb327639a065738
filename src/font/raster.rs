//! fontdue-backed glyph source
//!
//! Glyphs are measured as layout boxes: advance width by line height,
//! with the outline drawn on a shared baseline inside the box. The
//! descriptor carries no bearings, so a runtime can lay text out by
//! butting the boxes against each other.
//!
//! The line box is grown to cover the ink of every character that will
//! be packed, and a negative left bearing widens the box on the left, so
//! no coverage is ever cut off.

use anyhow::{anyhow, Result};
use fontdue::{Font, FontSettings, Metrics};
use log::{debug, info, warn};

use super::GlyphSource;
use crate::atlas::Atlas;

/// Rasterizes glyphs of one font at one pixel size
pub struct FontdueSource {
    font: Font,
    /// Rasterize size (pixels per em)
    px: f32,
    /// Baseline distance from box top (pixels)
    ascent: i32,
    /// Box height shared by every glyph (pixels)
    line_height: u32,
}

impl FontdueSource {
    /// Load a font from raw TTF/OTF bytes for rendering `chars` at `px`
    /// pixels per em
    pub fn from_bytes(font_data: &[u8], px: f32, chars: &[char]) -> Result<Self> {
        if !(px.is_finite() && px > 0.0) {
            return Err(anyhow!("Invalid pixel size: {}", px));
        }

        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(font_data, settings)
            .map_err(|e| anyhow!("Failed to load font: {}", e))?;

        let metrics = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| anyhow!("Cannot get line metrics"))?;

        // Baseline-relative, y up; descent is negative
        let mut ascent = metrics.ascent.ceil() as i32;
        let mut descent = metrics.descent.floor() as i32;
        for &ch in chars {
            let m = font.metrics(ch, px);
            if m.width == 0 || m.height == 0 {
                continue;
            }
            ascent = ascent.max(m.ymin + m.height as i32);
            descent = descent.min(m.ymin);
        }
        let line_height = (ascent - descent).max(1) as u32;

        info!(
            "Font loaded @ {:.1}px (ascent={}, descent={}, line height={})",
            px, ascent, descent, line_height
        );

        Ok(Self {
            font,
            px,
            ascent,
            line_height,
        })
    }

    /// Pixels the ink is shifted right to keep a negative bearing in the box
    fn left_shift(metrics: &Metrics) -> u32 {
        (-metrics.xmin).max(0) as u32
    }

    fn box_width(metrics: &Metrics) -> u32 {
        let advance = metrics.advance_width.ceil().max(0.0) as u32;
        let ink_right = (metrics.xmin.max(0) as u32) + metrics.width as u32;
        Self::left_shift(metrics) + advance.max(ink_right)
    }
}

impl GlyphSource for FontdueSource {
    fn measure(&self, ch: char) -> (u32, u32) {
        if self.font.lookup_glyph_index(ch) == 0 {
            warn!(
                "Glyph not found: U+{:04X} '{}' (rendering .notdef)",
                ch as u32, ch
            );
        }
        let metrics = self.font.metrics(ch, self.px);
        (Self::box_width(&metrics), self.line_height)
    }

    fn render(&self, ch: char, atlas: &mut Atlas, x: u32, y: u32) {
        let (metrics, bitmap) = self.font.rasterize(ch, self.px);
        let bw = metrics.width as i64;
        let bh = metrics.height as i64;
        if bw == 0 || bh == 0 {
            debug!("Empty glyph: U+{:04X}", ch as u32);
            return;
        }

        // fontdue's ymin is the bitmap bottom relative to the baseline (y up)
        let left = x as i64 + Self::left_shift(&metrics) as i64 + metrics.xmin as i64;
        let top = y as i64 + self.ascent as i64 - (metrics.ymin as i64 + bh);
        if top < y as i64 || top + bh > y as i64 + self.line_height as i64 {
            warn!(
                "Glyph U+{:04X} ink outside its line box (not in the fitted charset)",
                ch as u32
            );
        }

        let (aw, ah) = (atlas.width() as i64, atlas.height() as i64);
        for gy in 0..bh {
            let py = top + gy;
            if py < 0 || py >= ah {
                continue;
            }
            for gx in 0..bw {
                let px = left + gx;
                if px < 0 || px >= aw {
                    continue;
                }
                let coverage = bitmap[(gy * bw + gx) as usize];
                if coverage == 0 {
                    continue;
                }
                let pixel = atlas.get_pixel_mut(px as u32, py as u32);
                let v = pixel[0].max(coverage);
                *pixel = image::Rgba([v, v, v, 255]);
            }
        }
    }
}
