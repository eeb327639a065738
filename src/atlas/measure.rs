//! Glyph measurement

use std::collections::HashMap;

use log::debug;

use super::{AtlasError, GlyphSpec};
use crate::font::GlyphSource;

/// Measure every character in `chars`, in order
///
/// The source is asked once per distinct character; repeats reuse the
/// first result. `scratch_size` is the initial scratch canvas side; a
/// larger glyph grows the canvas, its size is never cut down.
pub fn measure_glyphs(
    chars: &[char],
    source: &dyn GlyphSource,
    scratch_size: u32,
) -> Result<Vec<GlyphSpec>, AtlasError> {
    if chars.is_empty() {
        return Err(AtlasError::EmptyGlyphSet);
    }

    let mut cache: HashMap<char, (u32, u32)> = HashMap::with_capacity(chars.len());
    let mut canvas = scratch_size;
    let specs = chars
        .iter()
        .map(|&ch| {
            let (width, height) = *cache.entry(ch).or_insert_with(|| {
                let (w, h) = source.measure(ch);
                if w > canvas || h > canvas {
                    canvas = w.max(h);
                    debug!(
                        "Glyph U+{:04X} ({}x{}) grows scratch canvas to {}px",
                        ch as u32, w, h, canvas
                    );
                }
                (w, h)
            });
            GlyphSpec {
                character: ch,
                width,
                height,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Measured {} glyphs ({} distinct, scratch canvas {}px)",
        specs.len(),
        cache.len(),
        canvas
    );
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::testing::FakeSource;

    #[test]
    fn test_measure_in_order() {
        let source = FakeSource::new(&[('A', 10, 14), ('B', 9, 14)]);
        let specs = measure_glyphs(&['A', 'B'], &source, 256).unwrap();
        assert_eq!(
            specs,
            vec![
                GlyphSpec { character: 'A', width: 10, height: 14 },
                GlyphSpec { character: 'B', width: 9, height: 14 },
            ]
        );
    }

    #[test]
    fn test_measure_once_per_distinct_char() {
        let source = FakeSource::uniform(5, 7);
        let specs = measure_glyphs(&['x', 'y', 'x', 'x'], &source, 256).unwrap();
        assert_eq!(specs.len(), 4);
        assert_eq!(*source.measured.borrow(), vec!['x', 'y']);
    }

    #[test]
    fn test_measure_keeps_glyphs_larger_than_scratch() {
        let source = FakeSource::new(&[('W', 300, 20), ('g', 40, 410)]);
        let specs = measure_glyphs(&['W', 'g'], &source, 256).unwrap();
        assert_eq!((specs[0].width, specs[0].height), (300, 20));
        assert_eq!((specs[1].width, specs[1].height), (40, 410));
    }

    #[test]
    fn test_measure_empty() {
        let source = FakeSource::uniform(5, 7);
        assert_eq!(
            measure_glyphs(&[], &source, 256),
            Err(AtlasError::EmptyGlyphSet)
        );
    }
}
