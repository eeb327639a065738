//! Coverage-alpha conversion
//!
//! Glyphs are rendered white on black. Afterwards every pixel becomes
//! opaque-white color with alpha = average(R, G, B), so the texture can
//! be tinted to any color at draw time.

use super::Atlas;

/// Convert the whole atlas in place. Run once, after all glyphs are placed.
///
/// Not idempotent: the second pass sees RGB = 255 everywhere and sets
/// every alpha to 255.
pub fn to_coverage_alpha(atlas: &mut Atlas) {
    let buf: &mut [u8] = &mut **atlas;
    for px in buf.chunks_exact_mut(4) {
        let luminance = (px[0] as u16 + px[1] as u16 + px[2] as u16) / 3;
        px[0] = 255;
        px[1] = 255;
        px[2] = 255;
        px[3] = luminance as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_luminance_becomes_alpha() {
        let mut atlas = Atlas::new(2, 2);
        atlas.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        atlas.put_pixel(1, 0, Rgba([30, 60, 91, 255]));
        atlas.put_pixel(0, 1, Rgba([0, 0, 0, 0]));
        atlas.put_pixel(1, 1, Rgba([128, 128, 128, 7]));

        to_coverage_alpha(&mut atlas);

        assert_eq!(*atlas.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*atlas.get_pixel(1, 0), Rgba([255, 255, 255, 60]));
        assert_eq!(*atlas.get_pixel(0, 1), Rgba([255, 255, 255, 0]));
        assert_eq!(*atlas.get_pixel(1, 1), Rgba([255, 255, 255, 128]));
    }

    #[test]
    fn test_second_pass_saturates_alpha() {
        let mut atlas = Atlas::new(3, 1);
        atlas.put_pixel(0, 0, Rgba([12, 12, 12, 255]));
        atlas.put_pixel(1, 0, Rgba([200, 100, 50, 255]));

        to_coverage_alpha(&mut atlas);
        let first: Vec<u8> = atlas.pixels().map(|p| p[3]).collect();
        assert_eq!(first, vec![12, 116, 0]);

        to_coverage_alpha(&mut atlas);
        for (p, &a) in atlas.pixels().zip(&first) {
            if a > 0 {
                assert_eq!(p[3], 255);
            }
            assert_eq!(&p.0[..3], &[255, 255, 255]);
        }
    }
}
