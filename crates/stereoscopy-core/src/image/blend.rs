//! Alpha compositing onto a solid background
//!
//! Implements the Porter-Duff "over" operator with straight (not
//! premultiplied) alpha, the same convention used by PNG and GIF output.

use super::{ColorType, Image};
use crate::color::Rgba;

/// Composite `image` over a solid `background`.
///
/// The result is always RGBA. For every pixel with source alpha `as` and
/// background alpha `ab`:
///
/// ```text
/// ao = as + ab * (1 - as)
/// co = (cs * as + cb * ab * (1 - as)) / ao
/// ```
///
/// Pixels where `ao == 0` come out as transparent black. An RGB `image` is
/// fully opaque and therefore only changes layout.
pub fn composite_over(image: &Image, background: Rgba) -> Image {
    if image.color_type() == ColorType::Rgb {
        return image.to_rgba();
    }
    let bg = background.to_array();
    let ab = bg[3] as f32 / 255.0;
    let mut out = image.to_mut();
    for px in out.data_mut().chunks_exact_mut(4) {
        let as_ = px[3] as f32 / 255.0;
        let ao = as_ + ab * (1.0 - as_);
        if ao <= 0.0 {
            px.copy_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            let v = (px[c] as f32 * as_ + bg[c] as f32 * ab * (1.0 - as_)) / ao;
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        px[3] = (ao * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageMut;

    fn single(color: Rgba) -> Image {
        ImageMut::filled(1, 1, ColorType::Rgba, color).unwrap().into()
    }

    #[test]
    fn test_transparent_over_opaque_is_background() {
        let out = composite_over(&single(Rgba::TRANSPARENT), Rgba::opaque(10, 20, 30));
        assert_eq!(out.get_rgba(0, 0).unwrap(), Rgba::opaque(10, 20, 30));
    }

    #[test]
    fn test_opaque_over_anything_is_source() {
        let out = composite_over(&single(Rgba::opaque(1, 2, 3)), Rgba::WHITE);
        assert_eq!(out.get_rgba(0, 0).unwrap(), Rgba::opaque(1, 2, 3));
    }

    #[test]
    fn test_half_alpha_over_black() {
        let out = composite_over(&single(Rgba::new(255, 255, 255, 128)), Rgba::BLACK);
        let px = out.get_rgba(0, 0).unwrap();
        assert_eq!(px.a, 255);
        assert_eq!(px.r, 128);
    }

    #[test]
    fn test_both_transparent() {
        let out = composite_over(&single(Rgba::new(9, 9, 9, 0)), Rgba::TRANSPARENT);
        assert_eq!(out.get_rgba(0, 0).unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_rgb_becomes_rgba() {
        let img = Image::new(2, 2, ColorType::Rgb).unwrap();
        let out = composite_over(&img, Rgba::WHITE);
        assert_eq!(out.color_type(), ColorType::Rgba);
        assert_eq!(out.get_rgba(1, 1).unwrap(), Rgba::BLACK);
    }
}
