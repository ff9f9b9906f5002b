//! Interlaced and checkerboard patterns
//!
//! Pattern formats suit passive 3D displays and DLP projectors: both images
//! are merged into one picture of the same size, each pixel taken from
//! either the left or the right image depending on which cell of the
//! pattern it falls into.

use crate::{ComposeError, ComposeResult};
use log::debug;
use stereoscopy_core::Image;

/// Cell pattern used to interleave the two images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pattern {
    /// Alternating bands of rows
    #[default]
    InterlacedHorizontal,
    /// Alternating bands of columns
    InterlacedVertical,
    /// Alternating square cells
    Checkerboard,
}

impl Pattern {
    /// Whether the pixel at `(x, y)` lies in an even cell for cells of
    /// `width` pixels.
    #[inline]
    pub fn is_even(self, x: u32, y: u32, width: u32) -> bool {
        match self {
            Pattern::InterlacedHorizontal => (y / width) % 2 == 0,
            Pattern::InterlacedVertical => (x / width) % 2 == 0,
            Pattern::Checkerboard => (x / width + y / width) % 2 == 0,
        }
    }
}

/// Merge a stereo pair into one image following a cell pattern.
///
/// The output has the size and color type of `left`. The left image owns
/// the even cells if `left_is_even`, the odd cells otherwise; the right
/// image fills the rest.
///
/// # Arguments
///
/// * `left` - Left image
/// * `right` - Right image, same size as `left`
/// * `pattern` - Cell pattern
/// * `width` - Cell width in pixels, at least 1
/// * `left_is_even` - Whether the left image owns the even cells
///
/// # Errors
///
/// Returns [`ComposeError::InvalidParameters`] if `width` is 0 and
/// [`ComposeError::Core`] if the images differ in size.
pub fn patterned(
    left: &Image,
    right: &Image,
    pattern: Pattern,
    width: u32,
    left_is_even: bool,
) -> ComposeResult<Image> {
    if width == 0 {
        return Err(ComposeError::InvalidParameters(
            "pattern width must be at least 1".into(),
        ));
    }
    left.check_same_size(right)?;
    debug!(
        "pattern {:?}, width {}, left even {}",
        pattern, width, left_is_even
    );

    let right = right.convert(left.color_type());
    let mut out = left.to_mut();
    let ch = out.channels();
    for y in 0..out.height() {
        let src = right.row(y);
        let dst = out.row_mut(y);
        for (x, (d, s)) in dst
            .chunks_exact_mut(ch)
            .zip(src.chunks_exact(ch))
            .enumerate()
        {
            if pattern.is_even(x as u32, y, width) != left_is_even {
                d.copy_from_slice(s);
            }
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoscopy_core::{ColorType, ImageMut, Rgba};

    fn solid(w: u32, h: u32, ct: ColorType, c: Rgba) -> Image {
        ImageMut::filled(w, h, ct, c).unwrap().into()
    }

    fn reds(img: &Image) -> Vec<u8> {
        img.data().chunks_exact(img.channels()).map(|p| p[0]).collect()
    }

    #[test]
    fn test_vertical_interlace_alternates() {
        let l = solid(4, 1, ColorType::Rgb, Rgba::WHITE);
        let r = solid(4, 1, ColorType::Rgb, Rgba::BLACK);
        let out = patterned(&l, &r, Pattern::InterlacedVertical, 1, true).unwrap();
        assert_eq!(reds(&out), vec![255, 0, 255, 0]);
        let out = patterned(&l, &r, Pattern::InterlacedVertical, 1, false).unwrap();
        assert_eq!(reds(&out), vec![0, 255, 0, 255]);
    }

    #[test]
    fn test_wide_cells() {
        let l = solid(6, 1, ColorType::Rgb, Rgba::WHITE);
        let r = solid(6, 1, ColorType::Rgb, Rgba::BLACK);
        let out = patterned(&l, &r, Pattern::InterlacedVertical, 2, true).unwrap();
        assert_eq!(reds(&out), vec![255, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_checkerboard() {
        let l = solid(2, 2, ColorType::Rgba, Rgba::WHITE);
        let r = solid(2, 2, ColorType::Rgb, Rgba::BLACK);
        let out = patterned(&l, &r, Pattern::Checkerboard, 1, true).unwrap();
        assert_eq!(out.color_type(), ColorType::Rgba);
        assert_eq!(reds(&out), vec![255, 0, 0, 255]);
        assert_eq!(out.get_rgba(1, 0).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_horizontal_interlace() {
        let l = solid(1, 3, ColorType::Rgb, Rgba::WHITE);
        let r = solid(1, 3, ColorType::Rgb, Rgba::BLACK);
        let out = patterned(&l, &r, Pattern::InterlacedHorizontal, 1, true).unwrap();
        assert_eq!(reds(&out), vec![255, 0, 255]);
    }

    #[test]
    fn test_zero_width_rejected() {
        let l = solid(2, 2, ColorType::Rgb, Rgba::WHITE);
        assert!(matches!(
            patterned(&l, &l, Pattern::Checkerboard, 0, true),
            Err(ComposeError::InvalidParameters(_))
        ));
    }
}
