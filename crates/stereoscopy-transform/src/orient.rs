//! Orthogonal rotations and EXIF orientation
//!
//! Camera images often store pixels in sensor order together with an EXIF
//! orientation tag. [`Orientation`] maps the tag value to the rotation that
//! brings the picture upright; reading the tag itself is left to the caller.

use crate::TransformResult;
use stereoscopy_core::{Image, ImageMut};

/// Upright correction derived from an EXIF orientation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Already upright
    #[default]
    Normal,
    /// Rotate by 180 degrees (EXIF 3)
    Rotate180,
    /// Rotate by 90 degrees clockwise (EXIF 6)
    Rotate90Cw,
    /// Rotate by 90 degrees counter-clockwise (EXIF 8)
    Rotate90Ccw,
}

impl Orientation {
    /// Map an EXIF orientation value. Mirrored and unknown values are
    /// treated as upright.
    pub fn from_exif(value: u16) -> Self {
        match value {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90Cw,
            8 => Orientation::Rotate90Ccw,
            _ => Orientation::Normal,
        }
    }
}

/// Rotate an image so that it is upright.
///
/// [`Orientation::Normal`] returns a shared clone.
pub fn apply_orientation(image: &Image, orientation: Orientation) -> TransformResult<Image> {
    match orientation {
        Orientation::Normal => Ok(image.clone()),
        Orientation::Rotate180 => rotate_180(image),
        Orientation::Rotate90Cw => rotate_90(image, true),
        Orientation::Rotate90Ccw => rotate_90(image, false),
    }
}

/// Rotate by 90 degrees.
///
/// # Arguments
///
/// * `image` - Input image
/// * `clockwise` - Rotate clockwise when true, counter-clockwise otherwise
pub fn rotate_90(image: &Image, clockwise: bool) -> TransformResult<Image> {
    let (w, h) = image.dimensions();
    let ch = image.channels();
    let mut out = ImageMut::new(h, w, image.color_type())?;
    for y in 0..w {
        let row = out.row_mut(y);
        for x in 0..h {
            let (sx, sy) = if clockwise {
                (y, h - 1 - x)
            } else {
                (w - 1 - y, x)
            };
            if let Some(p) = image.pixel(sx, sy) {
                row[x as usize * ch..(x as usize + 1) * ch].copy_from_slice(p);
            }
        }
    }
    Ok(out.into())
}

/// Rotate by 180 degrees.
pub fn rotate_180(image: &Image) -> TransformResult<Image> {
    let ch = image.channels();
    let mut out = image.to_mut();
    let data = out.data_mut();
    let n = data.len() / ch;
    for i in 0..n / 2 {
        let j = n - 1 - i;
        for c in 0..ch {
            data.swap(i * ch + c, j * ch + c);
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoscopy_core::{ColorType, Rgba};

    fn marked() -> Image {
        // 3x2, white at the top-left corner
        let mut m = ImageMut::new(3, 2, ColorType::Rgb).unwrap();
        m.set_rgba(0, 0, Rgba::WHITE).unwrap();
        m.into()
    }

    #[test]
    fn test_from_exif() {
        assert_eq!(Orientation::from_exif(3), Orientation::Rotate180);
        assert_eq!(Orientation::from_exif(6), Orientation::Rotate90Cw);
        assert_eq!(Orientation::from_exif(8), Orientation::Rotate90Ccw);
        assert_eq!(Orientation::from_exif(1), Orientation::Normal);
        assert_eq!(Orientation::from_exif(5), Orientation::Normal);
    }

    #[test]
    fn test_rotate_90_cw_moves_corner() {
        let out = rotate_90(&marked(), true).unwrap();
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.get_rgba(1, 0).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_rotate_90_ccw_moves_corner() {
        let out = rotate_90(&marked(), false).unwrap();
        assert_eq!(out.get_rgba(0, 2).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_rotate_180_twice() {
        let img = marked();
        let once = rotate_180(&img).unwrap();
        assert_eq!(once.get_rgba(2, 1).unwrap(), Rgba::WHITE);
        let twice = apply_orientation(&once, Orientation::Rotate180).unwrap();
        assert_eq!(twice.data(), img.data());
    }

    #[test]
    fn test_four_quarter_turns() {
        let img = marked();
        let mut cur = img.clone();
        for _ in 0..4 {
            cur = rotate_90(&cur, true).unwrap();
        }
        assert_eq!(cur.data(), img.data());
    }
}
