//! Inverse-mapped affine resampling
//!
//! Every output pixel centre `(x + 0.5, y + 0.5)` is mapped through the
//! output-to-source matrix. When the mapped point lies inside the source
//! image the pixel is interpolated from its neighbours, otherwise it gets
//! the fill color. Channels are interpolated independently (straight
//! alpha). The output keeps the source color type.

use crate::{AffineMatrix, TransformResult};
use stereoscopy_core::{Image, ImageMut, Rgba};

/// Interpolation kernel used by [`affine_warp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest source pixel
    Nearest,
    /// 2x2 linear interpolation
    Bilinear,
    /// 4x4 cubic convolution with `a = -0.5`
    #[default]
    Bicubic,
}

/// Options for [`affine_warp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpOptions {
    /// Interpolation kernel
    pub interpolation: Interpolation,
    /// Color for output pixels that map outside the source
    pub fill: Rgba,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Bicubic,
            fill: Rgba::TRANSPARENT,
        }
    }
}

/// Resample `image` onto a `size` canvas through an output-to-source matrix.
///
/// # Arguments
///
/// * `image` - Source image
/// * `matrix` - Maps output coordinates to source coordinates
/// * `size` - `(width, height)` of the output
/// * `options` - Interpolation kernel and fill color
///
/// # Errors
///
/// Returns [`TransformError::Core`](crate::TransformError::Core) if `size`
/// has a zero dimension.
pub fn affine_warp(
    image: &Image,
    matrix: &AffineMatrix,
    size: (u32, u32),
    options: &WarpOptions,
) -> TransformResult<Image> {
    let (out_w, out_h) = size;
    let mut out = ImageMut::filled(out_w, out_h, image.color_type(), options.fill)?;
    let ch = image.channels();
    let src_w = image.width() as f64;
    let src_h = image.height() as f64;
    let mut px = [0u8; 4];

    for y in 0..out_h {
        let row = out.row_mut(y);
        for x in 0..out_w {
            let (sx, sy) = matrix.apply(x as f64 + 0.5, y as f64 + 0.5);
            // Written as negated comparisons so NaN coordinates take the fill.
            if !(sx >= 0.0 && sx < src_w && sy >= 0.0 && sy < src_h) {
                continue;
            }
            match options.interpolation {
                Interpolation::Nearest => sample_nearest(image, sx, sy, &mut px[..ch]),
                Interpolation::Bilinear => sample_bilinear(image, sx, sy, &mut px[..ch]),
                Interpolation::Bicubic => sample_bicubic(image, sx, sy, &mut px[..ch]),
            }
            let start = x as usize * ch;
            row[start..start + ch].copy_from_slice(&px[..ch]);
        }
    }
    Ok(out.into())
}

#[inline]
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn sample_nearest(image: &Image, sx: f64, sy: f64, out: &mut [u8]) {
    let x = clamp_index(sx.floor() as i64, image.width());
    let y = clamp_index(sy.floor() as i64, image.height());
    if let Some(p) = image.pixel(x, y) {
        out.copy_from_slice(p);
    }
}

/// Sample at the pixel-centre coordinate `(sx, sy)` with edge clamping.
pub(crate) fn sample_bilinear(image: &Image, sx: f64, sy: f64, out: &mut [u8]) {
    let fx = sx - 0.5;
    let fy = sy - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let wx = fx - x0;
    let wy = fy - y0;
    let (w, h) = image.dimensions();
    let xs = [clamp_index(x0 as i64, w), clamp_index(x0 as i64 + 1, w)];
    let ys = [clamp_index(y0 as i64, h), clamp_index(y0 as i64 + 1, h)];
    let weights = [
        (1.0 - wx) * (1.0 - wy),
        wx * (1.0 - wy),
        (1.0 - wx) * wy,
        wx * wy,
    ];
    let ch = out.len();
    let mut acc = [0.0f64; 4];
    for (k, (yy, xx)) in [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().enumerate() {
        let start = (ys[yy] as usize * w as usize + xs[xx] as usize) * ch;
        let p = &image.data()[start..start + ch];
        for c in 0..ch {
            acc[c] += weights[k] * p[c] as f64;
        }
    }
    for c in 0..ch {
        out[c] = to_u8(acc[c]);
    }
}

/// Cubic convolution kernel with `a = -0.5`.
#[inline]
pub(crate) fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t < 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * A
    } else {
        0.0
    }
}

fn sample_bicubic(image: &Image, sx: f64, sy: f64, out: &mut [u8]) {
    let fx = sx - 0.5;
    let fy = sy - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let dx = fx - x0;
    let dy = fy - y0;
    let wx: [f64; 4] = std::array::from_fn(|i| cubic_weight(dx - (i as f64 - 1.0)));
    let wy: [f64; 4] = std::array::from_fn(|i| cubic_weight(dy - (i as f64 - 1.0)));
    let (w, h) = image.dimensions();
    let ch = out.len();
    let mut acc = [0.0f64; 4];
    for (j, wyj) in wy.iter().enumerate() {
        let yy = clamp_index(y0 as i64 + j as i64 - 1, h);
        let row = image.row(yy);
        for (i, wxi) in wx.iter().enumerate() {
            let xx = clamp_index(x0 as i64 + i as i64 - 1, w) as usize;
            let weight = wyj * wxi;
            for c in 0..ch {
                acc[c] += weight * row[xx * ch + c] as f64;
            }
        }
    }
    for c in 0..ch {
        out[c] = to_u8(acc[c]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoscopy_core::ColorType;

    fn ramp() -> Image {
        let mut m = ImageMut::new(8, 4, ColorType::Rgb).unwrap();
        for y in 0..4 {
            for x in 0..8 {
                let v = (x * 30) as u8;
                m.set_rgba(x, y, Rgba::opaque(v, v, v)).unwrap();
            }
        }
        m.into()
    }

    #[test]
    fn test_cubic_weight_partition_of_unity() {
        for t in [0.0, 0.25, 0.5, 0.9] {
            let sum: f64 = (-1..=2).map(|i| cubic_weight(t - i as f64)).sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(cubic_weight(0.0), 1.0);
        assert_eq!(cubic_weight(1.0), 0.0);
        assert_eq!(cubic_weight(2.5), 0.0);
    }

    #[test]
    fn test_identity_warp_is_exact() {
        let img = ramp();
        for interpolation in [
            Interpolation::Nearest,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ] {
            let opts = WarpOptions {
                interpolation,
                ..Default::default()
            };
            let out = affine_warp(&img, &AffineMatrix::identity(), (8, 4), &opts).unwrap();
            assert_eq!(out.data(), img.data(), "{interpolation:?}");
        }
    }

    #[test]
    fn test_integer_translation() {
        let img = ramp();
        let m = AffineMatrix::translation(2.0, 0.0);
        let out = affine_warp(&img, &m, (8, 4), &WarpOptions::default()).unwrap();
        assert_eq!(out.get_rgba(0, 0).unwrap(), img.get_rgba(2, 0).unwrap());
        // Pixels mapping past the right edge take the fill
        assert_eq!(out.get_rgba(6, 0).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_fill_keeps_color_type() {
        let img = ramp().to_rgba();
        let m = AffineMatrix::translation(-100.0, 0.0);
        let opts = WarpOptions {
            fill: Rgba::new(1, 2, 3, 4),
            ..Default::default()
        };
        let out = affine_warp(&img, &m, (3, 3), &opts).unwrap();
        assert_eq!(out.color_type(), ColorType::Rgba);
        assert_eq!(out.get_rgba(1, 1).unwrap(), Rgba::new(1, 2, 3, 4));
    }

    #[test]
    fn test_half_pixel_bilinear() {
        let img = ramp();
        let m = AffineMatrix::translation(0.5, 0.0);
        let opts = WarpOptions {
            interpolation: Interpolation::Bilinear,
            ..Default::default()
        };
        let out = affine_warp(&img, &m, (8, 4), &opts).unwrap();
        assert_eq!(out.get_rgba(1, 0).unwrap().r, 45);
    }
}
