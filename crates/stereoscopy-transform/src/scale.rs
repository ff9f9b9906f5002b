//! Image scaling operations
//!
//! Separable convolution resampling: rows are filtered first into a
//! floating-point buffer, then columns. When downscaling, the filter
//! support is widened by the scale factor so every source pixel
//! contributes (anti-aliasing).
//!
//! Built on top of [`scale_to_size`]:
//! - [`resize`] - scale to cover a target size, then crop the overflow
//! - [`squash`] - halve the width or height

use crate::crop::Length;
use crate::{TransformError, TransformResult};
use stereoscopy_core::{Image, ImageMut};

/// Reconstruction filter for [`scale_to_size`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFilter {
    /// Linear (tent) filter, support 1
    Triangle,
    /// Cubic convolution with `a = -0.5`, support 2
    CatmullRom,
    /// Windowed sinc, support 3
    #[default]
    Lanczos3,
}

impl ScaleFilter {
    fn support(self) -> f64 {
        match self {
            ScaleFilter::Triangle => 1.0,
            ScaleFilter::CatmullRom => 2.0,
            ScaleFilter::Lanczos3 => 3.0,
        }
    }

    fn weight(self, t: f64) -> f64 {
        match self {
            ScaleFilter::Triangle => (1.0 - t.abs()).max(0.0),
            ScaleFilter::CatmullRom => crate::resample::cubic_weight(t),
            ScaleFilter::Lanczos3 => {
                if t.abs() < 3.0 {
                    sinc(t) * sinc(t / 3.0)
                } else {
                    0.0
                }
            }
        }
    }
}

fn sinc(t: f64) -> f64 {
    if t == 0.0 {
        1.0
    } else {
        let x = t * std::f64::consts::PI;
        x.sin() / x
    }
}

/// Per-output-sample window: first source index and normalized weights.
struct Contribution {
    start: usize,
    weights: Vec<f64>,
}

fn contributions(src_len: u32, dst_len: u32, filter: ScaleFilter) -> Vec<Contribution> {
    let scale = src_len as f64 / dst_len as f64;
    let filter_scale = scale.max(1.0);
    let support = filter.support() * filter_scale;
    (0..dst_len)
        .map(|i| {
            let center = (i as f64 + 0.5) * scale;
            let lo = (center - support).floor().max(0.0) as usize;
            let hi = ((center + support).ceil() as usize).min(src_len as usize);
            let mut weights = (lo..hi)
                .map(|j| filter.weight((j as f64 + 0.5 - center) / filter_scale))
                .collect::<Vec<_>>();
            let sum: f64 = weights.iter().sum();
            if sum != 0.0 {
                weights.iter_mut().for_each(|w| *w /= sum);
            }
            Contribution { start: lo, weights }
        })
        .collect()
}

/// Scale an image to an exact size
///
/// # Arguments
///
/// * `image` - Input image
/// * `width` - Target width
/// * `height` - Target height
/// * `filter` - Reconstruction filter
///
/// # Errors
///
/// Returns [`TransformError::Core`] if `width` or `height` is 0.
pub fn scale_to_size(
    image: &Image,
    width: u32,
    height: u32,
    filter: ScaleFilter,
) -> TransformResult<Image> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    let mut out = ImageMut::new(width, height, image.color_type())?;
    let ch = image.channels();
    let (src_w, src_h) = image.dimensions();

    // Horizontal pass: src_h rows of `width` pixels
    let xs = contributions(src_w, width, filter);
    let mut tmp = vec![0.0f64; width as usize * src_h as usize * ch];
    for y in 0..src_h {
        let row = image.row(y);
        let dst = &mut tmp[y as usize * width as usize * ch..][..width as usize * ch];
        for (x, c) in xs.iter().enumerate() {
            for (k, w) in c.weights.iter().enumerate() {
                let s = (c.start + k) * ch;
                for n in 0..ch {
                    dst[x * ch + n] += w * row[s + n] as f64;
                }
            }
        }
    }

    // Vertical pass
    let ys = contributions(src_h, height, filter);
    let stride = width as usize * ch;
    for (y, c) in ys.iter().enumerate() {
        let dst = out.row_mut(y as u32);
        let mut acc = vec![0.0f64; stride];
        for (k, w) in c.weights.iter().enumerate() {
            let src = &tmp[(c.start + k) * stride..][..stride];
            for (a, s) in acc.iter_mut().zip(src) {
                *a += w * s;
            }
        }
        for (d, a) in dst.iter_mut().zip(&acc) {
            *d = a.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out.into())
}

/// Resize an image to `size`, preserving the aspect ratio.
///
/// A zero dimension in `size` is derived from the other one. When both are
/// given, the image is scaled to cover the target and the overflow is
/// cropped, starting `offset` into it (pixels, or a percentage of the
/// overflow; `50%` centres the crop).
///
/// Resampling uses the Lanczos-3 filter.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if both dimensions are 0.
pub fn resize(image: &Image, size: (u32, u32), offset: &Length) -> TransformResult<Image> {
    let (tw, th) = size;
    if tw == 0 && th == 0 {
        return Err(TransformError::InvalidParameters(
            "resize needs at least one non-zero dimension".to_string(),
        ));
    }
    let (w, h) = image.dimensions();
    let width_ratio = tw as f64 / w as f64;
    let height_ratio = th as f64 / h as f64;

    let scaled_dim = |v: u32, ratio: f64| ((v as f64 * ratio).round() as u32).max(1);
    if width_ratio > height_ratio {
        let rh = scaled_dim(h, width_ratio);
        let scaled = scale_to_size(image, tw, rh, ScaleFilter::Lanczos3)?;
        if th == 0 || rh <= th {
            return Ok(scaled);
        }
        let overflow = rh - th;
        let off = offset.to_pixels(overflow).min(overflow);
        Ok(scaled.clip_rectangle(0, off, tw, th)?)
    } else if width_ratio < height_ratio {
        let rw = scaled_dim(w, height_ratio);
        let scaled = scale_to_size(image, rw, th, ScaleFilter::Lanczos3)?;
        if tw == 0 || rw <= tw {
            return Ok(scaled);
        }
        let overflow = rw - tw;
        let off = offset.to_pixels(overflow).min(overflow);
        Ok(scaled.clip_rectangle(off, 0, tw, th)?)
    } else {
        scale_to_size(image, tw, th, ScaleFilter::Lanczos3)
    }
}

/// Squash an image to half its width (`horizontal`) or half its height.
///
/// The halved dimension is rounded and never drops below 1.
pub fn squash(image: &Image, horizontal: bool) -> TransformResult<Image> {
    let (w, h) = image.dimensions();
    let half = |v: u32| ((v as f64 / 2.0).round() as u32).max(1);
    let (nw, nh) = if horizontal { (half(w), h) } else { (w, half(h)) };
    scale_to_size(image, nw, nh, ScaleFilter::Lanczos3)
}
