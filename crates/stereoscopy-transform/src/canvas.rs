//! Shared output canvas for a set of transformed images
//!
//! Every image of a stereo pair is transformed by its own matrix, but the
//! results must share one size. The canvas is resolved in one of two ways:
//!
//! - **Expand**: the canvas grows until it contains every transformed
//!   picture; uncovered corners are filled.
//! - **Shrink**: the canvas shrinks to the largest rectangle of the original
//!   aspect ratio that every transformed picture still covers, so no fill
//!   is visible.
//!
//! After resolution each matrix is recentered on the canvas and the images
//! are resampled with bicubic interpolation.

use crate::resample::{WarpOptions, affine_warp};
use crate::{AffineMatrix, TransformError, TransformResult};
use log::debug;
use stereoscopy_core::{Image, MAX_PIXELS};

/// How the shared canvas is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasMode {
    /// Grow around every transformed picture (union)
    Expand,
    /// Shrink into every transformed picture (intersection)
    #[default]
    Shrink,
}

/// A resolved canvas: the common output size and the recentered matrix of
/// each image.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub matrices: Vec<AffineMatrix>,
}

/// Candidate canvas size for one image, before combining across images.
fn image_extent(size: (u32, u32), matrix: &AffineMatrix, mode: CanvasMode) -> (f64, f64) {
    let w = size.0 as f64;
    let h = size.1 as f64;
    let aspect = w / h;
    let bounds = matrix.linear_bounds((w, h));
    let exp_w = bounds.width();
    let exp_h = bounds.height();

    let [a, b, tx, c, d, ty] = *matrix.coeffs();
    let tx = tx + bounds.min_x + (exp_w - w) / 2.0;
    let ty = ty + bounds.min_y + (exp_h - h) / 2.0;
    let det = a * d - b * c;
    let margin_x = ((d * tx - b * ty) / det).abs();
    let margin_y = ((a * ty - c * tx) / det).abs();

    match mode {
        CanvasMode::Expand => {
            let mut width = exp_w + 2.0 * margin_x;
            let mut height = exp_h + 2.0 * margin_y;
            let height_from_width = width / aspect;
            if height_from_width > height {
                height = height_from_width;
            } else if height_from_width < height {
                width = height * aspect;
            }
            (width, height)
        }
        CanvasMode::Shrink => {
            let rotated_aspect = exp_w / exp_h;
            let total_height = if aspect < 1.0 { w / rotated_aspect } else { h };
            let angle = a.clamp(-1.0, 1.0).acos();
            let height = total_height / (aspect * angle.sin().abs() + angle.cos().abs());

            let mut width = (height * aspect).floor() - margin_x * 2.0;
            let mut height = height.floor() - margin_y * 2.0;
            let height_from_width = width / aspect;
            if height_from_width < height {
                height = height_from_width;
            } else if height_from_width > height {
                width = height * aspect;
            }
            (width, height)
        }
    }
}

/// Resolve the common canvas for images of the given sizes.
///
/// # Arguments
///
/// * `sizes` - `(width, height)` of each image
/// * `matrices` - Output-to-source matrix of each image
/// * `mode` - Expand around or shrink into the transformed pictures
///
/// # Errors
///
/// - [`TransformError::InvalidParameters`] if the inputs are empty or the
///   counts differ.
/// - [`TransformError::DegenerateCanvas`] if the resolved size is not a
///   positive finite area or holds more than
///   [`MAX_PIXELS`](stereoscopy_core::MAX_PIXELS) pixels.
pub fn resolve_canvas(
    sizes: &[(u32, u32)],
    matrices: &[AffineMatrix],
    mode: CanvasMode,
) -> TransformResult<Canvas> {
    if sizes.is_empty() || sizes.len() != matrices.len() {
        return Err(TransformError::InvalidParameters(format!(
            "need one matrix per image, got {} images and {} matrices",
            sizes.len(),
            matrices.len()
        )));
    }

    let mut out_w: Option<f64> = None;
    let mut out_h: Option<f64> = None;
    for (size, matrix) in sizes.iter().zip(matrices) {
        let (w, h) = image_extent(*size, matrix, mode);
        let pick = |acc: Option<f64>, v: f64| match (acc, mode) {
            (None, _) => v,
            (Some(a), CanvasMode::Expand) => a.max(v),
            (Some(a), CanvasMode::Shrink) => a.min(v),
        };
        out_w = Some(pick(out_w, w));
        out_h = Some(pick(out_h, h));
    }
    let (width, height) = match (out_w, out_h, mode) {
        (Some(w), Some(h), CanvasMode::Expand) => (w.ceil(), h.ceil()),
        (Some(w), Some(h), CanvasMode::Shrink) => (w.floor(), h.floor()),
        _ => (f64::NAN, f64::NAN),
    };
    if !(width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0)
        || width > u32::MAX as f64
        || height > u32::MAX as f64
        || width * height > MAX_PIXELS as f64
    {
        return Err(TransformError::DegenerateCanvas { width, height });
    }

    let recentered = sizes
        .iter()
        .zip(matrices)
        .map(|(&(w, h), m)| {
            let x = (width - w as f64) / 2.0;
            let y = (height - h as f64) / 2.0;
            let [a, b, c, d, e, f] = *m.coeffs();
            AffineMatrix::from_coeffs([a, b, c - (a * x + b * y), d, e, f - (d * x + e * y)])
        })
        .collect::<Vec<_>>();

    debug!(
        "resolved {:?} canvas {}x{} for {} images",
        mode,
        width,
        height,
        sizes.len()
    );
    for (i, m) in recentered.iter().enumerate() {
        debug!("  matrix {}: {:?}", i, m.coeffs());
    }

    Ok(Canvas {
        width: width as u32,
        height: height as u32,
        matrices: recentered,
    })
}

/// Transform every image by its matrix onto one shared canvas.
///
/// The canvas is resolved with [`resolve_canvas`] before any resampling, so
/// a degenerate canvas fails without doing work. All outputs share the same
/// dimensions.
///
/// # Errors
///
/// See [`resolve_canvas`] and [`affine_warp`].
pub fn transform_images(
    images: &[Image],
    matrices: &[AffineMatrix],
    mode: CanvasMode,
    options: &WarpOptions,
) -> TransformResult<Vec<Image>> {
    let sizes = images.iter().map(Image::dimensions).collect::<Vec<_>>();
    let canvas = resolve_canvas(&sizes, matrices, mode)?;
    images
        .iter()
        .zip(&canvas.matrices)
        .map(|(img, m)| affine_warp(img, m, (canvas.width, canvas.height), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_keeps_size() {
        for mode in [CanvasMode::Expand, CanvasMode::Shrink] {
            let canvas = resolve_canvas(&[(64, 48); 2], &[AffineMatrix::identity(); 2], mode)
                .unwrap();
            assert_eq!((canvas.width, canvas.height), (64, 48), "{mode:?}");
            assert_eq!(canvas.matrices[0], AffineMatrix::identity());
        }
    }

    #[test]
    fn test_shift_grows_or_shrinks() {
        let m = AffineMatrix::from_shift_and_rotation((10.0, 0.0), 0.0, (100.0, 50.0));
        let expand = resolve_canvas(&[(100, 50)], &[m], CanvasMode::Expand).unwrap();
        assert_eq!((expand.width, expand.height), (120, 60));
        let shrink = resolve_canvas(&[(100, 50)], &[m], CanvasMode::Shrink).unwrap();
        assert_eq!((shrink.width, shrink.height), (80, 40));
    }

    #[test]
    fn test_count_mismatch() {
        let err = resolve_canvas(&[(10, 10); 2], &[AffineMatrix::identity()], CanvasMode::Expand);
        assert!(matches!(err, Err(TransformError::InvalidParameters(_))));
        let err = resolve_canvas(&[], &[], CanvasMode::Expand);
        assert!(matches!(err, Err(TransformError::InvalidParameters(_))));
    }

    #[test]
    fn test_shift_larger_than_image_is_degenerate() {
        let m = AffineMatrix::from_shift_and_rotation((60.0, 0.0), 0.0, (100.0, 50.0));
        let err = resolve_canvas(&[(100, 50)], &[m], CanvasMode::Shrink);
        assert!(matches!(err, Err(TransformError::DegenerateCanvas { .. })));
    }

    #[test]
    fn test_huge_expand_is_rejected_before_allocation() {
        let m = AffineMatrix::from_shift_and_rotation((1e9, 0.0), 0.0, (100.0, 50.0));
        let sizes = [(100, 50), (100, 50)];
        let err = resolve_canvas(&sizes, &[AffineMatrix::identity(), m], CanvasMode::Expand);
        assert!(matches!(err, Err(TransformError::DegenerateCanvas { .. })));

        let img: Image = stereoscopy_core::ImageMut::new(100, 50, stereoscopy_core::ColorType::Rgb)
            .unwrap()
            .into();
        let err = transform_images(
            &[img.clone(), img],
            &[AffineMatrix::identity(), m],
            CanvasMode::Expand,
            &WarpOptions::default(),
        );
        assert!(matches!(err, Err(TransformError::DegenerateCanvas { .. })));
    }

    #[test]
    fn test_nan_matrix_is_degenerate() {
        let m = AffineMatrix::from_shift_and_rotation((f64::NAN, 0.0), 0.0, (10.0, 10.0));
        let err = resolve_canvas(&[(10, 10)], &[m], CanvasMode::Expand);
        assert!(matches!(err, Err(TransformError::DegenerateCanvas { .. })));
    }
}
