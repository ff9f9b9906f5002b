//! Manual stereo adjustments
//!
//! A single shift is split between the two eyes: the left image moves by
//! `-shift` and the right image by `+shift`, so the pair separates
//! symmetrically. Each image also gets its own rotation angle.

use crate::AffineMatrix;

/// Build the adjustment matrix for each image of a stereo pair.
///
/// # Arguments
///
/// * `shift` - `(dx, dy)` applied as `-shift` to the left and `+shift` to the right image
/// * `angles` - Counter-clockwise rotation in degrees for the left and right image
/// * `sizes` - `(width, height)` of the left and right image
pub fn stereo_adjustments(
    shift: (f64, f64),
    angles: [f64; 2],
    sizes: [(u32, u32); 2],
) -> [AffineMatrix; 2] {
    let shifts = [(-shift.0, -shift.1), shift];
    std::array::from_fn(|i| {
        let (w, h) = sizes[i];
        AffineMatrix::from_shift_and_rotation(shifts[i], angles[i], (w as f64, h as f64))
    })
}

/// Combine base matrices (for example from auto alignment) with the manual
/// adjustments of [`stereo_adjustments`].
///
/// The result for image `i` is `base[i] * adjustment[i]`.
pub fn apply_adjustments(
    base: &[AffineMatrix; 2],
    shift: (f64, f64),
    angles: [f64; 2],
    sizes: [(u32, u32); 2],
) -> [AffineMatrix; 2] {
    let adjustments = stereo_adjustments(shift, angles, sizes);
    std::array::from_fn(|i| base[i].combine(&adjustments[i]))
}
