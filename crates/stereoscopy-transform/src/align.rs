//! Automatic alignment of a stereo pair
//!
//! Alignment works on grayscale thumbnails. An [`AlignmentEstimator`]
//! computes the Euclidean motion that maps template (left) coordinates to
//! input (right) coordinates; [`find_alignments`] then scales that motion back
//! to full resolution and splits it evenly between both images, so each
//! image moves half way towards the other.
//!
//! Estimation failure is never fatal: it is logged and the pair is left
//! unaligned (identity matrices).
//!
//! The built-in [`EccEstimator`] is a Gauss-Newton search over rotation and
//! translation with a per-iteration gain/bias fit between the two planes,
//! which makes it insensitive to exposure differences between the cameras.

use crate::scale::{ScaleFilter, scale_to_size};
use crate::{AffineMatrix, TransformError, TransformResult};
use log::{debug, warn};
use stereoscopy_core::{ColorType, Image};

/// Longer side of the thumbnails the estimator runs on
pub const THUMBNAIL_SIZE: u32 = 500;

/// Minimum number of overlapping pixels for a usable estimate
const MIN_OVERLAP: usize = 16;

/// Stopping rule for iterative estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermCriteria {
    /// Maximum number of iterations
    pub iterations: u32,
    /// Stop once the parameter update norm falls below this value
    pub threshold: f64,
}

impl Default for TermCriteria {
    fn default() -> Self {
        Self {
            iterations: 20,
            threshold: 1e-10,
        }
    }
}

/// A single-channel floating-point image.
#[derive(Debug, Clone, PartialEq)]
pub struct LumaPlane {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl LumaPlane {
    /// Wrap row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidParameters`] if a dimension is 0 or
    /// the sample count does not match.
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> TransformResult<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize {
            return Err(TransformError::InvalidParameters(format!(
                "luma plane {}x{} with {} samples",
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Luma of an image, `(299 R + 587 G + 114 B) / 1000`.
    pub fn from_image(image: &Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.luma().into_iter().map(f32::from).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width as usize + x] as f64
    }

    /// Bilinear sample at integer-grid coordinates, `None` outside
    /// `[0, width - 1] x [0, height - 1]`.
    fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        if !(x >= 0.0 && x <= max_x && y >= 0.0 && y <= max_y) {
            return None;
        }
        let x0 = (x.floor() as usize).min(self.width as usize - 1);
        let y0 = (y.floor() as usize).min(self.height as usize - 1);
        let x1 = (x0 + 1).min(self.width as usize - 1);
        let y1 = (y0 + 1).min(self.height as usize - 1);
        let fx = x - x0 as f64;
        let fy = y - y0 as f64;
        let top = self.at(x0, y0) * (1.0 - fx) + self.at(x1, y0) * fx;
        let bot = self.at(x0, y1) * (1.0 - fx) + self.at(x1, y1) * fx;
        Some(top * (1.0 - fy) + bot * fy)
    }

    /// Separable 5-tap binomial blur with edge clamping.
    fn smoothed(&self) -> LumaPlane {
        const K: [f64; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];
        let w = self.width as i64;
        let h = self.height as i64;
        let idx = |x: i64, y: i64| (y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize;
        let mut tmp = vec![0.0f64; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                tmp[(y * w + x) as usize] = (0..5)
                    .map(|k| K[k] * self.data[idx(x + k as i64 - 2, y)] as f64)
                    .sum();
            }
        }
        let mut data = vec![0.0f32; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                let v: f64 = (0..5).map(|k| K[k] * tmp[idx(x, y + k as i64 - 2)]).sum();
                data[(y * w + x) as usize] = v as f32;
            }
        }
        LumaPlane {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Central-difference gradients `(d/dx, d/dy)`.
    fn gradients(&self) -> (LumaPlane, LumaPlane) {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut gx = vec![0.0f32; self.data.len()];
        let mut gy = vec![0.0f32; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                let (xl, xr) = (x.saturating_sub(1), (x + 1).min(w - 1));
                let (yu, yd) = (y.saturating_sub(1), (y + 1).min(h - 1));
                let dx = (xr - xl).max(1) as f64;
                let dy = (yd - yu).max(1) as f64;
                gx[y * w + x] = ((self.at(xr, y) - self.at(xl, y)) / dx) as f32;
                gy[y * w + x] = ((self.at(x, yd) - self.at(x, yu)) / dy) as f32;
            }
        }
        let plane = |data| LumaPlane {
            width: self.width,
            height: self.height,
            data,
        };
        (plane(gx), plane(gy))
    }
}

/// Estimates the motion between two luma planes.
pub trait AlignmentEstimator {
    /// Find the matrix mapping template coordinates to input coordinates.
    ///
    /// Only the top two rows of the result are meaningful.
    ///
    /// # Errors
    ///
    /// Any error makes [`find_alignments`] fall back to identity matrices.
    fn estimate(
        &self,
        template: &LumaPlane,
        input: &LumaPlane,
        criteria: &TermCriteria,
    ) -> TransformResult<AffineMatrix>;
}

/// Gauss-Newton Euclidean (rotation + translation) estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct EccEstimator;

impl EccEstimator {
    fn warp_matrix(p: &[f64; 3]) -> AffineMatrix {
        let (s, c) = p[0].sin_cos();
        AffineMatrix::from_rows([[c, -s, p[1]], [s, c, p[2]]])
    }
}

/// Solve the symmetric 3x3 system `h * x = b` by Cramer's rule.
fn solve3(h: &[[f64; 3]; 3], b: &[f64; 3]) -> Option<[f64; 3]> {
    let det3 = |m: &[[f64; 3]; 3]| {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    };
    let det = det3(h);
    let scale = (h[0][0] * h[1][1] * h[2][2]).abs();
    if !det.is_finite() || det.abs() <= 1e-12 * scale || det == 0.0 {
        return None;
    }
    let mut x = [0.0; 3];
    for (col, xi) in x.iter_mut().enumerate() {
        let mut m = *h;
        for row in 0..3 {
            m[row][col] = b[row];
        }
        *xi = det3(&m) / det;
    }
    Some(x)
}

impl AlignmentEstimator for EccEstimator {
    fn estimate(
        &self,
        template: &LumaPlane,
        input: &LumaPlane,
        criteria: &TermCriteria,
    ) -> TransformResult<AffineMatrix> {
        let fail = |msg: String| Err(TransformError::EstimatorFailed(msg));
        let tmpl = template.smoothed();
        let inp = input.smoothed();
        let (gx, gy) = inp.gradients();
        let mut p = [0.0f64; 3];

        for iteration in 0..criteria.iterations {
            let warp = Self::warp_matrix(&p);
            let (sin, cos) = p[0].sin_cos();

            // Gather the overlap: template value, warped input, and the
            // steepest-descent images for (theta, tx, ty).
            let mut samples: Vec<(f64, f64, [f64; 3])> = Vec::new();
            for y in 0..tmpl.height as usize {
                for x in 0..tmpl.width as usize {
                    let (xf, yf) = (x as f64, y as f64);
                    let (u, v) = warp.apply(xf, yf);
                    let (Some(iw), Some(dx), Some(dy)) =
                        (inp.sample(u, v), gx.sample(u, v), gy.sample(u, v))
                    else {
                        continue;
                    };
                    let du_dt = -sin * xf - cos * yf;
                    let dv_dt = cos * xf - sin * yf;
                    let sd = [dx * du_dt + dy * dv_dt, dx, dy];
                    samples.push((tmpl.at(x, y), iw, sd));
                }
            }
            if samples.len() < MIN_OVERLAP {
                return fail(format!(
                    "only {} overlapping pixels at iteration {}",
                    samples.len(),
                    iteration
                ));
            }

            // Zero-mean everything so that a bias between the planes drops out.
            let n = samples.len() as f64;
            let mean_t = samples.iter().map(|s| s.0).sum::<f64>() / n;
            let mean_i = samples.iter().map(|s| s.1).sum::<f64>() / n;
            let mut mean_sd = [0.0f64; 3];
            for s in &samples {
                for k in 0..3 {
                    mean_sd[k] += s.2[k] / n;
                }
            }
            let mut cross = 0.0;
            let mut energy = 0.0;
            for s in &samples {
                let i0 = s.1 - mean_i;
                cross += (s.0 - mean_t) * i0;
                energy += i0 * i0;
            }
            if energy <= f64::EPSILON || cross <= 0.0 {
                return fail(format!("no correlation at iteration {}", iteration));
            }
            let gain = cross / energy;

            let mut hess = [[0.0f64; 3]; 3];
            let mut rhs = [0.0f64; 3];
            for s in &samples {
                let sd: [f64; 3] = std::array::from_fn(|k| s.2[k] - mean_sd[k]);
                let err = (s.0 - mean_t) / gain - (s.1 - mean_i);
                for r in 0..3 {
                    rhs[r] += sd[r] * err;
                    for c in 0..3 {
                        hess[r][c] += sd[r] * sd[c];
                    }
                }
            }
            let Some(dp) = solve3(&hess, &rhs) else {
                return fail(format!("singular system at iteration {}", iteration));
            };
            for k in 0..3 {
                p[k] += dp[k];
            }
            if !p.iter().all(|v| v.is_finite()) {
                return fail("non-finite parameters".to_string());
            }
            let norm = dp.iter().map(|v| v * v).sum::<f64>().sqrt();
            debug!(
                "ecc iteration {}: theta {:.6} t ({:.4}, {:.4}) |dp| {:.3e}",
                iteration, p[0], p[1], p[2], norm
            );
            if norm < criteria.threshold {
                break;
            }
        }

        Ok(Self::warp_matrix(&p))
    }
}

/// Downscale so the longer side is at most [`THUMBNAIL_SIZE`], returning
/// the plane and the full-size to thumbnail ratio.
fn thumbnail(image: &Image) -> TransformResult<(LumaPlane, f64)> {
    let (w, h) = image.dimensions();
    let long = w.max(h);
    if long <= THUMBNAIL_SIZE {
        return Ok((LumaPlane::from_image(image), 1.0));
    }
    let scale = THUMBNAIL_SIZE as f64 / long as f64;
    let tw = ((w as f64 * scale).round() as u32).max(1);
    let th = ((h as f64 * scale).round() as u32).max(1);
    let small = scale_to_size(&image.convert(ColorType::Rgb), tw, th, ScaleFilter::Triangle)?;
    Ok((LumaPlane::from_image(&small), long as f64 / tw.max(th) as f64))
}

/// Find the alignment matrices of a stereo pair.
///
/// The estimated motion `m` (left to right, at thumbnail scale) has its
/// translation scaled back to full resolution and its off-diagonal and
/// translation terms halved. The left image gets
/// `((m00, -m01, -m02), (-m10, m11, -m12))`, the right image `m` itself.
///
/// # Errors
///
/// Only fails if a thumbnail cannot be built. Estimator errors are logged
/// as warnings and yield identity matrices.
pub fn find_alignments(
    left: &Image,
    right: &Image,
    estimator: &dyn AlignmentEstimator,
    criteria: &TermCriteria,
) -> TransformResult<[AffineMatrix; 2]> {
    let (template, ratio) = thumbnail(left)?;
    let (input, _) = thumbnail(right)?;

    let m = match estimator.estimate(&template, &input, criteria) {
        Ok(m) => m,
        Err(e) => {
            warn!("auto alignment failed, leaving the images unaligned: {}", e);
            return Ok([AffineMatrix::identity(); 2]);
        }
    };
    let [m00, m01, m02, m10, m11, m12] = *m.coeffs();
    let m01 = m01 / 2.0;
    let m10 = m10 / 2.0;
    let m02 = m02 * ratio / 2.0;
    let m12 = m12 * ratio / 2.0;

    let left_m = AffineMatrix::from_rows([[m00, -m01, -m02], [-m10, m11, -m12]]);
    let right_m = AffineMatrix::from_rows([[m00, m01, m02], [m10, m11, m12]]);
    debug!("alignment left {:?}", left_m.coeffs());
    debug!("alignment right {:?}", right_m.coeffs());
    Ok([left_m, right_m])
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoscopy_core::{ImageMut, Rgba};

    struct Failing;

    impl AlignmentEstimator for Failing {
        fn estimate(
            &self,
            _template: &LumaPlane,
            _input: &LumaPlane,
            _criteria: &TermCriteria,
        ) -> TransformResult<AffineMatrix> {
            Err(TransformError::EstimatorFailed("always".to_string()))
        }
    }

    struct Fixed(AffineMatrix);

    impl AlignmentEstimator for Fixed {
        fn estimate(
            &self,
            _template: &LumaPlane,
            _input: &LumaPlane,
            _criteria: &TermCriteria,
        ) -> TransformResult<AffineMatrix> {
            Ok(self.0)
        }
    }

    fn solid(w: u32, h: u32) -> Image {
        ImageMut::filled(w, h, ColorType::Rgb, Rgba::opaque(90, 90, 90))
            .unwrap()
            .into()
    }

    #[test]
    fn test_failure_yields_identity() {
        let img = solid(20, 10);
        let m = find_alignments(&img, &img, &Failing, &TermCriteria::default()).unwrap();
        assert_eq!(m, [AffineMatrix::identity(); 2]);
    }

    #[test]
    fn test_flat_images_fail_to_identity() {
        let img = solid(40, 30);
        let plane = LumaPlane::from_image(&img);
        assert!(
            EccEstimator
                .estimate(&plane, &plane, &TermCriteria::default())
                .is_err()
        );
        let m = find_alignments(&img, &img, &EccEstimator, &TermCriteria::default()).unwrap();
        assert_eq!(m, [AffineMatrix::identity(); 2]);
    }

    #[test]
    fn test_split_between_images() {
        let est = Fixed(AffineMatrix::from_rows([[1.0, 0.2, 8.0], [-0.2, 1.0, -4.0]]));
        let img = solid(100, 50);
        let [l, r] = find_alignments(&img, &img, &est, &TermCriteria::default()).unwrap();
        assert_eq!(l.coeffs(), &[1.0, -0.1, -4.0, 0.1, 1.0, 2.0]);
        assert_eq!(r.coeffs(), &[1.0, 0.1, 4.0, -0.1, 1.0, -2.0]);
    }

    #[test]
    fn test_translation_scaled_from_thumbnail() {
        let est = Fixed(AffineMatrix::translation(10.0, 0.0));
        let img = solid(1000, 400);
        let [_, r] = find_alignments(&img, &img, &est, &TermCriteria::default()).unwrap();
        assert_eq!(r.translation_part(), (10.0, 0.0));
    }

    #[test]
    fn test_luma_plane_validation() {
        assert!(LumaPlane::new(2, 2, vec![0.0; 3]).is_err());
        assert!(LumaPlane::new(0, 2, vec![]).is_err());
        assert!(LumaPlane::new(2, 2, vec![0.0; 4]).is_ok());
    }

    #[test]
    fn test_solve3() {
        let h = [[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 8.0]];
        assert_eq!(solve3(&h, &[2.0, 4.0, 8.0]), Some([1.0, 1.0, 1.0]));
        assert_eq!(solve3(&[[0.0; 3]; 3], &[1.0, 1.0, 1.0]), None);
    }
}
