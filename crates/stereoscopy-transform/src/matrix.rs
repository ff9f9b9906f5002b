//! Affine matrices for stereo adjustment
//!
//! An affine transformation is represented as:
//! ```text
//! | a  b  c |
//! | d  e  f |
//! | 0  0  1 |
//! ```
//!
//! Every matrix in this crate maps *output* coordinates to *source*
//! coordinates: the output pixel at `(x, y)` is sampled from
//! ```text
//! x_src = a*x + b*y + c
//! y_src = d*x + e*y + f
//! ```
//!
//! Matrices are plain `Copy` values; composition always yields a new one.
//! NaN and infinite coefficients are not rejected here and propagate through
//! every operation.

use crate::{TransformError, TransformResult};

/// Determinants with a smaller magnitude are treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Axis-aligned bounds of a set of projected points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Horizontal extent `max_x - min_x`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Vertical extent `max_y - min_y`.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// 2D affine transformation matrix (6 coefficients, implicit last row)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    /// Coefficients [a, b, c, d, e, f]
    coeffs: [f64; 6],
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    /// Create the identity transformation
    pub const fn identity() -> Self {
        Self {
            coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Create from raw coefficients `[a, b, c, d, e, f]`
    pub const fn from_coeffs(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    /// Create from the top two rows of the 3x3 matrix
    pub const fn from_rows(rows: [[f64; 3]; 2]) -> Self {
        let [[a, b, c], [d, e, f]] = rows;
        Self {
            coeffs: [a, b, c, d, e, f],
        }
    }

    /// Create a pure translation
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            coeffs: [1.0, 0.0, tx, 0.0, 1.0, ty],
        }
    }

    /// Get the raw coefficients `[a, b, c, d, e, f]`
    #[inline]
    pub fn coeffs(&self) -> &[f64; 6] {
        &self.coeffs
    }

    /// Get the full 3x3 matrix, last row `(0, 0, 1)`
    pub fn rows(&self) -> [[f64; 3]; 3] {
        let [a, b, c, d, e, f] = self.coeffs;
        [[a, b, c], [d, e, f], [0.0, 0.0, 1.0]]
    }

    /// Get the translation part `(c, f)`
    #[inline]
    pub fn translation_part(&self) -> (f64, f64) {
        (self.coeffs[2], self.coeffs[5])
    }

    /// Replace the translation part
    #[inline]
    pub fn with_translation(mut self, tx: f64, ty: f64) -> Self {
        self.coeffs[2] = tx;
        self.coeffs[5] = ty;
        self
    }

    /// Determinant of the linear part `a*e - b*d`
    #[inline]
    pub fn determinant(&self) -> f64 {
        let [a, b, _, d, e, _] = self.coeffs;
        a * e - b * d
    }

    /// Transform the point `(x, y)`
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.coeffs;
        (a * x + b * y + c, d * x + e * y + f)
    }

    /// Compose two transformations as the matrix product `self * other`
    ///
    /// The result applies `other` first and `self` second when used as a
    /// point map. The product is associative but not commutative.
    pub fn combine(&self, other: &AffineMatrix) -> AffineMatrix {
        let [a1, b1, c1, d1, e1, f1] = self.coeffs;
        let [a2, b2, c2, d2, e2, f2] = other.coeffs;
        AffineMatrix {
            coeffs: [
                a1 * a2 + b1 * d2,
                a1 * b2 + b1 * e2,
                a1 * c2 + b1 * f2 + c1,
                d1 * a2 + e1 * d2,
                d1 * b2 + e1 * e2,
                d1 * c2 + e1 * f2 + f1,
            ],
        }
    }

    /// Compute the inverse transformation
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SingularMatrix`] when the determinant is
    /// (close to) zero or not finite.
    pub fn inverse(&self) -> TransformResult<AffineMatrix> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(TransformError::SingularMatrix);
        }
        let [a, b, c, d, e, f] = self.coeffs;
        let ia = e / det;
        let ib = -b / det;
        let id = -d / det;
        let ie = a / det;
        Ok(AffineMatrix {
            coeffs: [ia, ib, -(ia * c + ib * f), id, ie, -(id * c + ie * f)],
        })
    }

    /// Project the corners of a `width x height` rectangle through the
    /// linear part of the matrix (translation ignored).
    ///
    /// The corners used are `(0, 0)`, `(0, h)`, `(w, 0)` and `(w, h)`.
    pub fn linear_bounds(&self, size: (f64, f64)) -> Bounds {
        let [a, b, _, d, e, _] = self.coeffs;
        let (w, h) = size;
        let mut bounds = Bounds {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        };
        for (x, y) in [(0.0, h), (w, 0.0), (w, h)] {
            let px = a * x + b * y;
            let py = d * x + e * y;
            bounds.min_x = bounds.min_x.min(px);
            bounds.max_x = bounds.max_x.max(px);
            bounds.min_y = bounds.min_y.min(py);
            bounds.max_y = bounds.max_y.max(py);
        }
        bounds
    }

    /// Build one matrix from a shift and a counter-clockwise rotation.
    ///
    /// The linear part is `((cos, sin), (-sin, cos))`. The translation is the
    /// shift rotated into the new frame, corrected so that the rotation
    /// pivots about the centre of a `size` image instead of its origin.
    ///
    /// # Arguments
    ///
    /// * `shift` - `(dx, dy)` in source pixels
    /// * `angle` - Rotation in degrees, counter-clockwise
    /// * `size` - `(width, height)` of the image being adjusted
    ///
    /// A zero shift with a zero angle yields exactly the identity.
    pub fn from_shift_and_rotation(shift: (f64, f64), angle: f64, size: (f64, f64)) -> Self {
        let (dx, dy) = shift;
        let rad = angle.to_radians();
        let c = rad.cos();
        let s = rad.sin();
        let linear = AffineMatrix::from_rows([[c, s, 0.0], [-s, c, 0.0]]);
        let bounds = linear.linear_bounds(size);

        let tx = c * dx + s * dy - (bounds.min_x + (bounds.width() - size.0) / 2.0);
        let ty = -s * dx + c * dy - (bounds.min_y + (bounds.height() - size.1) / 2.0);
        linear.with_translation(tx, ty)
    }
}

/// Compose two matrices as `a * b`.
///
/// Equivalent to [`AffineMatrix::combine`].
pub fn combine_matrices(a: &AffineMatrix, b: &AffineMatrix) -> AffineMatrix {
    a.combine(b)
}
