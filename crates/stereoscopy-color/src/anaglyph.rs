//! Anaglyph synthesis
//!
//! An anaglyph fuses a stereo pair into one image: every output channel is a
//! linear mix of the left and right pixel,
//!
//! ```text
//! out[i] = sum_j left[i][j] * L[j] + sum_j right[i][j] * R[j]
//! ```
//!
//! clamped to `0..=255` and rounded. The two 3x3 matrices are what
//! distinguishes the methods:
//!
//! | Method | Left eye | Right eye |
//! |---|---|---|
//! | gray | luma | luma |
//! | color | rgb | rgb |
//! | half-color | luma | rgb |
//! | wimmer | wimmer cross-talk | rgb |
//! | dubois | fixed table | fixed table |
//!
//! Except for Dubois, row `i` of each eye's matrix is scaled by that eye's
//! color scheme weight for channel `i`. When the left eye's weights sum to
//! more than the right eye's (amber-blue), the two eye roles swap.
//!
//! The Wimmer method additionally gamma-corrects every channel passed by
//! the dominant eye and, for red-cyan glasses, desaturates strongly red
//! pixels of the left image before mixing to reduce ghosting.

use crate::scheme::{ColorMatrix, RGB_MATRIX, WIMMER_MATRIX, dubois_matrices};
use crate::{ColorError, ColorResult, ColorScheme, LumaCoding};
use log::debug;
use std::fmt;
use std::str::FromStr;
use stereoscopy_core::{ColorType, Image, ImageMut};

/// Anaglyph method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnaglyphMethod {
    /// Luma for both eyes
    Gray,
    /// Full color for both eyes
    Color,
    /// Luma for the filtered eye, color for the other
    HalfColor,
    /// Half color with cross-talk and gamma correction
    #[default]
    Wimmer,
    /// Fixed least-squares matrices
    Dubois,
}

impl AnaglyphMethod {
    /// All methods
    pub const ALL: [AnaglyphMethod; 5] = [
        AnaglyphMethod::Gray,
        AnaglyphMethod::Color,
        AnaglyphMethod::HalfColor,
        AnaglyphMethod::Wimmer,
        AnaglyphMethod::Dubois,
    ];

    /// The method name as used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            AnaglyphMethod::Gray => "gray",
            AnaglyphMethod::Color => "color",
            AnaglyphMethod::HalfColor => "half-color",
            AnaglyphMethod::Wimmer => "wimmer",
            AnaglyphMethod::Dubois => "dubois",
        }
    }
}

impl fmt::Display for AnaglyphMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnaglyphMethod {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        AnaglyphMethod::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| ColorError::UnknownMethod(s.to_string()))
    }
}

/// Left and right color mixing matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnaglyphMatrices {
    pub left: ColorMatrix,
    pub right: ColorMatrix,
}

/// Per-eye matrix kind before scheme weighting
#[derive(Debug, Clone, Copy)]
enum MatrixKind {
    Luma,
    Rgb,
    Wimmer,
}

/// Extra processing around the linear mix
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hooks {
    Plain,
    Wimmer {
        /// Gamma weights of the dominant eye, per channel
        gamma_weights: [f64; 3],
        /// Desaturate red-dominant pixels of the left image first
        preprocess: bool,
    },
}

/// A resolved anaglyph method: matrices plus processing hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anaglyph {
    matrices: AnaglyphMatrices,
    hooks: Hooks,
}

fn weighted(kind: MatrixKind, luma: [f64; 3], weights: [f64; 3]) -> ColorMatrix {
    let base = match kind {
        MatrixKind::Luma => [luma; 3],
        MatrixKind::Rgb => RGB_MATRIX,
        MatrixKind::Wimmer => WIMMER_MATRIX,
    };
    std::array::from_fn(|i| std::array::from_fn(|j| base[i][j] * weights[i]))
}

impl Anaglyph {
    /// Resolve a method for a color scheme and luma coding.
    ///
    /// The luma coding only affects the gray and half-color methods.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::UnsupportedDuboisScheme`] if `method` is
    /// [`AnaglyphMethod::Dubois`] and the scheme has no Dubois table.
    pub fn new(method: AnaglyphMethod, scheme: ColorScheme, luma: LumaCoding) -> ColorResult<Self> {
        let kinds = match method {
            AnaglyphMethod::Dubois => {
                let (left, right) = dubois_matrices(scheme)?;
                return Ok(Self::from_matrices(AnaglyphMatrices { left, right }));
            }
            AnaglyphMethod::Gray => (MatrixKind::Luma, MatrixKind::Luma),
            AnaglyphMethod::Color => (MatrixKind::Rgb, MatrixKind::Rgb),
            AnaglyphMethod::HalfColor => (MatrixKind::Luma, MatrixKind::Rgb),
            AnaglyphMethod::Wimmer => (MatrixKind::Wimmer, MatrixKind::Rgb),
        };
        let (lw, rw) = scheme.weights();
        let reversed = lw.iter().sum::<f64>() > rw.iter().sum::<f64>();
        let (lk, rk) = if reversed { (kinds.1, kinds.0) } else { kinds };
        let luma = luma.weights();
        let matrices = AnaglyphMatrices {
            left: weighted(lk, luma, lw),
            right: weighted(rk, luma, rw),
        };
        let hooks = match method {
            AnaglyphMethod::Wimmer => Hooks::Wimmer {
                gamma_weights: if reversed { rw } else { lw },
                preprocess: scheme == ColorScheme::RedCyan,
            },
            _ => Hooks::Plain,
        };
        debug!(
            "anaglyph {} / {}: reversed {}, matrices {:?}",
            method, scheme, reversed, matrices
        );
        Ok(Self { matrices, hooks })
    }

    /// Use arbitrary matrices with plain clamping.
    pub fn from_matrices(matrices: AnaglyphMatrices) -> Self {
        Self {
            matrices,
            hooks: Hooks::Plain,
        }
    }

    /// The resolved mixing matrices
    pub fn matrices(&self) -> &AnaglyphMatrices {
        &self.matrices
    }

    /// Prepare the input pair before mixing.
    ///
    /// Only the Wimmer method with red-cyan glasses changes anything: on
    /// every left pixel whose red exceeds green, green and blue are pulled
    /// towards red (`0.3 * r + 0.7 * c`, rounded half to even). The pull is
    /// applied twice, the second pass testing the already pulled values, so
    /// `(200, 100, 0)` becomes `(200, 151, 102)`. Otherwise the inputs are
    /// returned as shared clones.
    pub fn preprocess(&self, left: &Image, right: &Image) -> (Image, Image) {
        if !matches!(
            self.hooks,
            Hooks::Wimmer {
                preprocess: true,
                ..
            }
        ) {
            return (left.clone(), right.clone());
        }
        let mut l = left.to_mut();
        let ch = l.channels();
        for px in l.data_mut().chunks_exact_mut(ch) {
            for _ in 0..2 {
                let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
                if r > g {
                    px[1] = (r * 0.3 + g * 0.7).round_ties_even() as u8;
                    px[2] = (r * 0.3 + b * 0.7).round_ties_even() as u8;
                }
            }
        }
        (l.into(), right.clone())
    }

    /// Turn the linear mix of channel `channel` into an output sample.
    ///
    /// The value is clamped to `0..=255`. The Wimmer method then applies
    /// `(v / 255)^(1 / (1 + 0.3 * w)) * 255` for channels whose dominant-eye
    /// weight `w` is non-zero. The result is rounded.
    pub fn adjust_channel(&self, channel: usize, linear: f64) -> u8 {
        let v = if linear.is_nan() {
            0.0
        } else {
            linear.clamp(0.0, 255.0)
        };
        let v = match self.hooks {
            Hooks::Wimmer { gamma_weights, .. } if gamma_weights[channel] != 0.0 => {
                (v / 255.0).powf(1.0 / (1.0 + 0.3 * gamma_weights[channel])) * 255.0
            }
            _ => v,
        };
        v.round().clamp(0.0, 255.0) as u8
    }

    /// Create the anaglyph of a stereo pair.
    ///
    /// The output is RGBA, with the larger of the two alphas, when both
    /// inputs carry alpha; otherwise RGB.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::Core`] with
    /// [`DimensionMismatch`](stereoscopy_core::Error::DimensionMismatch) if
    /// the images differ in size.
    pub fn create(&self, left: &Image, right: &Image) -> ColorResult<Image> {
        left.check_same_size(right)?;
        let (left, right) = self.preprocess(left, right);
        let with_alpha = left.has_alpha() && right.has_alpha();
        let color_type = if with_alpha {
            ColorType::Rgba
        } else {
            ColorType::Rgb
        };
        let (w, h) = left.dimensions();
        let mut out = ImageMut::new(w, h, color_type)?;
        let (lc, rc, oc) = (left.channels(), right.channels(), color_type.channels());
        let AnaglyphMatrices { left: lm, right: rm } = self.matrices;

        for ((o, l), r) in out
            .data_mut()
            .chunks_exact_mut(oc)
            .zip(left.data().chunks_exact(lc))
            .zip(right.data().chunks_exact(rc))
        {
            let lv = [l[0] as f64, l[1] as f64, l[2] as f64];
            let rv = [r[0] as f64, r[1] as f64, r[2] as f64];
            for i in 0..3 {
                let linear = lm[i][0] * lv[0]
                    + lm[i][1] * lv[1]
                    + lm[i][2] * lv[2]
                    + rm[i][0] * rv[0]
                    + rm[i][1] * rv[1]
                    + rm[i][2] * rv[2];
                o[i] = self.adjust_channel(i, linear);
            }
            if with_alpha {
                o[3] = l[3].max(r[3]);
            }
        }
        Ok(out.into())
    }
}

/// Create an anaglyph in one call.
///
/// Shorthand for [`Anaglyph::new`] followed by [`Anaglyph::create`].
pub fn create_anaglyph(
    left: &Image,
    right: &Image,
    method: AnaglyphMethod,
    scheme: ColorScheme,
    luma: LumaCoding,
) -> ColorResult<Image> {
    Anaglyph::new(method, scheme, luma)?.create(left, right)
}
