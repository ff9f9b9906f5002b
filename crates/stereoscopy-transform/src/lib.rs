//! stereoscopy-transform - Geometric transformations for stereo pairs
//!
//! This crate provides the geometric half of stereo image preparation:
//!
//! - Affine matrix construction and composition ([`AffineMatrix`])
//! - Per-eye shift and rotation adjustments ([`stereo_adjustments`])
//! - Automatic alignment behind a pluggable estimator ([`find_alignments`])
//! - A shared output canvas, expanded or shrunk ([`transform_images`])
//! - Inverse-mapped resampling ([`affine_warp`])
//! - Cropping, resizing and squashing
//! - EXIF orientation correction

pub mod adjust;
pub mod align;
pub mod canvas;
pub mod crop;
mod error;
pub mod matrix;
pub mod orient;
pub mod resample;
pub mod scale;

pub use adjust::{apply_adjustments, stereo_adjustments};
pub use align::{
    AlignmentEstimator, EccEstimator, LumaPlane, THUMBNAIL_SIZE, TermCriteria, find_alignments,
};
pub use canvas::{Canvas, CanvasMode, resolve_canvas, transform_images};
pub use crop::{CropBox, Length, crop};
pub use error::{TransformError, TransformResult};
pub use matrix::{AffineMatrix, Bounds, combine_matrices};
pub use orient::{Orientation, apply_orientation, rotate_90, rotate_180};
pub use resample::{Interpolation, WarpOptions, affine_warp};
pub use scale::{ScaleFilter, resize, scale_to_size, squash};
