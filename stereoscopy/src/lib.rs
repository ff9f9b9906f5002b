//! StereoscoPy - Stereoscopic 3D image creator
//!
//! Converts a stereo pair of photographs into a single viewable result:
//!
//! - Side-by-side images for cross-eyed or parallel viewing, or over/under
//! - Color anaglyphs for red-cyan and other filter glasses
//! - Interlaced and checkerboard images for passive displays
//! - Wiggle GIF animations
//!
//! Before composition the pair can be rotated, shifted and automatically
//! aligned on a shared canvas, then cropped and resized.
//!
//! # Example
//!
//! ```
//! use stereoscopy::{ColorType, ImageMut, OutputKind, Pipeline, PipelineOutput, Rgba, StereoOptions};
//!
//! let left = ImageMut::filled(64, 48, ColorType::Rgb, Rgba::WHITE).unwrap().into();
//! let right = ImageMut::filled(64, 48, ColorType::Rgb, Rgba::BLACK).unwrap().into();
//!
//! let options = StereoOptions {
//!     output: OutputKind::anaglyph(),
//!     ..Default::default()
//! };
//! let PipelineOutput::Still(anaglyph) = Pipeline::new(options).run([left, right]).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(anaglyph.dimensions(), (64, 48));
//! ```

pub mod cli;
mod error;
pub mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{OutputKind, Pipeline, PipelineOutput, SideBySideMode, StereoOptions};

// Re-export core types (primary data structures used everywhere)
pub use stereoscopy_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use stereoscopy_color as color;
pub use stereoscopy_compose as compose;
pub use stereoscopy_io as io;
pub use stereoscopy_transform as transform;
