//! stereoscopy-color - Anaglyph synthesis
//!
//! This crate fuses a stereo pair into a single anaglyph image viewed
//! through colored glasses:
//!
//! - Glasses color schemes and luma codings ([`ColorScheme`], [`LumaCoding`])
//! - Matrix based methods: gray, color, half-color, Wimmer and Dubois
//!   ([`AnaglyphMethod`])
//! - The mixing engine with per-method hooks ([`Anaglyph`])

pub mod anaglyph;
mod error;
pub mod scheme;

pub use anaglyph::{Anaglyph, AnaglyphMatrices, AnaglyphMethod, create_anaglyph};
pub use error::{ColorError, ColorResult};
pub use scheme::{ColorMatrix, ColorScheme, LumaCoding, dubois_matrices};
