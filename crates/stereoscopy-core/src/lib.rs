//! Stereoscopy Core - Basic data structures for stereo image processing
//!
//! This crate provides the data structures shared by every other
//! stereoscopy crate:
//!
//! - [`Image`] / [`ImageMut`] - The pixel container (immutable / mutable)
//! - [`ColorType`] - RGB or RGBA channel layout
//! - [`Rgba`] - A single 8-bit color used for fills, dividers and borders
//! - [`Error`] / [`Result`] - The core error type

pub mod color;
pub mod error;
pub mod image;

pub use color::Rgba;
pub use error::{Error, Result};
pub use image::{ColorType, Image, ImageMut, MAX_PIXELS, composite_over};
