//! stereoscopy-test - Regression test framework for stereoscopy
//!
//! This crate provides the regression test harness shared by every
//! stereoscopy crate, plus deterministic synthetic images so that tests
//! never depend on image files checked into the tree.
//!
//! # Usage
//!
//! ```ignore
//! use stereoscopy_test::{RegParams, gradient_image};
//!
//! let mut rp = RegParams::new("canvas");
//! rp.compare_values(100.0, width as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use stereoscopy_core::{ColorType, Image, ImageMut, Rgba};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // stereoscopy-test is at crates/stereoscopy-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/target/regout", workspace_root())
}

fn build(
    name: &'static str,
    width: u32,
    height: u32,
    color_type: ColorType,
    f: impl Fn(u32, u32) -> Rgba,
) -> TestResult<Image> {
    let mut img = ImageMut::new(width, height, color_type)
        .map_err(|source| TestError::Fixture { name, source })?;
    for y in 0..height {
        for x in 0..width {
            img.set_rgba(x, y, f(x, y))
                .map_err(|source| TestError::Fixture { name, source })?;
        }
    }
    Ok(img.into())
}

/// A single-color image.
pub fn solid_image(width: u32, height: u32, color_type: ColorType, color: Rgba) -> TestResult<Image> {
    ImageMut::filled(width, height, color_type, color)
        .map(Into::into)
        .map_err(|source| TestError::Fixture {
            name: "solid",
            source,
        })
}

/// A diagonal gradient: red grows with x, green with y, blue with x + y.
///
/// RGBA variants are fully opaque.
pub fn gradient_image(width: u32, height: u32, color_type: ColorType) -> TestResult<Image> {
    let sx = 255.0 / (width.max(2) - 1) as f64;
    let sy = 255.0 / (height.max(2) - 1) as f64;
    build("gradient", width, height, color_type, |x, y| {
        let r = (x as f64 * sx).round() as u8;
        let g = (y as f64 * sy).round() as u8;
        let b = ((x as f64 * sx + y as f64 * sy) / 2.0).round() as u8;
        Rgba::opaque(r, g, b)
    })
}

/// A smooth, non-periodic texture suitable for intensity alignment.
///
/// The pattern is a sum of sinusoids at incommensurate frequencies,
/// shifted by `(dx, dy)`: pixel `(x, y)` of the result equals pixel
/// `(x + dx, y + dy)` of the unshifted texture.
pub fn textured_image(width: u32, height: u32, dx: f64, dy: f64) -> TestResult<Image> {
    build("textured", width, height, ColorType::Rgb, |x, y| {
        let u = x as f64 + dx;
        let v = y as f64 + dy;
        let t = (u * 0.071).sin() * 0.35
            + (v * 0.053).cos() * 0.3
            + ((u + v) * 0.037).sin() * 0.2
            + ((u - 0.6 * v) * 0.113).cos() * 0.15;
        let l = (127.5 + 120.0 * t).round().clamp(0.0, 255.0) as u8;
        Rgba::opaque(l, l, l)
    })
}

/// An image whose left half is `left` and right half is `right`.
pub fn two_tone_image(
    width: u32,
    height: u32,
    color_type: ColorType,
    left: Rgba,
    right: Rgba,
) -> TestResult<Image> {
    let half = width / 2;
    build("two_tone", width, height, color_type, |x, _| {
        if x < half { left } else { right }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_corners() {
        let img = gradient_image(5, 3, ColorType::Rgb).unwrap();
        assert_eq!(img.get_rgba(0, 0).unwrap(), Rgba::opaque(0, 0, 0));
        assert_eq!(img.get_rgba(4, 2).unwrap(), Rgba::opaque(255, 255, 255));
    }

    #[test]
    fn test_textured_shift() {
        let base = textured_image(20, 20, 0.0, 0.0).unwrap();
        let shifted = textured_image(20, 20, 3.0, 2.0).unwrap();
        assert_eq!(
            shifted.get_rgba(0, 0).unwrap(),
            base.get_rgba(3, 2).unwrap()
        );
    }

    #[test]
    fn test_two_tone() {
        let img = two_tone_image(4, 1, ColorType::Rgba, Rgba::WHITE, Rgba::TRANSPARENT).unwrap();
        assert_eq!(img.get_rgba(1, 0).unwrap(), Rgba::WHITE);
        assert_eq!(img.get_rgba(2, 0).unwrap(), Rgba::TRANSPARENT);
    }
}
