//! Cropping by pixel or percentage lengths

use crate::{TransformError, TransformResult};
use std::fmt;
use std::str::FromStr;
use stereoscopy_core::Image;

/// A length given either in pixels or as a percentage of a reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Absolute pixel count
    Pixels(u32),
    /// Percentage of the reference length
    Percent(f64),
}

impl Default for Length {
    fn default() -> Self {
        Length::Pixels(0)
    }
}

impl Length {
    /// Resolve against `reference`, the length that 100% stands for.
    ///
    /// Percentages are rounded to the nearest pixel.
    pub fn to_pixels(self, reference: u32) -> u32 {
        match self {
            Length::Pixels(p) => p,
            Length::Percent(p) => (p / 100.0 * reference as f64).round().max(0.0) as u32,
        }
    }

    /// Whether the length is zero.
    pub fn is_zero(self) -> bool {
        match self {
            Length::Pixels(p) => p == 0,
            Length::Percent(p) => p == 0.0,
        }
    }
}

impl FromStr for Length {
    type Err = TransformError;

    /// Parse `"12"` as pixels or `"5%"` / `"2.5%"` as a percentage.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let invalid = || TransformError::InvalidLength(s.to_string());
        match t.strip_suffix('%') {
            Some(p) => {
                let v = p.trim().parse::<f64>().map_err(|_| invalid())?;
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid());
                }
                Ok(Length::Percent(v))
            }
            None => t.parse::<u32>().map(Length::Pixels).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Pixels(p) => write!(f, "{p}"),
            Length::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// Amount to cut off each side of an image.
///
/// Left and right percentages refer to the image width, top and bottom
/// percentages to the image height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropBox {
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
}

impl CropBox {
    /// Create a crop box; sides in left, top, right, bottom order.
    pub fn new(left: Length, top: Length, right: Length, bottom: Length) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether every side is zero.
    pub fn is_empty(&self) -> bool {
        self.left.is_zero() && self.top.is_zero() && self.right.is_zero() && self.bottom.is_zero()
    }
}

/// Cut the sides given by `crop_box` off an image.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if nothing of the image
/// would remain.
pub fn crop(image: &Image, crop_box: &CropBox) -> TransformResult<Image> {
    let (w, h) = image.dimensions();
    let left = crop_box.left.to_pixels(w);
    let right = crop_box.right.to_pixels(w);
    let top = crop_box.top.to_pixels(h);
    let bottom = crop_box.bottom.to_pixels(h);

    let keep_w = w.checked_sub(left).and_then(|v| v.checked_sub(right));
    let keep_h = h.checked_sub(top).and_then(|v| v.checked_sub(bottom));
    match (keep_w, keep_h) {
        (Some(cw), Some(ch)) if cw > 0 && ch > 0 => Ok(image.clip_rectangle(left, top, cw, ch)?),
        _ => Err(TransformError::InvalidParameters(format!(
            "crop {left}, {top}, {right}, {bottom} leaves nothing of a {w}x{h} image"
        ))),
    }
}
