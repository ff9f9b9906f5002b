//! Image - the pixel container shared by every stereoscopy crate
//!
//! An [`Image`] is a width x height grid of interleaved 8-bit samples with
//! either 3 (RGB) or 4 (RGBA) channels per pixel.
//!
//! # Pixel layout
//!
//! - Samples are stored row-major, top row first
//! - Each pixel occupies [`ColorType::channels`] consecutive bytes
//! - Channel order is R, G, B and optionally A
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, convert to `ImageMut` via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;
pub mod blend;
mod border;
mod clip;
pub mod convert;

pub use blend::composite_over;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Channel layout of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorType {
    /// 3 channels: red, green, blue
    #[default]
    Rgb,
    /// 4 channels: red, green, blue, alpha
    Rgba,
}

impl ColorType {
    /// Number of interleaved samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }

    /// Whether the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorType::Rgba)
    }
}

/// Largest pixel count a new image may allocate (1 Gi pixels).
pub const MAX_PIXELS: u64 = 1 << 30;

/// Internal image data
#[derive(Debug, Clone)]
struct ImageData {
    width: u32,
    height: u32,
    color_type: ColorType,
    data: Vec<u8>,
}

impl ImageData {
    fn zeroed(width: u32, height: u32, color_type: ColorType) -> Result<Self> {
        if width == 0 || height == 0 || width as u64 * height as u64 > MAX_PIXELS {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = buffer_len(width, height, color_type);
        Ok(ImageData {
            width,
            height,
            color_type,
            data: vec![0u8; len],
        })
    }
}

#[inline]
fn buffer_len(width: u32, height: u32, color_type: ColorType) -> usize {
    width as usize * height as usize * color_type.channels()
}

/// Image - immutable, reference-counted pixel container
///
/// # Examples
///
/// ```
/// use stereoscopy_core::{ColorType, Image};
///
/// let img = Image::new(640, 480, ColorType::Rgb).unwrap();
/// assert_eq!(img.width(), 640);
/// assert_eq!(img.data().len(), 640 * 480 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new image filled with zero samples.
    ///
    /// For RGBA images this is transparent black.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (must be > 0)
    /// * `height` - Height in pixels (must be > 0)
    /// * `color_type` - Channel layout
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if
    /// the image would exceed [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32, color_type: ColorType) -> Result<Self> {
        let inner = ImageData::zeroed(width, height, color_type)?;
        Ok(Image {
            inner: Arc::new(inner),
        })
    }

    /// Wrap an existing interleaved sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension and
    /// [`Error::BufferSize`] if `data` does not hold exactly
    /// `width * height * channels` samples.
    pub fn from_raw(width: u32, height: u32, color_type: ColorType, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = buffer_len(width, height, color_type);
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Image {
            inner: Arc::new(ImageData {
                width,
                height,
                color_type,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the channel layout.
    #[inline]
    pub fn color_type(&self) -> ColorType {
        self.inner.color_type
    }

    /// Number of samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.inner.color_type.channels()
    }

    /// Whether the image carries an alpha channel.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.inner.color_type.has_alpha()
    }

    /// Get the raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the number of references to the shared data.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check whether two images have the same width and height.
    pub fn sizes_equal(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Require that `other` has the same width and height as `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] naming both sizes.
    pub fn check_same_size(&self, other: &Image) -> Result<()> {
        if self.sizes_equal(other) {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }

    /// Create a zeroed image with the same size and color type.
    pub fn create_template(&self) -> Self {
        let len = self.inner.data.len();
        Image {
            inner: Arc::new(ImageData {
                width: self.inner.width,
                height: self.inner.height,
                color_type: self.inner.color_type,
                data: vec![0u8; len],
            }),
        }
    }

    /// Create a deep copy of this image.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Image {
            inner: Arc::new((*self.inner).clone()),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Get mutable access, copying only when the data is shared.
    pub fn into_mut(self) -> ImageMut {
        match self.try_into_mut() {
            Ok(m) => m,
            Err(shared) => shared.to_mut(),
        }
    }
}

/// Mutable image
///
/// Allows modification of image data. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Create a new zero-filled mutable image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or if
    /// the image would exceed [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32, color_type: ColorType) -> Result<Self> {
        Ok(ImageMut {
            inner: ImageData::zeroed(width, height, color_type)?,
        })
    }

    /// Create a mutable image with every pixel set to `color`.
    ///
    /// For RGB images the alpha component of `color` is ignored.
    pub fn filled(width: u32, height: u32, color_type: ColorType, color: crate::Rgba) -> Result<Self> {
        let mut img = Self::new(width, height, color_type)?;
        img.fill(color);
        Ok(img)
    }

    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the channel layout.
    #[inline]
    pub fn color_type(&self) -> ColorType {
        self.inner.color_type
    }

    /// Number of samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.inner.color_type.channels()
    }

    /// Get the raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the raw interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }
}

impl From<ImageMut> for Image {
    fn from(img: ImageMut) -> Self {
        Image {
            inner: Arc::new(img.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgba;

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(matches!(
            Image::new(0, 5, ColorType::Rgb),
            Err(Error::InvalidDimension { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_new_rejects_oversized() {
        assert!(matches!(
            Image::new(2_000_000_000, 1_000_000_000, ColorType::Rgba),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(matches!(
            ImageMut::filled(1 << 16, (1 << 14) + 1, ColorType::Rgb, Rgba::BLACK),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_from_raw_checks_length() {
        let err = Image::from_raw(2, 2, ColorType::Rgba, vec![0; 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSize {
                expected: 16,
                actual: 12
            }
        ));
    }

    #[test]
    fn test_try_into_mut_shared() {
        let img = Image::new(4, 4, ColorType::Rgb).unwrap();
        let other = img.clone();
        assert_eq!(img.ref_count(), 2);
        let img = img.try_into_mut().unwrap_err();
        drop(other);
        assert!(img.try_into_mut().is_ok());
    }

    #[test]
    fn test_to_mut_roundtrip_keeps_original() {
        let img = Image::new(3, 2, ColorType::Rgba).unwrap();
        let mut m = img.to_mut();
        m.fill(Rgba::WHITE);
        let changed: Image = m.into();
        assert!(img.data().iter().all(|&v| v == 0));
        assert!(changed.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_check_same_size() {
        let a = Image::new(4, 3, ColorType::Rgb).unwrap();
        let b = Image::new(3, 4, ColorType::Rgb).unwrap();
        assert!(a.check_same_size(&a.create_template()).is_ok());
        assert!(matches!(
            a.check_same_size(&b),
            Err(Error::DimensionMismatch {
                expected: (4, 3),
                actual: (3, 4)
            })
        ));
    }
}
