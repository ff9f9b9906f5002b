//! Border operations for images
//!
//! Adds a solid colored frame around an image. A border color that is not
//! fully opaque promotes an RGB image to RGBA so that the transparency
//! survives.

use super::{ColorType, Image, ImageMut};
use crate::color::Rgba;
use crate::error::{Error, Result};

impl Image {
    /// Add a uniform border around the image.
    ///
    /// # Arguments
    ///
    /// * `npix` - Border width in pixels
    /// * `color` - Border color
    ///
    /// # Returns
    ///
    /// New image with dimensions `(width + 2*npix, height + 2*npix)`.
    /// `npix == 0` returns a shared clone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the dimensions would overflow.
    pub fn add_border(&self, npix: u32, color: Rgba) -> Result<Image> {
        self.add_border_general(npix, npix, npix, npix, color)
    }

    /// Add a border with different sizes per side.
    ///
    /// # Arguments
    ///
    /// * `left` - Left border width
    /// * `right` - Right border width
    /// * `top` - Top border height
    /// * `bot` - Bottom border height
    /// * `color` - Border color
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the dimensions would overflow.
    pub fn add_border_general(
        &self,
        left: u32,
        right: u32,
        top: u32,
        bot: u32,
        color: Rgba,
    ) -> Result<Image> {
        if left == 0 && right == 0 && top == 0 && bot == 0 {
            return Ok(self.clone());
        }
        let overflow = || Error::InvalidDimension {
            width: self.width(),
            height: self.height(),
        };
        let width = self
            .width()
            .checked_add(left)
            .and_then(|w| w.checked_add(right))
            .ok_or_else(overflow)?;
        let height = self
            .height()
            .checked_add(top)
            .and_then(|h| h.checked_add(bot))
            .ok_or_else(overflow)?;

        let color_type = if color.a < 255 {
            ColorType::Rgba
        } else {
            self.color_type()
        };
        let mut out = ImageMut::filled(width, height, color_type, color)?;
        out.paste(self, left, top);
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_border_size_and_color() {
        let img: Image = ImageMut::filled(2, 3, ColorType::Rgb, Rgba::WHITE)
            .unwrap()
            .into();
        let out = img.add_border(2, Rgba::BLACK).unwrap();
        assert_eq!(out.dimensions(), (6, 7));
        assert_eq!(out.color_type(), ColorType::Rgb);
        assert_eq!(out.get_rgba(0, 0).unwrap(), Rgba::BLACK);
        assert_eq!(out.get_rgba(2, 2).unwrap(), Rgba::WHITE);
        assert_eq!(out.get_rgba(3, 4).unwrap(), Rgba::WHITE);
        assert_eq!(out.get_rgba(4, 5).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_transparent_border_promotes_to_rgba() {
        let img = Image::new(1, 1, ColorType::Rgb).unwrap();
        let out = img.add_border(1, Rgba::TRANSPARENT).unwrap();
        assert_eq!(out.color_type(), ColorType::Rgba);
        assert_eq!(out.get_rgba(0, 0).unwrap(), Rgba::TRANSPARENT);
        assert_eq!(out.get_rgba(1, 1).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_zero_border_is_shared() {
        let img = Image::new(1, 1, ColorType::Rgb).unwrap();
        let out = img.add_border(0, Rgba::WHITE).unwrap();
        assert_eq!(out.ref_count(), 2);
    }
}
