//! Pixel access for Image and ImageMut
//!
//! Checked single-pixel get/set, row slices, whole-image fill and pasting
//! one image into another.

use super::{Image, ImageMut};
use crate::color::Rgba;
use crate::error::{Error, Result};

impl Image {
    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width() as usize * self.channels();
        let start = y as usize * stride;
        &self.data()[start..start + stride]
    }

    /// Get the samples of pixel `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let ch = self.channels();
        let start = (y as usize * self.width() as usize + x as usize) * ch;
        Some(&self.data()[start..start + ch])
    }

    /// Get pixel `(x, y)` as an [`Rgba`] color.
    ///
    /// RGB pixels are reported as opaque.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the image.
    pub fn get_rgba(&self, x: u32, y: u32) -> Result<Rgba> {
        self.pixel(x, y)
            .map(Rgba::from_samples)
            .ok_or(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
    }
}

impl ImageMut {
    /// Get the samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width() as usize * self.channels();
        let start = y as usize * stride;
        &self.data()[start..start + stride]
    }

    /// Get mutable samples of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.width() as usize * self.channels();
        let start = y as usize * stride;
        &mut self.data_mut()[start..start + stride]
    }

    /// Get pixel `(x, y)` as an [`Rgba`] color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the image.
    pub fn get_rgba(&self, x: u32, y: u32) -> Result<Rgba> {
        let offset = self.offset(x, y)?;
        Ok(Rgba::from_samples(
            &self.data()[offset..offset + self.channels()],
        ))
    }

    /// Set pixel `(x, y)` to `color`.
    ///
    /// The alpha component is dropped for RGB images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if the coordinates are outside
    /// the image.
    pub fn set_rgba(&mut self, x: u32, y: u32, color: Rgba) -> Result<()> {
        let offset = self.offset(x, y)?;
        let ch = self.channels();
        self.data_mut()[offset..offset + ch].copy_from_slice(&color.to_array()[..ch]);
        Ok(())
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        let ch = self.channels();
        let samples = color.to_array();
        for px in self.data_mut().chunks_exact_mut(ch) {
            px.copy_from_slice(&samples[..ch]);
        }
    }

    /// Fill the rectangle `(x, y, w, h)` with `color`, clipped to the image.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        if x >= x_end || y >= y_end {
            return;
        }
        let ch = self.channels();
        let samples = color.to_array();
        for yy in y..y_end {
            let row = self.row_mut(yy);
            for px in row[x as usize * ch..x_end as usize * ch].chunks_exact_mut(ch) {
                px.copy_from_slice(&samples[..ch]);
            }
        }
    }

    /// Copy `src` into this image with its top-left corner at `(x, y)`.
    ///
    /// Parts of `src` falling outside the destination are dropped. When the
    /// channel layouts differ, RGB sources become opaque RGBA and RGBA
    /// sources lose their alpha.
    pub fn paste(&mut self, src: &Image, x: u32, y: u32) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let w = src.width().min(self.width() - x);
        let h = src.height().min(self.height() - y);
        let dst_ch = self.channels();
        let src_ch = src.channels();
        for row in 0..h {
            let src_row = &src.row(row)[..w as usize * src_ch];
            let dst_row = self.row_mut(y + row);
            let dst_row = &mut dst_row[x as usize * dst_ch..(x + w) as usize * dst_ch];
            if src_ch == dst_ch {
                dst_row.copy_from_slice(src_row);
                continue;
            }
            for (d, s) in dst_row
                .chunks_exact_mut(dst_ch)
                .zip(src_row.chunks_exact(src_ch))
            {
                d[..3].copy_from_slice(&s[..3]);
                if dst_ch == 4 {
                    d[3] = 255;
                }
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok((y as usize * self.width() as usize + x as usize) * self.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorType;

    #[test]
    fn test_set_get_rgba() {
        let mut m = ImageMut::new(3, 3, ColorType::Rgba).unwrap();
        m.set_rgba(1, 2, Rgba::new(10, 20, 30, 40)).unwrap();
        assert_eq!(m.get_rgba(1, 2).unwrap(), Rgba::new(10, 20, 30, 40));
        let img: Image = m.into();
        assert_eq!(img.pixel(1, 2).unwrap(), &[10, 20, 30, 40]);
        assert!(img.get_rgba(3, 0).is_err());
    }

    #[test]
    fn test_set_rgba_on_rgb_drops_alpha() {
        let mut m = ImageMut::new(2, 1, ColorType::Rgb).unwrap();
        m.set_rgba(0, 0, Rgba::new(1, 2, 3, 0)).unwrap();
        assert_eq!(m.get_rgba(0, 0).unwrap(), Rgba::opaque(1, 2, 3));
    }

    #[test]
    fn test_paste_clips() {
        let src: Image = ImageMut::filled(4, 4, ColorType::Rgb, Rgba::WHITE)
            .unwrap()
            .into();
        let mut dst = ImageMut::new(5, 5, ColorType::Rgb).unwrap();
        dst.paste(&src, 3, 3);
        let img: Image = dst.into();
        assert_eq!(img.get_rgba(2, 2).unwrap(), Rgba::BLACK);
        assert_eq!(img.get_rgba(3, 3).unwrap(), Rgba::WHITE);
        assert_eq!(img.get_rgba(4, 4).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_paste_rgb_into_rgba_is_opaque() {
        let src: Image = ImageMut::filled(1, 1, ColorType::Rgb, Rgba::opaque(9, 8, 7))
            .unwrap()
            .into();
        let mut dst = ImageMut::new(2, 1, ColorType::Rgba).unwrap();
        dst.paste(&src, 1, 0);
        assert_eq!(dst.get_rgba(1, 0).unwrap(), Rgba::new(9, 8, 7, 255));
        assert_eq!(dst.get_rgba(0, 0).unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut m = ImageMut::new(4, 2, ColorType::Rgb).unwrap();
        m.fill_rect(2, 0, 10, 10, Rgba::WHITE);
        assert_eq!(m.get_rgba(1, 1).unwrap(), Rgba::BLACK);
        assert_eq!(m.get_rgba(3, 1).unwrap(), Rgba::WHITE);
    }
}
