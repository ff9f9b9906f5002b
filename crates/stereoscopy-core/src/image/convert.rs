//! Channel layout conversion

use super::{ColorType, Image, ImageMut};

impl Image {
    /// Convert to the given channel layout.
    ///
    /// RGB to RGBA adds an opaque alpha channel; RGBA to RGB drops alpha
    /// without compositing. Converting to the current layout returns a
    /// shared clone.
    pub fn convert(&self, color_type: ColorType) -> Image {
        if self.color_type() == color_type {
            return self.clone();
        }
        let src_ch = self.channels();
        let dst_ch = color_type.channels();
        let mut data = Vec::with_capacity(self.width() as usize * self.height() as usize * dst_ch);
        for px in self.data().chunks_exact(src_ch) {
            data.extend_from_slice(&px[..3]);
            if dst_ch == 4 {
                data.push(255);
            }
        }
        ImageMut {
            inner: super::ImageData {
                width: self.width(),
                height: self.height(),
                color_type,
                data,
            },
        }
        .into()
    }

    /// Convert to RGBA.
    pub fn to_rgba(&self) -> Image {
        self.convert(ColorType::Rgba)
    }

    /// Convert to RGB, dropping alpha.
    pub fn to_rgb(&self) -> Image {
        self.convert(ColorType::Rgb)
    }

    /// Compute the 8-bit luma plane `(299 R + 587 G + 114 B) / 1000`.
    ///
    /// Alpha is ignored. The result is row-major, one byte per pixel.
    pub fn luma(&self) -> Vec<u8> {
        self.data()
            .chunks_exact(self.channels())
            .map(|px| {
                let l = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                (l / 1000) as u8
            })
            .collect()
    }
}
