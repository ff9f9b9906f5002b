//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale and CMYK sources are converted to RGB; alpha
//! is dropped on write.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType as JpegColorType, Encoder};
use log::debug;
use std::io::{Read, Write};
use stereoscopy_core::{ColorType, Image};

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Read a JPEG image from a reader.
///
/// # Arguments
///
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
///
/// An RGB image. 16-bit grayscale keeps the high byte; CMYK data is taken
/// as Adobe-inverted, so `r = c * k / 255`.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;
    let (width, height) = (info.width as u32, info.height as u32);
    debug!(
        "JPEG {}x{} {:?}",
        width, height, info.pixel_format
    );

    let data: Vec<u8> = match info.pixel_format {
        PixelFormat::RGB24 => pixels,
        PixelFormat::L8 => pixels.iter().flat_map(|&v| [v, v, v]).collect(),
        PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|s| [s[0], s[0], s[0]])
            .collect(),
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|p| {
                let k = p[3] as u32;
                let inv = |c: u8| ((c as u32 * k + 127) / 255) as u8;
                [inv(p[0]), inv(p[1]), inv(p[2])]
            })
            .collect(),
    };

    Image::from_raw(width, height, ColorType::Rgb, data).map_err(IoError::Core)
}

/// Write a JPEG image.
///
/// # Arguments
///
/// * `image` - Image to encode; alpha is dropped
/// * `writer` - Destination
/// * `quality` - Encoder quality, clamped to `1..=100`
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] if a side exceeds 65535 pixels or the
/// encoder fails.
pub fn write_jpeg<W: Write>(image: &Image, writer: W, quality: u8) -> IoResult<()> {
    let (w, h) = image.dimensions();
    let (Ok(width), Ok(height)) = (u16::try_from(w), u16::try_from(h)) else {
        return Err(IoError::EncodeError(format!(
            "image {}x{} too large for JPEG",
            w, h
        )));
    };
    let rgb = image.to_rgb();
    let encoder = Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(rgb.data(), width, height, JpegColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stereoscopy_core::{ImageMut, Rgba};

    #[test]
    fn test_jpeg_roundtrip_lossy() {
        let img: Image = ImageMut::filled(16, 8, ColorType::Rgba, Rgba::new(200, 100, 50, 0))
            .unwrap()
            .into();
        let mut buffer = Vec::new();
        write_jpeg(&img, &mut buffer, DEFAULT_JPEG_QUALITY).unwrap();
        let back = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(back.dimensions(), (16, 8));
        assert_eq!(back.color_type(), ColorType::Rgb);
        let p = back.get_rgba(8, 4).unwrap();
        assert!(p.r.abs_diff(200) <= 4);
        assert!(p.g.abs_diff(100) <= 4);
        assert!(p.b.abs_diff(50) <= 4);
    }

    #[test]
    fn test_jpeg_garbage() {
        assert!(matches!(
            read_jpeg(Cursor::new(vec![0xFF, 0xD8, 0xFF, 0x00])),
            Err(IoError::DecodeError(_))
        ));
    }
}
