//! PNG image format support
//!
//! Every PNG flavour is normalized by the decoder to 8-bit samples:
//! palettes and low bit depths are expanded, 16-bit samples are stripped
//! to their high byte and `tRNS` chunks become an alpha channel. Gray
//! images are widened to RGB.

use crate::{IoError, IoResult};
use png::{BitDepth, ColorType as PngColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};
use stereoscopy_core::{ColorType, Image, ImageMut};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Image> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG bit depth after normalization: {:?}",
            info.bit_depth
        )));
    }

    let (width, height) = (info.width, info.height);
    let (src_ch, color_type) = match info.color_type {
        PngColorType::Grayscale => (1, ColorType::Rgb),
        PngColorType::GrayscaleAlpha => (2, ColorType::Rgba),
        PngColorType::Rgb => (3, ColorType::Rgb),
        PngColorType::Rgba => (4, ColorType::Rgba),
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG color type: {:?}",
                other
            )));
        }
    };

    let mut image = ImageMut::new(width, height, color_type)?;
    let dst_ch = image.channels();
    let row_len = width as usize * src_ch;
    for y in 0..height {
        let start = y as usize * info.line_size;
        let src = buf
            .get(start..start + row_len)
            .ok_or_else(|| IoError::InvalidData("PNG row out of range".to_string()))?;
        let dst = image.row_mut(y);
        if src_ch == dst_ch {
            dst.copy_from_slice(src);
            continue;
        }
        for (d, s) in dst.chunks_exact_mut(dst_ch).zip(src.chunks_exact(src_ch)) {
            d[..3].fill(s[0]);
            if src_ch == 2 {
                d[3] = s[1];
            }
        }
    }

    Ok(image.into())
}

/// Write a PNG image
///
/// RGB images are written as 8-bit RGB, RGBA images as 8-bit RGBA.
pub fn write_png<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    let color_type = match image.color_type() {
        ColorType::Rgb => PngColorType::Rgb,
        ColorType::Rgba => PngColorType::Rgba,
    };

    let mut encoder = Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(image.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
