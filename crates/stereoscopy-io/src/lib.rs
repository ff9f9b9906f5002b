//! stereoscopy-io - Image reading and writing
//!
//! Decodes input photographs to 8-bit RGB or RGBA [`Image`]s and encodes
//! results back to disk.
//!
//! | Format | Read | Write | Feature |
//! |---|---|---|---|
//! | PNG | 1-16 bit, gray, palette, RGB(A) | RGB, RGBA | `png-format` |
//! | JPEG | gray, RGB, CMYK | RGB (alpha dropped) | `jpeg` |
//! | GIF | first frame | still, looping animation | `gif-format` |

mod error;
pub mod format;
#[cfg(feature = "gif-format")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes, format_from_extension};

use log::debug;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use stereoscopy_compose::Wiggle;
use stereoscopy_core::Image;

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// JPEG quality, 1 to 100
    pub quality: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

/// Read an image file, detecting its format from the content.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let image = read_image_from_bytes(&data)?;
    debug!(
        "read {}: {}x{} {:?}",
        path.display(),
        image.width(),
        image.height(),
        image.color_type()
    );
    Ok(image)
}

/// Decode an image held in memory.
pub fn read_image_from_bytes(data: &[u8]) -> IoResult<Image> {
    let format = detect_format_from_bytes(data)?;
    let cursor = Cursor::new(data);
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(cursor),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(cursor),
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => gif::read_gif(cursor),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other} support not enabled"
        ))),
    }
}

/// Encode an image into a writer.
pub fn write_image_to<W: Write>(
    image: &Image,
    writer: W,
    format: ImageFormat,
    options: &WriteOptions,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(image, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(image, writer, options.quality),
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => gif::write_gif(image, writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other} support not enabled"
        ))),
    }
}

/// Write an image file in the given format.
///
/// # Arguments
///
/// * `image` - Image to write
/// * `path` - Destination file, created or truncated
/// * `format` - Output encoder
/// * `options` - Encoder settings
pub fn write_image<P: AsRef<Path>>(
    image: &Image,
    path: P,
    format: ImageFormat,
    options: &WriteOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    debug!(
        "write {} as {}: {}x{}",
        path.display(),
        format,
        image.width(),
        image.height()
    );
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_to(image, &mut writer, format, options)?;
    writer.flush()?;
    Ok(())
}

/// Write a wiggle animation as a looping GIF file.
#[cfg(feature = "gif-format")]
pub fn write_wiggle_gif<P: AsRef<Path>>(wiggle: &Wiggle, path: P) -> IoResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    gif::write_wiggle(wiggle, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a wiggle animation as a looping GIF file.
#[cfg(not(feature = "gif-format"))]
pub fn write_wiggle_gif<P: AsRef<Path>>(_wiggle: &Wiggle, _path: P) -> IoResult<()> {
    Err(IoError::UnsupportedFormat(
        "GIF support not enabled".to_string(),
    ))
}

/// Encode a wiggle animation as a looping GIF into a writer.
#[cfg(feature = "gif-format")]
pub fn write_wiggle_gif_to<W: Write>(wiggle: &Wiggle, writer: W) -> IoResult<()> {
    gif::write_wiggle(wiggle, writer)
}

/// Encode a wiggle animation as a looping GIF into a writer.
#[cfg(not(feature = "gif-format"))]
pub fn write_wiggle_gif_to<W: Write>(_wiggle: &Wiggle, _writer: W) -> IoResult<()> {
    Err(IoError::UnsupportedFormat(
        "GIF support not enabled".to_string(),
    ))
}
