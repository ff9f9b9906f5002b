//! GIF image format support
//!
//! Reads the first frame of a GIF as RGBA and writes still images and
//! looping animations. Colors are quantized per frame with NeuQuant; fully
//! transparent pixels stay transparent.

use crate::{IoError, IoResult};
use gif::{ColorOutput, DecodeOptions, Encoder, Frame, Repeat};
use log::debug;
use std::io::{Read, Write};
use stereoscopy_compose::Wiggle;
use stereoscopy_core::{ColorType, Image, ImageMut};

/// Quantizer speed, 1 (best) to 30 (fastest)
const QUANTIZE_SPEED: i32 = 10;

/// Read a GIF image
///
/// Reads the first frame of a GIF image onto a transparent canvas of the
/// logical screen size. Any further frames are ignored.
pub fn read_gif<R: Read>(reader: R) -> IoResult<Image> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);

    let mut decoder = options
        .read_info(reader)
        .map_err(|e| IoError::DecodeError(format!("GIF decode error: {}", e)))?;
    let (width, height) = (decoder.width() as u32, decoder.height() as u32);

    let frame = decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .ok_or_else(|| IoError::InvalidData("no frames in GIF".to_string()))?;

    let (fw, fh) = (frame.width as u32, frame.height as u32);
    if frame.buffer.len() != fw as usize * fh as usize * 4 {
        return Err(IoError::InvalidData(format!(
            "GIF frame buffer has {} bytes for {}x{}",
            frame.buffer.len(),
            fw,
            fh
        )));
    }
    let tile = Image::from_raw(fw, fh, ColorType::Rgba, frame.buffer.to_vec())?;
    let mut canvas = ImageMut::new(width, height, ColorType::Rgba)?;
    canvas.paste(&tile, frame.left as u32, frame.top as u32);

    Ok(canvas.into())
}

fn frame_size(image: &Image) -> IoResult<(u16, u16)> {
    let (w, h) = image.dimensions();
    match (u16::try_from(w), u16::try_from(h)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(IoError::EncodeError(format!(
            "image {}x{} too large for GIF",
            w, h
        ))),
    }
}

fn quantized_frame(image: &Image) -> IoResult<Frame<'static>> {
    let (w, h) = frame_size(image)?;
    let mut rgba = image.to_rgba().data().to_vec();
    Ok(Frame::from_rgba_speed(w, h, &mut rgba, QUANTIZE_SPEED))
}

fn write_frames<W: Write>(
    frames: &[Image],
    delay_cs: u16,
    repeat: Repeat,
    mut writer: W,
) -> IoResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| IoError::InvalidData("no frames to write".to_string()))?;
    let (width, height) = frame_size(first)?;

    let mut encoder = Encoder::new(&mut writer, width, height, &[])
        .map_err(|e| IoError::EncodeError(format!("GIF encoder error: {}", e)))?;
    encoder
        .set_repeat(repeat)
        .map_err(|e| IoError::EncodeError(format!("GIF repeat error: {}", e)))?;

    for image in frames {
        let mut frame = quantized_frame(image)?;
        frame.delay = delay_cs;
        encoder
            .write_frame(&frame)
            .map_err(|e| IoError::EncodeError(format!("GIF frame write error: {}", e)))?;
    }

    Ok(())
}

/// Write a GIF image
///
/// Writes an image as a single-frame GIF.
pub fn write_gif<W: Write>(image: &Image, writer: W) -> IoResult<()> {
    write_frames(std::slice::from_ref(image), 0, Repeat::Finite(0), writer)
}

/// Write a wiggle animation as an endlessly looping GIF.
///
/// GIF delays are in centiseconds, so the frame delay is rounded to the
/// nearest 10 ms.
pub fn write_wiggle<W: Write>(wiggle: &Wiggle, writer: W) -> IoResult<()> {
    let delay_cs = u16::try_from((wiggle.delay_ms() + 5) / 10).unwrap_or(u16::MAX);
    debug!(
        "GIF animation: {} frames, {} cs each",
        wiggle.frames().len(),
        delay_cs
    );
    write_frames(wiggle.frames(), delay_cs, Repeat::Infinite, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stereoscopy_core::Rgba;

    fn solid(c: Rgba) -> Image {
        ImageMut::filled(6, 4, ColorType::Rgb, c).unwrap().into()
    }

    #[test]
    fn test_gif_roundtrip_still() {
        let img = solid(Rgba::opaque(255, 0, 0));
        let mut buffer = Vec::new();
        write_gif(&img, &mut buffer).unwrap();
        let back = read_gif(Cursor::new(buffer)).unwrap();
        assert_eq!(back.dimensions(), (6, 4));
        assert_eq!(back.color_type(), ColorType::Rgba);
        let p = back.get_rgba(3, 2).unwrap();
        assert!(p.r >= 250 && p.g <= 5 && p.b <= 5 && p.a == 255);
    }

    #[test]
    fn test_wiggle_frames_and_delay() {
        let frames = vec![
            solid(Rgba::BLACK),
            solid(Rgba::WHITE),
            solid(Rgba::opaque(0, 0, 255)),
        ];
        let wiggle = Wiggle::new(frames, 300).unwrap();
        let mut buffer = Vec::new();
        write_wiggle(&wiggle, &mut buffer).unwrap();

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let mut decoder = options.read_info(Cursor::new(buffer)).unwrap();
        let mut count = 0;
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            // 300 ms over 4 frames
            assert_eq!(frame.delay, 8);
            count += 1;
        }
        assert_eq!(count, 4);
    }
}
