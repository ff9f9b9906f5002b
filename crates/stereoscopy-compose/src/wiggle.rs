//! Wiggle animation frames
//!
//! A wiggle stereogram shows the views of a scene one after another in a
//! loop, which gives a sense of depth without glasses. Frames play forward
//! and then backward (ping-pong) so that the motion stays smooth for more
//! than two views.

use crate::{ComposeError, ComposeResult};
use log::debug;
use stereoscopy_core::Image;

/// Default duration of one full animation loop, in milliseconds
pub const DEFAULT_WIGGLE_DURATION_MS: u32 = 300;

/// An ordered, timed frame sequence ready for encoding.
#[derive(Debug, Clone)]
pub struct Wiggle {
    frames: Vec<Image>,
    delay_ms: u32,
}

impl Wiggle {
    /// Build the ping-pong sequence `f0, .., fn-1, fn-2, .., f1`.
    ///
    /// The per-frame delay is the loop duration divided by the length of the
    /// sequence, rounded to the nearest millisecond.
    ///
    /// # Arguments
    ///
    /// * `frames` - Views in order, all of one size
    /// * `total_duration_ms` - Duration of one full loop
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::InvalidParameters`] for fewer than 2 frames
    /// and [`ComposeError::Core`] if the frames differ in size.
    pub fn new(frames: Vec<Image>, total_duration_ms: u32) -> ComposeResult<Self> {
        if frames.len() < 2 {
            return Err(ComposeError::InvalidParameters(format!(
                "a wiggle needs at least 2 frames, got {}",
                frames.len()
            )));
        }
        for f in &frames[1..] {
            frames[0].check_same_size(f)?;
        }
        let n = frames.len();
        let mut sequence = frames;
        for i in (1..n - 1).rev() {
            let back = sequence[i].clone();
            sequence.push(back);
        }
        let delay_ms = (total_duration_ms as f64 / sequence.len() as f64).round() as u32;
        debug!("wiggle: {} frames, {} ms each", sequence.len(), delay_ms);
        Ok(Self {
            frames: sequence,
            delay_ms,
        })
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[Image] {
        &self.frames
    }

    /// Display time of each frame, in milliseconds
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Frame size
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stereoscopy_core::{ColorType, ImageMut, Rgba};

    fn frame(v: u8) -> Image {
        ImageMut::filled(2, 2, ColorType::Rgb, Rgba::opaque(v, v, v))
            .unwrap()
            .into()
    }

    #[test]
    fn test_pair() {
        let w = Wiggle::new(vec![frame(0), frame(1)], DEFAULT_WIGGLE_DURATION_MS).unwrap();
        assert_eq!(w.frames().len(), 2);
        assert_eq!(w.delay_ms(), 150);
    }

    #[test]
    fn test_ping_pong_order() {
        let w = Wiggle::new((0..4).map(frame).collect(), 300).unwrap();
        let order: Vec<u8> = w.frames().iter().map(|f| f.data()[0]).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 2, 1]);
        assert_eq!(w.delay_ms(), 50);
    }

    #[test]
    fn test_delay_rounding() {
        let w = Wiggle::new((0..3).map(frame).collect(), 250).unwrap();
        // 4 frames: 62.5 rounds up
        assert_eq!(w.frames().len(), 4);
        assert_eq!(w.delay_ms(), 63);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Wiggle::new(vec![frame(0)], 300),
            Err(ComposeError::InvalidParameters(_))
        ));
        let big: Image = ImageMut::new(3, 2, ColorType::Rgb).unwrap().into();
        assert!(matches!(
            Wiggle::new(vec![frame(0), big], 300),
            Err(ComposeError::Core(_))
        ));
    }
}
