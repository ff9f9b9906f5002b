//! Plain 8-bit RGBA colors
//!
//! Used for fill, divider, border and background colors. Pixel data itself
//! stays interleaved inside [`Image`](crate::Image); this type is only for
//! single color values passed around as parameters.

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, the fill used for uncovered canvas areas.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    /// Opaque black
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// Create a color from its four components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Components as an array in R, G, B, A order.
    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build a color from the first 3 or 4 samples of a pixel.
    ///
    /// A 3-sample pixel is treated as opaque.
    #[inline]
    pub fn from_samples(samples: &[u8]) -> Self {
        match samples {
            [r, g, b, a, ..] => Self::new(*r, *g, *b, *a),
            [r, g, b] => Self::opaque(*r, *g, *b),
            _ => Self::TRANSPARENT,
        }
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(v: [u8; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::new(r, g, b, a)
    }
}
