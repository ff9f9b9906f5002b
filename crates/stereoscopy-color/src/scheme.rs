//! Anaglyph color schemes, luma codings and fixed matrix tables
//!
//! A color scheme names the filter colors of the viewing glasses, left eye
//! first. Each eye gets a weight per output channel: `1` passes the channel
//! fully, `0` blocks it. The non-complementary schemes (red-green, red-blue)
//! are mainly useful with the gray method.

use crate::{ColorError, ColorResult};
use std::fmt;
use std::str::FromStr;

/// A 3x3 color mixing matrix; row `i` produces output channel `i`.
pub type ColorMatrix = [[f64; 3]; 3];

/// Glasses filter colors, left eye first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    RedGreen,
    RedBlue,
    #[default]
    RedCyan,
    GreenMagenta,
    AmberBlue,
    MagentaCyan,
}

impl ColorScheme {
    /// All schemes, in table order
    pub const ALL: [ColorScheme; 6] = [
        ColorScheme::RedGreen,
        ColorScheme::RedBlue,
        ColorScheme::RedCyan,
        ColorScheme::GreenMagenta,
        ColorScheme::AmberBlue,
        ColorScheme::MagentaCyan,
    ];

    /// Per-channel `(left, right)` eye weights.
    pub const fn weights(self) -> ([f64; 3], [f64; 3]) {
        match self {
            ColorScheme::RedGreen => ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ColorScheme::RedBlue => ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ColorScheme::RedCyan => ([1.0, 0.0, 0.0], [0.0, 1.0, 1.0]),
            ColorScheme::GreenMagenta => ([0.0, 1.0, 0.0], [1.0, 0.0, 1.0]),
            ColorScheme::AmberBlue => ([0.9, 1.0, 0.0], [0.0, 0.0, 0.7]),
            ColorScheme::MagentaCyan => ([1.0, 0.0, 1.0], [0.0, 1.0, 1.0]),
        }
    }

    /// The scheme name as used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            ColorScheme::RedGreen => "red-green",
            ColorScheme::RedBlue => "red-blue",
            ColorScheme::RedCyan => "red-cyan",
            ColorScheme::GreenMagenta => "green-magenta",
            ColorScheme::AmberBlue => "amber-blue",
            ColorScheme::MagentaCyan => "magenta-cyan",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        ColorScheme::ALL
            .into_iter()
            .find(|cs| cs.name() == key)
            .ok_or_else(|| ColorError::UnknownColorScheme(s.to_string()))
    }
}

/// Weights turning RGB into luma for the gray and half-color methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LumaCoding {
    /// Equal weights
    Rgb,
    /// ITU-R BT.601 (PAL/NTSC)
    Rec601,
    /// ITU-R BT.709 (HDTV)
    #[default]
    Rec709,
}

impl LumaCoding {
    /// The `(R, G, B)` weights
    pub const fn weights(self) -> [f64; 3] {
        match self {
            LumaCoding::Rgb => [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0],
            LumaCoding::Rec601 => [0.299, 0.587, 0.114],
            LumaCoding::Rec709 => [0.2126, 0.7152, 0.0722],
        }
    }

    /// The coding name as used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            LumaCoding::Rgb => "rgb",
            LumaCoding::Rec601 => "rec601",
            LumaCoding::Rec709 => "rec709",
        }
    }
}

impl fmt::Display for LumaCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LumaCoding {
    type Err = ColorError;

    fn from_str(s: &str) -> ColorResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(LumaCoding::Rgb),
            "rec601" => Ok(LumaCoding::Rec601),
            "rec709" => Ok(LumaCoding::Rec709),
            _ => Err(ColorError::UnknownLumaCoding(s.to_string())),
        }
    }
}

/// Identity: every channel passes through
pub const RGB_MATRIX: ColorMatrix = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Cross-talk matrix of the Wimmer method: each channel is rebuilt from the
/// other two.
pub const WIMMER_MATRIX: ColorMatrix = [[0.0, 0.7, 0.3], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]];

/// Dubois least-squares matrices for red-cyan glasses, `(left, right)`
pub const DUBOIS_RED_CYAN: (ColorMatrix, ColorMatrix) = (
    [
        [0.456, 0.500, 0.175],
        [-0.040, -0.038, -0.016],
        [-0.015, -0.021, -0.005],
    ],
    [
        [-0.043, -0.088, -0.002],
        [0.378, 0.734, -0.018],
        [-0.072, -0.113, 1.226],
    ],
);

/// Dubois least-squares matrices for green-magenta glasses, `(left, right)`
pub const DUBOIS_GREEN_MAGENTA: (ColorMatrix, ColorMatrix) = (
    [
        [-0.062, -0.158, -0.039],
        [0.284, 0.668, 0.143],
        [-0.015, -0.027, 0.021],
    ],
    [
        [0.529, 0.705, 0.024],
        [-0.016, -0.015, -0.065],
        [0.009, 0.075, 0.937],
    ],
);

/// Dubois least-squares matrices for amber-blue glasses, `(left, right)`
pub const DUBOIS_AMBER_BLUE: (ColorMatrix, ColorMatrix) = (
    [
        [1.062, -0.205, 0.299],
        [-0.026, 0.908, 0.068],
        [-0.038, -0.173, 0.022],
    ],
    [
        [-0.016, -0.123, -0.017],
        [0.006, 0.062, -0.017],
        [0.094, 0.185, 0.911],
    ],
);

/// Look up the Dubois matrices for a scheme.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedDuboisScheme`] for schemes other than
/// red-cyan, green-magenta and amber-blue.
pub fn dubois_matrices(scheme: ColorScheme) -> ColorResult<(ColorMatrix, ColorMatrix)> {
    match scheme {
        ColorScheme::RedCyan => Ok(DUBOIS_RED_CYAN),
        ColorScheme::GreenMagenta => Ok(DUBOIS_GREEN_MAGENTA),
        ColorScheme::AmberBlue => Ok(DUBOIS_AMBER_BLUE),
        other => Err(ColorError::UnsupportedDuboisScheme(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_names_round_trip() {
        for cs in ColorScheme::ALL {
            assert_eq!(cs.name().parse::<ColorScheme>().unwrap(), cs);
        }
        assert!(matches!(
            "blue-yellow".parse::<ColorScheme>(),
            Err(ColorError::UnknownColorScheme(_))
        ));
    }

    #[test]
    fn test_luma_parse() {
        assert_eq!("REC601".parse::<LumaCoding>().unwrap(), LumaCoding::Rec601);
        assert!("rec2020".parse::<LumaCoding>().is_err());
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        for lc in [LumaCoding::Rgb, LumaCoding::Rec601, LumaCoding::Rec709] {
            let sum: f64 = lc.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dubois_support() {
        assert!(dubois_matrices(ColorScheme::RedCyan).is_ok());
        assert!(dubois_matrices(ColorScheme::AmberBlue).is_ok());
        assert!(matches!(
            dubois_matrices(ColorScheme::MagentaCyan),
            Err(ColorError::UnsupportedDuboisScheme(ColorScheme::MagentaCyan))
        ));
    }
}
