//! stereoscopy-compose - Spatial and temporal stereo formats
//!
//! Once both images of a pair share one size, this crate lays them out
//! for a particular viewing method:
//!
//! - Side by side or over/under, with an optional divider ([`side_by_side`])
//! - Row interlacing, column interlacing and checkerboards ([`patterned`])
//! - Ping-pong animation frames for wiggle GIFs ([`Wiggle`])

mod error;
pub mod pattern;
pub mod side_by_side;
pub mod wiggle;

pub use error::{ComposeError, ComposeResult};
pub use pattern::{Pattern, patterned};
pub use side_by_side::{Layout, side_by_side};
pub use wiggle::{DEFAULT_WIGGLE_DURATION_MS, Wiggle};
