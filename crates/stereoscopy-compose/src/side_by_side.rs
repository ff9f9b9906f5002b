//! Side-by-side and over/under layouts
//!
//! The two images are placed next to each other, optionally separated by a
//! solid divider band. Which image goes first is the caller's choice:
//! parallel viewing puts the left image first, cross-eye viewing swaps the
//! pair before calling [`side_by_side`].

use crate::{ComposeError, ComposeResult};
use log::debug;
use stereoscopy_core::{ColorType, Image, ImageMut, Rgba};

/// Direction in which the two images are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// First image on the left, second on the right
    #[default]
    Horizontal,
    /// First image on top, second below
    Vertical,
}

/// Join two equally sized images into one.
///
/// The output is `2w + divider` by `h` for [`Layout::Horizontal`] and
/// `w` by `2h + divider` for [`Layout::Vertical`]. With a divider the
/// output is RGBA and the band between the images is filled with
/// `divider_color`; without one it takes the color type of `first`.
///
/// # Arguments
///
/// * `first` - Image placed at the origin
/// * `second` - Image placed after the divider
/// * `layout` - Join direction
/// * `divider` - Width of the band between the images, in pixels
/// * `divider_color` - Color of the band
///
/// # Errors
///
/// Returns [`ComposeError::Core`] if the images differ in size and
/// [`ComposeError::InvalidParameters`] if the output size overflows.
pub fn side_by_side(
    first: &Image,
    second: &Image,
    layout: Layout,
    divider: u32,
    divider_color: Rgba,
) -> ComposeResult<Image> {
    first.check_same_size(second)?;
    let (w, h) = first.dimensions();
    let along = match layout {
        Layout::Horizontal => w,
        Layout::Vertical => h,
    };
    let total = along
        .checked_mul(2)
        .and_then(|v| v.checked_add(divider))
        .ok_or_else(|| {
            ComposeError::InvalidParameters(format!("divider {divider} is too wide"))
        })?;
    let (ow, oh) = match layout {
        Layout::Horizontal => (total, h),
        Layout::Vertical => (w, total),
    };
    let color_type = if divider > 0 {
        ColorType::Rgba
    } else {
        first.color_type()
    };
    debug!("side by side {:?}: {}x{} {:?}", layout, ow, oh, color_type);

    let mut out = if divider > 0 {
        ImageMut::filled(ow, oh, color_type, divider_color)?
    } else {
        ImageMut::new(ow, oh, color_type)?
    };
    out.paste(first, 0, 0);
    match layout {
        Layout::Horizontal => out.paste(second, w + divider, 0),
        Layout::Vertical => out.paste(second, 0, h + divider),
    }
    Ok(out.into())
}
