//! Rectangle extraction

use super::{Image, ImageMut};
use crate::error::{Error, Result};

impl Image {
    /// Extract the rectangle `(x, y, w, h)`.
    ///
    /// The rectangle is clipped to the image bounds first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the clipped rectangle is empty.
    pub fn clip_rectangle(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Image> {
        let x_end = x.saturating_add(w).min(self.width());
        let y_end = y.saturating_add(h).min(self.height());
        if x >= x_end || y >= y_end {
            return Err(Error::InvalidParameter(format!(
                "rectangle ({x}, {y}, {w}, {h}) does not intersect {}x{} image",
                self.width(),
                self.height()
            )));
        }
        let cw = x_end - x;
        let ch = y_end - y;
        if (x, y, cw, ch) == (0, 0, self.width(), self.height()) {
            return Ok(self.clone());
        }
        let mut out = ImageMut::new(cw, ch, self.color_type())?;
        let n = self.channels();
        for row in 0..ch {
            let src = &self.row(y + row)[x as usize * n..x_end as usize * n];
            out.row_mut(row).copy_from_slice(src);
        }
        Ok(out.into())
    }
}
