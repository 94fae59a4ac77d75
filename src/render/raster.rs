use std::path::Path;

use crate::foundation::error::{MezzError, MezzResult};

/// An RGB8 raster, tightly packed and row-major.
///
/// Every codec in this crate writes grayscale values into all three channels, but the
/// composition engine consumes colour frames, so rasters stay three-channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl Raster {
    /// A raster filled with a single gray level.
    pub fn filled(width: u32, height: u32, level: u8) -> Self {
        Self {
            width,
            height,
            data: vec![level; (width as usize) * (height as usize) * 3],
        }
    }

    /// Return `true` when the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Write the same level to all three channels at `(x, y)`.
    pub fn set_gray(&mut self, x: u32, y: u32, level: u8) {
        let i = self.offset(x, y);
        self.data[i..i + 3].fill(level);
    }

    /// Fill the `w` x `h` rectangle at `(x, y)` with `level`, clipped to the raster.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, level: u8) {
        let x1 = x.saturating_add(w).min(self.width);
        let y1 = y.saturating_add(h).min(self.height);
        for yy in y.min(y1)..y1 {
            let row = self.offset(x.min(x1), yy)..self.offset(x1, yy);
            self.data[row].fill(level);
        }
    }

    /// Swap black and white (`v -> 255 - v`) in place.
    pub fn invert(&mut self) {
        for v in &mut self.data {
            *v = 255 - *v;
        }
    }

    /// Encode as PNG at `path`. The file is opened, written and closed within this call.
    pub fn save_png(&self, path: &Path) -> MezzResult<()> {
        if self.is_empty() {
            return Err(MezzError::io(format!(
                "refusing to write empty raster to '{}'",
                path.display()
            )));
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .map_err(|e| MezzError::io(format!("write png '{}': {e}", path.display())))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
