//! Binary region-of-interest raster painted over the image for inpainting.

use crate::geometry::ImagePoint;

pub const UNMASKED: u8 = 0;
pub const MASKED: u8 = 255;

/// Minimum and maximum brush diameter in image pixels.
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 200;

pub const fn clamp_brush_size(size: u32) -> u32 {
    if size < MIN_BRUSH_SIZE {
        MIN_BRUSH_SIZE
    } else if size > MAX_BRUSH_SIZE {
        MAX_BRUSH_SIZE
    } else {
        size
    }
}

/// A single-channel raster aligned to the image's natural dimensions.
///
/// Cells are strictly `UNMASKED` or `MASKED`; painting is an additive union of
/// filled disks and only `clear` ever shrinks the masked region. The buffer is
/// discarded (not cleared) by the session whenever mask mode exits, the image
/// changes, or an edit lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBuffer {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl MaskBuffer {
    /// Allocates a zero-filled raster. Must be sized to the loaded image's
    /// natural dimensions at mask-mode entry.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![UNMASKED; (width as usize) * (height as usize)],
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Rasterizes a filled disk centered at `center` (fractional image
    /// coordinates are fine) into the buffer. Cells whose center falls within
    /// the radius become masked; already-masked cells stay masked.
    pub fn paint(&mut self, center: ImagePoint, radius: f64) {
        if radius <= 0.0 || self.cells.is_empty() {
            return;
        }

        let min_x = ((center.x - radius).floor().max(0.0)) as u32;
        let min_y = ((center.y - radius).floor().max(0.0)) as u32;
        let max_x = (center.x + radius).ceil().min(f64::from(self.width) - 1.0);
        let max_y = (center.y + radius).ceil().min(f64::from(self.height) - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as u32, max_y as u32);

        let radius_sq = radius * radius;
        for y in min_y..=max_y {
            let dy = f64::from(y) + 0.5 - center.y;
            let row = (y as usize) * (self.width as usize);
            for x in min_x..=max_x {
                let dx = f64::from(x) + 0.5 - center.x;
                if dx * dx + dy * dy <= radius_sq {
                    self.cells[row + x as usize] = MASKED;
                }
            }
        }
    }

    /// Resets every cell to unmasked. The only way to remove painted strokes.
    pub fn clear(&mut self) {
        self.cells.fill(UNMASKED);
    }

    /// Row-major cell bytes, length `width * height`, handed to the backend
    /// together with the dimensions.
    pub fn export(&self) -> &[u8] {
        &self.cells
    }

    pub fn masked_cells(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == MASKED).count()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&cell| cell == UNMASKED)
    }
}
