//! Mask rendering
//!
//! Turns a [`BorderMap`] into a two-color pixel grid: black for border
//! pixels, white for everything else. Only in-range pixels are read, so the
//! origin slots of the map never become visible.

use crate::raster::{MaskCanvas, MaskColor};
use crate::segmentation::BorderMap;

/// Paint `borders` onto a newly allocated canvas of the same size
pub fn render_mask<C: MaskCanvas>(borders: &BorderMap) -> C {
    let width = borders.width() as u32;
    let height = borders.height() as u32;
    let mut canvas = C::allocate(width, height);

    for y in 0..height {
        for x in 0..width {
            let color = if borders.is_border(x as usize, y as usize) {
                MaskColor::Black
            } else {
                MaskColor::White
            };
            canvas.write_pixel(x, y, color);
        }
    }

    canvas
}
