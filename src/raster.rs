//! Minimal pixel capability interface between the segmentation core and
//! the image library.
//!
//! The core reads pixels through [`PixelSource`] and the mask renderer
//! writes through [`MaskCanvas`]; only this module and `image_io` name
//! concrete `image` crate types. Encoding and publishing a finished canvas
//! is `image_io::save_atomically`.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::constants::CHANNEL_8_TO_16;

/// 16-bit RGB buffer, the decoded form of every input image
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Read access to a decoded pixel grid.
pub trait PixelSource {
    /// Number of columns
    fn width(&self) -> u32;

    /// Number of rows
    fn height(&self) -> u32;

    /// Red, green and blue on the 16-bit scale [0, 65535]
    fn read_pixel(&self, x: u32, y: u32) -> [u16; 3];
}

/// The two colors of a border mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskColor {
    /// Border pixel
    Black,
    /// Interior pixel
    White,
}

impl MaskColor {
    /// 8-bit RGB value of this color
    pub fn rgb8(self) -> [u8; 3] {
        match self {
            MaskColor::Black => [0, 0, 0],
            MaskColor::White => [255, 255, 255],
        }
    }
}

/// Write access to a freshly allocated output grid.
pub trait MaskCanvas: Sized {
    /// Allocate a canvas of the given size
    fn allocate(width: u32, height: u32) -> Self;

    /// Paint a single pixel
    fn write_pixel(&mut self, x: u32, y: u32, color: MaskColor);
}

impl PixelSource for Rgb16Image {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn read_pixel(&self, x: u32, y: u32) -> [u16; 3] {
        self.get_pixel(x, y).0
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn read_pixel(&self, x: u32, y: u32) -> [u16; 3] {
        let [r, g, b] = self.get_pixel(x, y).0;
        [
            r as u16 * CHANNEL_8_TO_16,
            g as u16 * CHANNEL_8_TO_16,
            b as u16 * CHANNEL_8_TO_16,
        ]
    }
}

impl MaskCanvas for RgbImage {
    fn allocate(width: u32, height: u32) -> Self {
        RgbImage::new(width, height)
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: MaskColor) {
        self.put_pixel(x, y, Rgb(color.rgb8()));
    }
}
