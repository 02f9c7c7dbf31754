//! Color space conversion utilities
//!
//! Provides the per-pixel conversion used by segmentation:
//! - 16-bit (or widened 8-bit) sRGB to CIE Lab under D65
//! - Euclidean ΔE76 distance between Lab samples
//! - Whole-image conversion into an immutable [`LabGrid`]
//!
//! The conversion is written out explicitly rather than delegated to
//! `palette`'s generic pipeline so that the matrix and companding constants
//! are exactly those in [`crate::constants`]; results are carried in
//! `palette`'s `Lab` type.

use palette::white_point::D65;
use palette::Lab;
use rayon::prelude::*;

use crate::constants::{lab, srgb, CHANNEL_8_TO_16, CHANNEL_MAX_16, D65_WHITE_POINT_XYZ};
use crate::raster::PixelSource;

/// One pixel's color in CIE Lab (D65, double precision)
pub type LabSample = Lab<D65, f64>;

/// sRGB → Lab converter normalizing against a reference white
#[derive(Debug, Clone, Copy)]
pub struct LabConverter {
    white_point: [f64; 3],
}

impl Default for LabConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl LabConverter {
    /// Create a new converter with D65 as reference white
    pub fn new() -> Self {
        Self {
            white_point: D65_WHITE_POINT_XYZ,
        }
    }

    /// Convert 16-bit RGB to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - channel values in range [0, 65535]
    ///
    /// # Returns
    ///
    /// Lab color in D65 illuminant; L is nominally within [0, 100]
    pub fn rgb16_to_lab(&self, r: u16, g: u16, b: u16) -> LabSample {
        let linear = [r, g, b].map(|c| decode_gamma(c as f64 / CHANNEL_MAX_16));

        let mut xyz = [0.0; 3];
        for (axis, row) in srgb::TO_XYZ.iter().enumerate() {
            let dot: f64 = row.iter().zip(linear).map(|(m, c)| m * c).sum();
            xyz[axis] = compand(dot / self.white_point[axis]);
        }
        let [fx, fy, fz] = xyz;

        Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
    }

    /// Convert 8-bit RGB by widening each channel to the 16-bit scale first
    pub fn rgb8_to_lab(&self, r: u8, g: u8, b: u8) -> LabSample {
        self.rgb16_to_lab(
            r as u16 * CHANNEL_8_TO_16,
            g as u16 * CHANNEL_8_TO_16,
            b as u16 * CHANNEL_8_TO_16,
        )
    }

    /// Compute Delta E (color difference) between two Lab colors
    ///
    /// Uses simple Euclidean distance (ΔE76).
    pub fn delta_e(lab1: LabSample, lab2: LabSample) -> f64 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// Inverse sRGB transfer function on a normalized channel
fn decode_gamma(v: f64) -> f64 {
    if v > srgb::LINEAR_CUTOFF {
        ((v + srgb::GAMMA_OFFSET) / srgb::GAMMA_SCALE).powf(srgb::GAMMA_EXPONENT)
    } else {
        v / srgb::LINEAR_SLOPE
    }
}

/// Lab nonlinearity on a white-normalized XYZ component
fn compand(v: f64) -> f64 {
    if v > lab::EPSILON {
        v.cbrt()
    } else {
        lab::LINEAR_SLOPE * v + lab::LINEAR_OFFSET
    }
}

/// Dense, immutable Lab value for every pixel of an image (row-major).
#[derive(Debug, Clone)]
pub struct LabGrid {
    width: usize,
    height: usize,
    samples: Vec<LabSample>,
}

impl LabGrid {
    /// Convert every pixel of `source` once
    ///
    /// Pixels are read sequentially; the conversion itself is a pure
    /// per-pixel function and runs on the rayon pool when `parallel` is set.
    pub fn from_source<S: PixelSource + ?Sized>(source: &S, parallel: bool) -> Self {
        let width = source.width() as usize;
        let height = source.height() as usize;

        let mut raw = Vec::with_capacity(width * height);
        for y in 0..source.height() {
            for x in 0..source.width() {
                raw.push(source.read_pixel(x, y));
            }
        }

        let converter = LabConverter::new();
        let convert = |&[r, g, b]: &[u16; 3]| converter.rgb16_to_lab(r, g, b);
        let samples = if parallel {
            raw.par_iter().map(convert).collect()
        } else {
            raw.iter().map(convert).collect()
        };

        Self {
            width,
            height,
            samples,
        }
    }

    /// Build a grid from precomputed samples in row-major order
    ///
    /// Returns `None` when `samples.len() != width * height`.
    pub fn from_samples(width: usize, height: usize, samples: Vec<LabSample>) -> Option<Self> {
        (samples.len() == width * height).then_some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Lab value at (x, y)
    pub fn get(&self, x: usize, y: usize) -> LabSample {
        self.samples[y * self.width + x]
    }

    /// ΔE76 between two pixels
    pub fn distance(&self, (x1, y1): (usize, usize), (x2, y2): (usize, usize)) -> f64 {
        LabConverter::delta_e(self.get(x1, y1), self.get(x2, y2))
    }
}
