//! Reference values for color conversion and segmentation
//!
//! This module contains compile-time constants for the sRGB → CIE Lab
//! conversion and the fixed defaults of the region segmentation.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. This is the standard reference for digital
/// images and computer displays.
pub mod d65 {
    /// D65 white point in CIE XYZ color space (array form)
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_POINT_XYZ: [f64; 3] = [0.95047, 1.00000, 1.08883];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// Full scale of a 16-bit normalized channel
pub const CHANNEL_MAX_16: f64 = 65535.0;

/// Multiplier widening an 8-bit channel to the 16-bit scale (255 * 257 = 65535)
pub const CHANNEL_8_TO_16: u16 = 257;

/// sRGB transfer function and primaries
pub mod srgb {
    /// Values above this are decoded with the power segment of the curve
    pub const LINEAR_CUTOFF: f64 = 0.04045;

    pub const GAMMA_OFFSET: f64 = 0.055;
    pub const GAMMA_SCALE: f64 = 1.055;
    pub const GAMMA_EXPONENT: f64 = 2.4;

    /// Slope of the linear segment near black
    pub const LINEAR_SLOPE: f64 = 12.92;

    /// Linear sRGB → XYZ (D65), one row per output axis
    pub const TO_XYZ: [[f64; 3]; 3] = [
        [0.4124, 0.3576, 0.1805],
        [0.2126, 0.7152, 0.0722],
        [0.0193, 0.1192, 0.9505],
    ];
}

/// CIE Lab companding
pub mod lab {
    /// Below this normalized XYZ value the linear segment is used
    pub const EPSILON: f64 = 0.008856;

    pub const LINEAR_SLOPE: f64 = 7.787;

    pub const LINEAR_OFFSET: f64 = 16.0 / 116.0;
}

/// Segmentation defaults
pub mod segmentation {
    /// Maximum ΔE76 distance for two adjacent pixels to share a region
    pub const DEFAULT_THRESHOLD: f64 = 5.0;
}

/// Output naming
pub mod output {
    /// Inserted between the input stem and its final extension
    pub const DEFAULT_SUFFIX: &str = "_regionized";
}
