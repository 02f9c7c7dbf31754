//! Color conversion module
//!
//! This module converts decoded RGB pixels into CIE Lab coordinates and
//! measures perceptual distance between them.

pub mod conversion;

pub use conversion::{LabConverter, LabGrid, LabSample};
