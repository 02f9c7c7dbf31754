//! # Regionizer
//!
//! Partitions a raster image into perceptually uniform color regions and
//! renders the pixels on region boundaries as a black/white mask.
//!
//! The pipeline:
//! - Converts every pixel to CIE Lab (D65)
//! - Cuts each column into vertical runs of near-uniform color
//! - Merges runs across horizontal neighbours within the same threshold
//! - Flags pixels at region transitions along rows and columns
//! - Renders flagged pixels black on a white canvas of the input's size
//!
//! ## Example
//!
//! ```rust,no_run
//! use regionizer::{regionize_file, RegionizerConfig};
//! use std::path::Path;
//!
//! let written = regionize_file(Path::new("photo.png"), &RegionizerConfig::default())?;
//! println!("mask written to {}", written.display());
//! # Ok::<(), regionizer::RegionizeError>(())
//! ```

use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_io;
pub mod raster;
pub mod render;
pub mod segmentation;

pub use color::{LabConverter, LabGrid, LabSample};
pub use config::{MergeStrategy, RegionizerConfig};
pub use error::{RegionizeError, Result};
pub use raster::{MaskCanvas, MaskColor, PixelSource};
pub use segmentation::{BorderMap, Point, RegionId, SegmentationState, SegmentationStats};

use segmentation::{build_column_regions, detect_borders, merge_rows};

/// Outcome of segmenting one image
#[derive(Debug, Clone)]
pub struct Regionization {
    /// Border flags of the final region assignment
    pub borders: BorderMap,
    /// Region and border counters
    pub stats: SegmentationStats,
}

impl Regionization {
    /// Render the border mask onto a new canvas
    pub fn to_mask<C: MaskCanvas>(&self) -> C {
        render::render_mask(&self.borders)
    }
}

/// Segmentation pipeline bound to a validated configuration
#[derive(Debug, Clone)]
pub struct Regionizer {
    config: RegionizerConfig,
}

impl Regionizer {
    /// Create a pipeline, rejecting invalid configuration
    pub fn new(config: RegionizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RegionizerConfig {
        &self.config
    }

    /// Segment `source` and detect region borders
    ///
    /// Pure and deterministic: the same pixels and configuration always
    /// produce the same border map, whichever merge strategy or
    /// parallelism is selected.
    pub fn run<S: PixelSource + ?Sized>(&self, source: &S) -> Result<Regionization> {
        Ok(self.segment(source).1)
    }

    /// Like [`Regionizer::run`], also returning the final segmentation state
    pub fn segment<S: PixelSource + ?Sized>(
        &self,
        source: &S,
    ) -> (SegmentationState, Regionization) {
        let config = &self.config;
        let grid = LabGrid::from_source(source, config.parallel);
        let mut state = SegmentationState::new(grid, config.threshold);

        let initial_regions = build_column_regions(&mut state, config.parallel);
        let merges = merge_rows(&mut state, config.merge_strategy);
        let borders = detect_borders(&state, config.frame_edges, config.parallel);

        let stats = SegmentationStats {
            initial_regions,
            final_regions: state.region_count(),
            merges,
            border_pixels: borders.flagged_count(),
        };
        (state, Regionization { borders, stats })
    }
}

/// Regionize an image file and write its border mask next to it
///
/// The output path is the input's name with `config.output_suffix` inserted
/// before the final extension, encoded in the input's format. Nothing is
/// written unless the whole mask has been computed and encoded.
///
/// # Returns
///
/// Path of the written mask
///
/// # Errors
///
/// Returns `RegionizeError` if:
/// - The configuration is invalid
/// - The output name cannot be derived (`MalformedPath`)
/// - The input cannot be opened (`InputNotFound`) or decoded (`UnsupportedFormat`)
/// - The mask cannot be written (`WriteFailure`)
pub fn regionize_file(input: &Path, config: &RegionizerConfig) -> Result<PathBuf> {
    let start = Instant::now();
    let regionizer = Regionizer::new(config.clone())?;

    let output = image_io::output_path_for(input, &config.output_suffix)?;
    let format = image_io::output_format_for(&output)?;
    let decoded = image_io::load_rgb16(input)?;

    let result = regionizer.run(&decoded)?;
    let mask: image::RgbImage = result.to_mask();
    image_io::save_atomically(&mask, &output, format)?;

    let stats = result.stats;
    info!(
        "{}: {}x{} px, {} column regions merged into {} ({} merges), {} border pixels in {:?}",
        input.display(),
        decoded.width(),
        decoded.height(),
        stats.initial_regions,
        stats.final_regions,
        stats.merges,
        stats.border_pixels,
        start.elapsed()
    );
    Ok(output)
}
