//! Image file loading and saving
//!
//! Thin wrappers around the `image` crate:
//! - decoding any supported format into a 16-bit RGB buffer
//! - deriving the `<stem>_regionized.<ext>` output path
//! - writing the mask so that a failed run never leaves a partial file
//!
//! ## Design
//!
//! The mask is encoded into a temporary file created next to the
//! destination and renamed over it only once encoding has succeeded. On any
//! error the temporary file is dropped, which deletes it.

use image::{ImageError, ImageFormat, ImageReader, RgbImage};
use log::{debug, warn};
use std::ffi::OsStr;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RegionizeError, Result};
use crate::raster::Rgb16Image;

/// Derive the output path for `input`
///
/// The output lives next to the input and keeps its final extension:
/// `dir/photo.v2.png` becomes `dir/photo.v2_regionized.png` for the
/// default suffix.
///
/// # Errors
///
/// Returns `RegionizeError::MalformedPath` if the file name has no stem,
/// no final extension, or is not valid UTF-8.
pub fn output_path_for(input: &Path, suffix: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(OsStr::to_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RegionizeError::malformed_path(input, "missing file name"))?;
    let extension = input
        .extension()
        .and_then(OsStr::to_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RegionizeError::malformed_path(input, "missing file extension"))?;

    Ok(input.with_file_name(format!("{stem}{suffix}.{extension}")))
}

/// Encoder format for `path`, chosen from its extension
///
/// # Errors
///
/// Returns `RegionizeError::UnsupportedFormat` if the extension is unknown,
/// or names a format that cannot be written as 8-bit RGB.
pub fn output_format_for(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or_else(|| RegionizeError::malformed_path(path, "missing file extension"))?;

    let unsupported = |message: String| RegionizeError::UnsupportedFormat {
        path: path.to_path_buf(),
        message,
        source: None,
    };
    let format = ImageFormat::from_extension(extension)
        .ok_or_else(|| unsupported(format!("no encoder for extension '{extension}'")))?;
    if !encodes_rgb8(format) {
        return Err(unsupported(format!("cannot write an 8-bit RGB mask as {format:?}")));
    }
    Ok(format)
}

/// Whether `format` has an encoder accepting 8-bit RGB buffers
fn encodes_rgb8(format: ImageFormat) -> bool {
    // Float-only and RGBA16-only encoders
    format.writing_enabled()
        && !matches!(format, ImageFormat::Hdr | ImageFormat::OpenExr | ImageFormat::Farbfeld)
}

/// Load an image from disk as 16-bit RGB
///
/// # Errors
///
/// Returns:
/// - `InputNotFound` if the file cannot be opened
/// - `UnsupportedFormat` if decoding fails, including truncated data
pub fn load_rgb16(path: &Path) -> Result<Rgb16Image> {
    let reader = ImageReader::open(path).map_err(|e| RegionizeError::input_not_found(path, e))?;

    let img = reader
        .decode()
        .map_err(|e| RegionizeError::unsupported_format(path, "failed to decode image", e))?;

    debug!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_rgb16())
}

/// Encode `mask` as `format` and publish it at `path` atomically
///
/// # Errors
///
/// Returns `RegionizeError::UnsupportedFormat` if the encoder rejects 8-bit
/// RGB, and `RegionizeError::WriteFailure` if the temporary file cannot be
/// created, encoding fails, or the final rename fails. No file is left at
/// `path` in any of these cases.
pub fn save_atomically(mask: &RgbImage, path: &Path, format: ImageFormat) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".regionize-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| RegionizeError::write_failure(path, "cannot create temporary file", e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        mask.write_to(&mut writer, format).map_err(|e| match e {
            ImageError::Unsupported(_) => {
                RegionizeError::unsupported_format(path, "encoder rejected 8-bit RGB", e)
            }
            other => RegionizeError::write_failure(path, "encoding failed", other),
        })?;
        writer
            .flush()
            .map_err(|e| RegionizeError::write_failure(path, "flush failed", e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| RegionizeError::write_failure(path, "sync failed", e))?;

    tmp.persist(path).map_err(|e| {
        warn!("discarding temporary file {}", e.file.path().display());
        RegionizeError::write_failure(path, "cannot move output into place", e.error)
    })?;

    debug!("wrote {}", path.display());
    Ok(())
}
