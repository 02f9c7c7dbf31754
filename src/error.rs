//! Error types for the regionizer library

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for regionizer operations
pub type Result<T> = std::result::Result<T, RegionizeError>;

/// Every failure that can abort a regionizer run.
///
/// All variants are fatal for the current run; there is no partial-success
/// or retry mode.
#[derive(Error, Debug)]
pub enum RegionizeError {
    /// Input path is missing or cannot be opened
    #[error("Input image not found or unreadable: {}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image could not be decoded, or its format cannot be written back
    #[error("Unsupported image format for {}: {message}", .path.display())]
    UnsupportedFormat {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Output file name cannot be derived from the input path
    #[error("Malformed input path {}: {reason}", .path.display())]
    MalformedPath { path: PathBuf, reason: String },

    /// Output could not be created, encoded or published
    #[error("Failed to write output image {}: {message}", .path.display())]
    WriteFailure {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", .path.display())]
    ConfigError {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RegionizeError {
    /// Create an input-not-found error for `path`
    pub fn input_not_found(path: &Path, source: std::io::Error) -> Self {
        Self::InputNotFound {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an unsupported-format error with context
    pub fn unsupported_format<E>(path: &Path, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-path error
    pub fn malformed_path(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a write failure with context
    pub fn write_failure<E>(path: &Path, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WriteFailure {
            path: path.to_path_buf(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a configuration file error with context
    pub fn config<E>(path: &Path, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            path: path.to_path_buf(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Process exit status reported by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RegionizeError::InputNotFound { .. } => 2,
            RegionizeError::UnsupportedFormat { .. } => 3,
            RegionizeError::MalformedPath { .. } => 4,
            RegionizeError::WriteFailure { .. } => 5,
            RegionizeError::InvalidParameter { .. } | RegionizeError::ConfigError { .. } => 6,
        }
    }

    /// Get user-friendly error description for command-line display
    pub fn user_message(&self) -> String {
        match self {
            RegionizeError::InputNotFound { .. } => {
                "Could not open the input image. Check that the path exists and is readable.".to_string()
            }
            RegionizeError::UnsupportedFormat { .. } => {
                "The image format is not supported. Try converting it to PNG first.".to_string()
            }
            RegionizeError::MalformedPath { .. } => {
                "The input file name needs an extension (for example photo.png) so the output name can be derived.".to_string()
            }
            RegionizeError::WriteFailure { .. } => {
                "Could not write the mask image. Check free disk space and directory permissions.".to_string()
            }
            RegionizeError::InvalidParameter { parameter, .. } => {
                format!("The configuration value '{}' is out of range.", parameter)
            }
            RegionizeError::ConfigError { .. } => {
                "The configuration file could not be loaded. It must be valid JSON.".to_string()
            }
        }
    }
}
