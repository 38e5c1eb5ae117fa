//! Error types for glcmkit

use thiserror::Error;

/// Main error type for glcmkit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown texture statistic: {0:?}")]
    UnknownStatistic(String),

    #[error("Unknown missing-value policy: {0:?} (expected ignore, center or any)")]
    UnknownNaPolicy(String),

    #[error(
        "Invalid window geometry: window {window_rows}x{window_cols} with shift ({shift_row}, {shift_col}) \
         leaves no valid positions in a {rows}x{cols} raster"
    )]
    InvalidGeometry {
        rows: usize,
        cols: usize,
        window_rows: usize,
        window_cols: usize,
        shift_row: isize,
        shift_col: isize,
    },

    #[error("Gray level {value} at ({row}, {col}) is outside [1, {n_grey}]")]
    DataRange {
        row: usize,
        col: usize,
        value: f64,
        n_grey: usize,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for glcmkit operations
pub type Result<T> = std::result::Result<T, Error>;
