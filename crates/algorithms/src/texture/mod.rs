//! Texture feature extraction
//!
//! - **GLCM**: windowed gray-level co-occurrence matrices reduced to
//!   Haralick-style statistics, one output layer per statistic
//! - **Statistics**: the registry of reduction functions
//! - **Co-occurrence**: the per-window matrix and the constant index matrices

mod cooccurrence;
mod geometry;
mod glcm;
mod statistics;

pub use cooccurrence::{envi_mean, level_index, CooccurrenceMatrix, IndexMatrices, Normalization};
pub use geometry::WindowGeometry;
pub use glcm::{calc_texture, calc_texture_named, GlcmTexture, NaPolicy, TextureParams, TextureStack};
pub use statistics::{parse_statistics, Statistic, StatisticFn};
