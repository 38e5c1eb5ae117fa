//! # glcmkit Algorithms
//!
//! Texture analysis algorithms for glcmkit.
//!
//! ## Available Algorithm Categories
//!
//! - **texture**: GLCM (Haralick) texture statistics over sliding windows

pub mod texture;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::texture::{
        calc_texture, calc_texture_named, GlcmTexture, NaPolicy, Normalization, Statistic,
        TextureParams, TextureStack,
    };
    pub use glcmkit_core::prelude::*;
}
