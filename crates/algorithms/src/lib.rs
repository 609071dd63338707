//! # burntrace Algorithms
//!
//! Raster algorithms for burntrace change detection.
//!
//! ## Available categories
//!
//! - **imagery**: Spectral indices (NDVI, NBR), temporal differencing,
//!   thresholded change masks, categorical change classification
//!
//! All algorithms are pure elementwise transforms: inputs are read-only,
//! outputs are newly allocated. With the default `parallel` feature they
//! process rows with rayon; disabling it falls back to sequential
//! iteration with the same results.

pub mod imagery;
mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        change_mask, classify_change, difference, nbr, ndvi, normalized_difference,
        ChangeClassParams, MASK_CHANGED, MASK_UNCHANGED,
    };
    pub use burntrace_core::prelude::*;
}
