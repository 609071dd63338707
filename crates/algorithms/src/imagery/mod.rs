//! Imagery analysis algorithms
//!
//! Algorithms for remote sensing and spectral analysis:
//! - Spectral indices: NDVI, NBR, generic normalized difference
//! - Change detection: temporal differencing, change masks, classification

mod change_detection;
mod indices;

pub use change_detection::{
    change_mask, classify_change, difference, ChangeClassParams, CLASS_DECREASE, CLASS_INCREASE,
    CLASS_NODATA, CLASS_NO_CHANGE, MASK_CHANGED, MASK_UNCHANGED,
};
pub use indices::{nbr, ndvi, normalized_difference};
