//! Change detection between two temporal rasters
//!
//! Differencing of equally-shaped index rasters (e.g. NDVI at two dates),
//! thresholded change masking, and categorical change classification.

use crate::maybe_rayon::*;
use burntrace_core::raster::Raster;
use burntrace_core::{Error, Result};
use ndarray::Array2;

use super::indices::build_output;

/// Mask value for a changed pixel
pub const MASK_CHANGED: u8 = 1;
/// Mask value for an unchanged (or missing) pixel
pub const MASK_UNCHANGED: u8 = 0;

/// Change categories produced by [`classify_change`]
pub const CLASS_NODATA: u8 = 0;
pub const CLASS_DECREASE: u8 = 1;
pub const CLASS_NO_CHANGE: u8 = 2;
pub const CLASS_INCREASE: u8 = 3;

/// Parameters for categorical change classification
#[derive(Debug, Clone)]
pub struct ChangeClassParams {
    /// Threshold for significant decrease (negative change)
    pub decrease_threshold: f64,
    /// Threshold for significant increase (positive change)
    pub increase_threshold: f64,
}

impl Default for ChangeClassParams {
    fn default() -> Self {
        Self {
            decrease_threshold: -0.1,
            increase_threshold: 0.1,
        }
    }
}

/// Compute the signed difference between two temporal rasters.
///
/// `severity[i,j] = after[i,j] - before[i,j]`
///
/// Missing values (NaN) in either input propagate to the output through
/// IEEE-754 arithmetic; there is no sentinel branch. A negative severity
/// indicates a drop in the index between the two dates, consistent with
/// vegetation loss when the inputs are NDVI.
///
/// Both rasters must have identical dimensions; a mismatch fails with
/// `Error::ShapeMismatch` and no partial result is produced.
///
/// # Arguments
/// * `before` - Index raster at time T1
/// * `after` - Index raster at time T2
pub fn difference(before: &Raster<f64>, after: &Raster<f64>) -> Result<Raster<f64>> {
    before.check_shape(after)?;

    let (rows, cols) = before.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let b = unsafe { before.get_unchecked(row, col) };
                let a = unsafe { after.get_unchecked(row, col) };
                // NaN in either operand yields NaN
                row_data.push(a - b);
            }
            row_data
        })
        .collect();

    build_output(before, rows, cols, data)
}

/// Derive a boolean change mask from a severity raster.
///
/// `mask[i,j] = 1` iff `severity[i,j] < threshold`, else 0.
///
/// Comparisons against NaN are false, so missing data never marks a pixel
/// as changed. The threshold is caller-supplied; a value of -0.3 on NDVI
/// severity is a common starting point for burn-scar mapping, but no
/// default is imposed.
///
/// # Arguments
/// * `severity` - Signed difference raster from [`difference`]
/// * `threshold` - Pixels strictly below this value are marked changed
pub fn change_mask(severity: &Raster<f64>, threshold: f64) -> Result<Raster<u8>> {
    let (rows, cols) = severity.shape();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let s = unsafe { severity.get_unchecked(row, col) };
                // NaN < threshold is false
                row_data.push(if s < threshold {
                    MASK_CHANGED
                } else {
                    MASK_UNCHANGED
                });
            }
            row_data
        })
        .collect();

    let mut mask = severity.with_same_meta::<u8>(rows, cols);
    *mask.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(mask)
}

/// Classify a severity raster into decrease / no change / increase.
///
/// Output categories:
/// - 0 = Missing input data
/// - 1 = Significant decrease (severity < decrease_threshold)
/// - 2 = No significant change
/// - 3 = Significant increase (severity > increase_threshold)
///
/// # Arguments
/// * `severity` - Signed difference raster from [`difference`]
/// * `params` - Threshold parameters
pub fn classify_change(severity: &Raster<f64>, params: ChangeClassParams) -> Result<Raster<u8>> {
    let (rows, cols) = severity.shape();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let s = unsafe { severity.get_unchecked(row, col) };
                row_data.push(if s.is_nan() {
                    CLASS_NODATA
                } else if s < params.decrease_threshold {
                    CLASS_DECREASE
                } else if s > params.increase_threshold {
                    CLASS_INCREASE
                } else {
                    CLASS_NO_CHANGE
                });
            }
            row_data
        })
        .collect();

    let mut classes = severity.with_same_meta::<u8>(rows, cols);
    classes.set_nodata(Some(CLASS_NODATA));
    *classes.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burntrace_core::GeoTransform;

    fn make_band(rows: usize, cols: usize, value: f64) -> Raster<f64> {
        let mut r = Raster::filled(rows, cols, value);
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        r
    }

    #[test]
    fn test_difference() {
        let before = make_band(5, 5, 0.8);
        let after = make_band(5, 5, 0.3);

        let severity = difference(&before, &after).unwrap();
        let s = severity.get(2, 2).unwrap();

        assert!((s + 0.5).abs() < 1e-10, "Severity should be -0.5, got {}", s);
    }

    #[test]
    fn test_difference_nan_propagation() {
        let mut before = make_band(4, 4, 0.7);
        before.set(1, 1, f64::NAN).unwrap();
        let mut after = make_band(4, 4, 0.2);
        after.set(2, 3, f64::NAN).unwrap();

        let severity = difference(&before, &after).unwrap();

        assert!(severity.get(1, 1).unwrap().is_nan());
        assert!(severity.get(2, 3).unwrap().is_nan());
        assert!(!severity.get(0, 0).unwrap().is_nan());
    }

    #[test]
    fn test_difference_shape_mismatch() {
        let before = make_band(2, 2, 0.5);
        let after = make_band(3, 3, 0.5);

        assert!(matches!(
            difference(&before, &after),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_change_mask_threshold() {
        let before = make_band(5, 5, 0.8);
        let after = make_band(5, 5, 0.3);

        let severity = difference(&before, &after).unwrap();

        // Severity is -0.5 everywhere
        let mask = change_mask(&severity, -0.3).unwrap();
        assert_eq!(mask.get(2, 2).unwrap(), MASK_CHANGED);

        let mask = change_mask(&severity, -0.6).unwrap();
        assert_eq!(mask.get(2, 2).unwrap(), MASK_UNCHANGED);
    }

    #[test]
    fn test_change_mask_nan_never_changed() {
        let mut severity = make_band(3, 3, -0.9);
        severity.set(1, 1, f64::NAN).unwrap();

        // Even a very permissive threshold leaves NaN pixels unchanged
        let mask = change_mask(&severity, 10.0).unwrap();
        assert_eq!(mask.get(1, 1).unwrap(), MASK_UNCHANGED);
        assert_eq!(mask.get(0, 0).unwrap(), MASK_CHANGED);
    }

    #[test]
    fn test_change_mask_monotonic_in_threshold() {
        let mut severity = make_band(1, 4, 0.0);
        for (col, v) in [-0.7, -0.3, -0.1, 0.4].iter().enumerate() {
            severity.set(0, col, *v).unwrap();
        }

        let loose = change_mask(&severity, -0.05).unwrap();
        let strict = change_mask(&severity, -0.5).unwrap();

        // Every pixel changed under the stricter threshold is changed
        // under the looser one
        for col in 0..4 {
            if strict.get(0, col).unwrap() == MASK_CHANGED {
                assert_eq!(loose.get(0, col).unwrap(), MASK_CHANGED);
            }
        }
    }

    #[test]
    fn test_known_scene_end_to_end() {
        let mut before = Raster::from_vec(vec![0.8, 0.1, f64::NAN, 0.5], 2, 2).unwrap();
        before.set_transform(GeoTransform::default());
        let after = Raster::from_vec(vec![0.1, 0.1, 0.2, 0.9], 2, 2).unwrap();

        let severity = difference(&before, &after).unwrap();
        assert!((severity.get(0, 0).unwrap() + 0.7).abs() < 1e-10);
        assert!((severity.get(0, 1).unwrap()).abs() < 1e-10);
        assert!(severity.get(1, 0).unwrap().is_nan());
        assert!((severity.get(1, 1).unwrap() - 0.4).abs() < 1e-10);

        let mask = change_mask(&severity, -0.3).unwrap();
        assert_eq!(mask.get(0, 0).unwrap(), MASK_CHANGED);
        assert_eq!(mask.get(0, 1).unwrap(), MASK_UNCHANGED);
        assert_eq!(mask.get(1, 0).unwrap(), MASK_UNCHANGED);
        assert_eq!(mask.get(1, 1).unwrap(), MASK_UNCHANGED);
    }

    #[test]
    fn test_classify_change() {
        let mut severity = make_band(1, 4, 0.0);
        severity.set(0, 0, -0.5).unwrap();
        severity.set(0, 1, 0.5).unwrap();
        severity.set(0, 2, f64::NAN).unwrap();

        let classes = classify_change(&severity, ChangeClassParams::default()).unwrap();
        assert_eq!(classes.get(0, 0).unwrap(), CLASS_DECREASE);
        assert_eq!(classes.get(0, 1).unwrap(), CLASS_INCREASE);
        assert_eq!(classes.get(0, 2).unwrap(), CLASS_NODATA);
        assert_eq!(classes.get(0, 3).unwrap(), CLASS_NO_CHANGE);
    }
}
