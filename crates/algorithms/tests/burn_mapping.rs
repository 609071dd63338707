//! End-to-end burn-scar mapping over synthetic imagery.
//!
//! Builds NIR/Red bands for two dates, computes NDVI for each, differences
//! them and thresholds the severity into a change mask, checking that the
//! burned region and only the burned region is flagged.

use burntrace_algorithms::imagery::{
    change_mask, classify_change, difference, ndvi, ChangeClassParams, CLASS_DECREASE,
    CLASS_NO_CHANGE, MASK_CHANGED, MASK_UNCHANGED,
};
use burntrace_core::{GeoTransform, Raster};

const ROWS: usize = 20;
const COLS: usize = 20;

/// Burned block in the post-fire scene
const BURN_ROWS: std::ops::Range<usize> = 5..12;
const BURN_COLS: std::ops::Range<usize> = 8..16;

fn band(fill: f64) -> Raster<f64> {
    let mut r = Raster::filled(ROWS, COLS, fill);
    r.set_transform(GeoTransform::new(149.0, -35.0, 0.001, -0.001));
    r
}

/// Healthy vegetation everywhere before the fire
fn scene_before() -> (Raster<f64>, Raster<f64>) {
    (band(0.5), band(0.08)) // (nir, red)
}

/// Vegetation burned inside the block, a cloud gap at (0, 0)
fn scene_after() -> (Raster<f64>, Raster<f64>) {
    let mut nir = band(0.5);
    let mut red = band(0.08);
    for row in BURN_ROWS {
        for col in BURN_COLS {
            nir.set(row, col, 0.12).unwrap();
            red.set(row, col, 0.18).unwrap();
        }
    }
    nir.set(0, 0, f64::NAN).unwrap();
    red.set(0, 0, f64::NAN).unwrap();
    (nir, red)
}

#[test]
fn burn_scar_is_masked() {
    let (nir_b, red_b) = scene_before();
    let (nir_a, red_a) = scene_after();

    let ndvi_before = ndvi(&nir_b, &red_b).unwrap();
    let ndvi_after = ndvi(&nir_a, &red_a).unwrap();

    let severity = difference(&ndvi_before, &ndvi_after).unwrap();
    let mask = change_mask(&severity, -0.3).unwrap();

    for row in 0..ROWS {
        for col in 0..COLS {
            let burned = BURN_ROWS.contains(&row) && BURN_COLS.contains(&col);
            let expected = if burned { MASK_CHANGED } else { MASK_UNCHANGED };
            assert_eq!(
                mask.get(row, col).unwrap(),
                expected,
                "wrong mask at ({}, {})",
                row,
                col
            );
        }
    }
}

#[test]
fn cloud_gap_stays_unmasked() {
    let (nir_b, red_b) = scene_before();
    let (nir_a, red_a) = scene_after();

    let severity = difference(
        &ndvi(&nir_b, &red_b).unwrap(),
        &ndvi(&nir_a, &red_a).unwrap(),
    )
    .unwrap();

    assert!(severity.get(0, 0).unwrap().is_nan());

    let mask = change_mask(&severity, -0.3).unwrap();
    assert_eq!(mask.get(0, 0).unwrap(), MASK_UNCHANGED);
}

#[test]
fn mask_grows_as_threshold_rises() {
    let (nir_b, red_b) = scene_before();
    let (nir_a, red_a) = scene_after();

    let severity = difference(
        &ndvi(&nir_b, &red_b).unwrap(),
        &ndvi(&nir_a, &red_a).unwrap(),
    )
    .unwrap();

    let thresholds = [-0.8, -0.5, -0.3, -0.05];
    let counts: Vec<usize> = thresholds
        .iter()
        .map(|&t| {
            let mask = change_mask(&severity, t).unwrap();
            mask.data().iter().filter(|&&v| v == MASK_CHANGED).count()
        })
        .collect();

    for pair in counts.windows(2) {
        assert!(
            pair[0] <= pair[1],
            "changed-pixel count should not shrink as the threshold rises: {:?}",
            counts
        );
    }
}

#[test]
fn classification_matches_mask_on_decrease() {
    let (nir_b, red_b) = scene_before();
    let (nir_a, red_a) = scene_after();

    let severity = difference(
        &ndvi(&nir_b, &red_b).unwrap(),
        &ndvi(&nir_a, &red_a).unwrap(),
    )
    .unwrap();

    let classes = classify_change(
        &severity,
        ChangeClassParams {
            decrease_threshold: -0.3,
            increase_threshold: 0.3,
        },
    )
    .unwrap();

    assert_eq!(classes.get(6, 10).unwrap(), CLASS_DECREASE);
    assert_eq!(classes.get(2, 2).unwrap(), CLASS_NO_CHANGE);
}
