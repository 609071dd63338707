//! I/O operations for reading and writing raster data

mod native;

pub use native::{read_geotiff, write_geotiff, GeoTiffOptions};
