//! Equirectangular projection between latitude/longitude and world x/z.
//!
//! The world is an Earth-sized sphere unrolled onto a plane: one degree of
//! either axis spans `EQUATORIAL_CIRCUMFERENCE / 360` metres (= blocks).
//! Not geodetically exact, and not meant to be.

use crate::location::{FixSource, GeoFix, PlanarPosition};

pub const EQUATORIAL_CIRCUMFERENCE: f64 = 40_075_696.0;
pub const METERS_PER_DEGREE: f64 = EQUATORIAL_CIRCUMFERENCE / 360.0;

/// Latitude reported when planar input lies outside the valid domain.
pub const OUT_OF_BOUNDS_LAT: f64 = 89.9999;

/// Projection parameters, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    pub center_lon: f64,
    pub center_lat: f64,
    pub scale_x: f64,
    pub scale_z: f64,
    /// Re-centering offset from external world metadata.
    pub reference_center: Option<PlanarPosition>,
    /// Floor projected x/z to whole blocks.
    pub integer_blocks: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            center_lon: 0.0,
            center_lat: 0.0,
            scale_x: 1.0,
            scale_z: 1.0,
            reference_center: None,
            integer_blocks: true,
        }
    }
}

impl ProjectionConfig {
    /// Planar x/z → geo fix.
    ///
    /// Positions beyond the poles or the 180th meridian yield the
    /// informational fix `{lat: 89.9999, lon: 0}` instead of an error.
    /// A reference center subtracted by `to_planar` is added back before
    /// the bounds check.
    pub fn to_geo(&self, x: f64, z: f64) -> GeoFix {
        let mut lon = x * self.scale_x / METERS_PER_DEGREE + self.center_lon;
        let mut lat = z * self.scale_z / METERS_PER_DEGREE + self.center_lat;
        if let Some(reference) = &self.reference_center {
            lon += reference.x;
            lat += reference.z;
        }

        if !(lon > -180.0 && lon < 180.0) || !(lat > -90.0 && lat < 90.0) {
            return out_of_bounds_fix();
        }
        GeoFix::new(lat, lon, FixSource::Projection)
    }

    /// Geo fix → planar x/z. `y` is left at zero for the terrain to fill in.
    ///
    /// With a reference center, its x/z are subtracted from lon/lat before
    /// projecting; the caller adds the vertical offset from its y.
    pub fn to_planar(&self, fix: &GeoFix) -> PlanarPosition {
        let (mut lon, mut lat) = (fix.lon, fix.lat);
        if let Some(reference) = &self.reference_center {
            lon -= reference.x;
            lat -= reference.z;
        }

        let mut x = (lon - self.center_lon) * METERS_PER_DEGREE / self.scale_x;
        let mut z = (lat - self.center_lat) * METERS_PER_DEGREE / self.scale_z;
        if self.integer_blocks {
            x = x.floor();
            z = z.floor();
        }
        PlanarPosition::new(x, 0.0, z)
    }

    /// Vertical offset the caller adds on top of the ground height.
    pub fn vertical_offset(&self) -> f64 {
        self.reference_center.map(|r| r.y).unwrap_or(0.0)
    }
}

fn out_of_bounds_fix() -> GeoFix {
    GeoFix::new(OUT_OF_BOUNDS_LAT, 0.0, FixSource::Projection)
}

/// Whether a fix is the out-of-bounds marker returned by `to_geo`.
pub fn is_out_of_bounds(fix: &GeoFix) -> bool {
    fix.source == FixSource::Projection && fix.lat == OUT_OF_BOUNDS_LAT && fix.lon == 0.0
}
