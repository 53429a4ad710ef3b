/// Geographic position in degrees, GeoJSON axis order (longitude first).
///
/// No altitude: every prefecture outline lies on the reference surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPosition {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPosition {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn lon_rad(self) -> f64 {
        self.lon_deg.to_radians()
    }

    pub fn lat_rad(self) -> f64 {
        self.lat_deg.to_radians()
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

/// Rough geographic envelope of the Japanese archipelago, in degrees.
pub const JAPAN_LON_RANGE: (f64, f64) = (122.0, 154.0);
pub const JAPAN_LAT_RANGE: (f64, f64) = (20.0, 46.0);

#[cfg(test)]
mod tests {
    use super::GeoPosition;

    #[test]
    fn radians_follow_degrees() {
        let p = GeoPosition::new(180.0, 90.0);
        assert_eq!(p.lon_rad(), std::f64::consts::PI);
        assert_eq!(p.lat_rad(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(!GeoPosition::new(f64::NAN, 35.0).is_finite());
        assert!(GeoPosition::new(139.7, 35.7).is_finite());
    }
}
