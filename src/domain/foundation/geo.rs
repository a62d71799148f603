//! Geographic coordinates and distance.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Mean earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::invalid_format(
                "lat",
                "latitude must be between -90 and 90",
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::invalid_format(
                "lng",
                "longitude must be between -180 and 180",
            ));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance using the haversine formula.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(52.52, 13.405).unwrap();
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn berlin_to_paris_is_about_878_km() {
        let berlin = GeoPoint::new(52.5200, 13.4050).unwrap();
        let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
        let d = berlin.distance_km(&paris);
        assert!((d - 878.0).abs() < 5.0, "got {}", d);
        assert!((d - paris.distance_km(&berlin)).abs() < 1e-9);
    }
}
