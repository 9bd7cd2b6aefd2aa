use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius used for every great-circle distance in the crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// WGS84 position in floating point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Return `self` when valid, otherwise an [`Error::InvalidCoordinate`].
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Great-circle distance in meters to another coordinate.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(*self, *other)
    }

    /// Position on the unit sphere. Chord length between two such vectors is
    /// monotone in great-circle distance.
    pub fn to_unit_vector(&self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = String;

    /// Parse `"lat,lng"`. Range checks are left to [`Coordinate::validated`].
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| format!("expected 'lat,lng', got '{value}'"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude '{}'", lng.trim()))?;
        Ok(Coordinate::new(lat, lng))
    }
}

/// Haversine great-circle distance in meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.lng - a.lng).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn haversine_matches_known_distance() {
        // One degree of latitude along a meridian.
        let a = Coordinate::new(49.0, 13.0);
        let b = Coordinate::new(50.0, 13.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert_relative_eq!(haversine_distance(a, b), expected, epsilon = 1e-6);
    }

    #[test]
    fn haversine_is_symmetric_and_zero_on_identity() {
        let a = Coordinate::new(49.7477, 13.3775);
        let b = Coordinate::new(49.7413, 13.3764);
        assert_relative_eq!(a.distance_to(&b), b.distance_to(&a));
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn parses_lat_lng_pairs() {
        let parsed: Coordinate = "49.7477, 13.3775".parse().unwrap();
        assert_eq!(parsed, Coordinate::new(49.7477, 13.3775));
        assert!("49.7".parse::<Coordinate>().is_err());
        assert!("abc,13.0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn out_of_range_pairs_parse_but_fail_validation() {
        let parsed: Coordinate = "91.0,13.0".parse().unwrap();
        assert_eq!(parsed, Coordinate::new(91.0, 13.0));
        assert!(!parsed.is_valid());
        let error = parsed.validated().unwrap_err();
        assert!(matches!(error, Error::InvalidCoordinate { lat, .. } if lat == 91.0));
    }

    #[test]
    fn validated_rejects_non_finite() {
        let error = Coordinate::new(f64::NAN, 0.0).validated().unwrap_err();
        assert!(matches!(error, Error::InvalidCoordinate { .. }));
    }

    #[test]
    fn unit_vector_has_unit_length() {
        let [x, y, z] = Coordinate::new(49.7477, 13.3775).to_unit_vector();
        assert_relative_eq!((x * x + y * y + z * z).sqrt(), 1.0, epsilon = 1e-12);
    }
}
