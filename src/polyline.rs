//! Decoded route geometry.
//!
//! Routes carry their overview geometry in the encoded polyline format and
//! the planner passes it through untouched. Decoding is only needed when a
//! provider omits a leg's start or end location.

use serde::{Deserialize, Serialize};

use crate::route::LatLng;

/// Precision of the Google/OSRM polyline format.
const PRECISION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<LatLng>,
}

impl Polyline {
    pub fn decode(encoded: &str) -> Result<Self, String> {
        let line = ::polyline::decode_polyline(encoded, PRECISION).map_err(|e| e.to_string())?;
        let points = line
            .coords()
            .map(|coord| LatLng::new(coord.y, coord.x))
            .collect();
        Ok(Self { points })
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn first(&self) -> Option<LatLng> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<LatLng> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ENCODED: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_decode_reference_polyline() {
        let polyline = Polyline::decode(ENCODED).unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(polyline.points().len(), expected.len());
        for (point, (lat, lng)) in polyline.points().iter().zip(expected) {
            assert_relative_eq!(point.lat, lat, epsilon = 1e-6);
            assert_relative_eq!(point.lng, lng, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_first_and_last() {
        let polyline = Polyline::decode(ENCODED).unwrap();
        assert_relative_eq!(polyline.first().unwrap().lat, 38.5, epsilon = 1e-6);
        assert_relative_eq!(polyline.last().unwrap().lng, -126.453, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_polyline() {
        let polyline = Polyline::decode("").unwrap();
        assert!(polyline.points().is_empty());
        assert_eq!(polyline.first(), None);
    }
}
