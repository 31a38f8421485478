// src/services/distance.rs
// DOCUMENTATION: Great-circle distance
// PURPOSE: Haversine distance in meters, used by the coordinate matcher

use geo_types::Point;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two coordinates in meters
/// Uses Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + (lat1.to_radians().cos()) * (lat2.to_radians().cos()) * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance between two points (x = longitude, y = latitude), in meters
pub fn distance_between(from: Point<f64>, to: Point<f64>) -> f64 {
    haversine_distance(from.y(), from.x(), to.y(), to.x())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_for_identical_points() {
        assert_eq!(haversine_distance(51.5, -0.1, 51.5, -0.1), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        let ba = haversine_distance(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_london_to_paris() {
        let d = haversine_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 343_500.0).abs() < 2_000.0, "Expected ~343.5km, got {d}m");
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_along_meridian() {
        let near = haversine_distance(51.5, -0.1, 51.501, -0.1);
        let far = haversine_distance(51.5, -0.1, 51.51, -0.1);
        assert!(near < far);
    }

    #[test]
    fn test_point_overload_matches() {
        let a = Point::new(-0.1278, 51.5074);
        let b = Point::new(2.3522, 48.8566);
        assert_eq!(
            distance_between(a, b),
            haversine_distance(51.5074, -0.1278, 48.8566, 2.3522)
        );
    }
}
