// Coordinate model representing a point on the Earth's surface

use geo::Point;
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a new coordinate from latitude and longitude
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// geo works in (x, y) = (lon, lat)
impl From<Coordinate> for Point<f64> {
    fn from(coord: Coordinate) -> Self {
        Point::new(coord.lon, coord.lat)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}
