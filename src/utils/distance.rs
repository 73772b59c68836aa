// Distance calculation utilities

use geo::{Centroid, MultiPoint, Point};

use crate::models::{Coordinate, Km};

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates using the default Earth radius
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> Km {
    haversine_distance_with_radius(a, b, EARTH_RADIUS_KM)
}

/// Great-circle distance between two coordinates on a sphere of `radius_km`
pub fn haversine_distance_with_radius(a: Coordinate, b: Coordinate, radius_km: f64) -> Km {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lon = (d_lon / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lon * sin_d_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius_km * c
}

/// Arithmetic mean of the coordinates, `None` when there are none.
/// Only meaningful at metropolitan scale.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    let multi: MultiPoint<f64> = points.iter().map(|c| Point::from(*c)).collect();
    multi.centroid().map(Coordinate::from)
}

/// Distance from the user to the centroid of the stores, 0 when there are no stores
pub fn centroid_distance(user: Coordinate, stores: &[Coordinate]) -> Km {
    centroid_distance_with_radius(user, stores, EARTH_RADIUS_KM)
}

pub fn centroid_distance_with_radius(
    user: Coordinate,
    stores: &[Coordinate],
    radius_km: f64,
) -> Km {
    match centroid(stores) {
        Some(center) => haversine_distance_with_radius(user, center, radius_km),
        None => 0.0,
    }
}

/// Estimates how far the user travels to visit a set of stores
pub trait DistanceEstimator: Send + Sync {
    fn estimate_km(&self, user: Coordinate, stores: &[Coordinate]) -> Km;
}

/// Default estimator: haversine distance from the user to the store centroid
#[derive(Debug, Clone, Copy)]
pub struct CentroidEstimator {
    pub earth_radius_km: f64,
}

impl Default for CentroidEstimator {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl DistanceEstimator for CentroidEstimator {
    fn estimate_km(&self, user: Coordinate, stores: &[Coordinate]) -> Km {
        centroid_distance_with_radius(user, stores, self.earth_radius_km)
    }
}

/// Estimator backed by a routed distance matrix.
///
/// Index 0 of the matrix is the user, indices `1..` are the known stores in
/// the order given at construction. The estimate for a store set is the mean
/// routed user -> store distance. Any store missing from the matrix, or a
/// non-finite cell, sends that call to the centroid fallback.
#[derive(Debug, Clone)]
pub struct RoutedEstimator {
    user: Coordinate,
    stores: Vec<Coordinate>,
    matrix_km: Vec<Vec<Km>>,
    fallback: CentroidEstimator,
}

impl RoutedEstimator {
    /// Returns `None` if the matrix is not square over `[user, stores...]`
    pub fn new(
        user: Coordinate,
        stores: Vec<Coordinate>,
        matrix_km: Vec<Vec<Km>>,
        fallback: CentroidEstimator,
    ) -> Option<Self> {
        let n = stores.len() + 1;
        if matrix_km.len() != n || matrix_km.iter().any(|row| row.len() != n) {
            return None;
        }
        Some(Self {
            user,
            stores,
            matrix_km,
            fallback,
        })
    }

    fn routed_km(&self, store: &Coordinate) -> Option<Km> {
        let index = self.stores.iter().position(|s| s == store)? + 1;
        let km = self.matrix_km[0][index];
        km.is_finite().then_some(km)
    }
}

impl DistanceEstimator for RoutedEstimator {
    fn estimate_km(&self, user: Coordinate, stores: &[Coordinate]) -> Km {
        if stores.is_empty() {
            return 0.0;
        }
        if user != self.user {
            return self.fallback.estimate_km(user, stores);
        }

        let routed: Option<Vec<Km>> = stores.iter().map(|s| self.routed_km(s)).collect();
        match routed {
            Some(legs) => legs.iter().sum::<Km>() / legs.len() as f64,
            None => self.fallback.estimate_km(user, stores),
        }
    }
}
