//! Thin asynchronous client for an OSRM-compatible `table` service.
//!
//! Lookups are best-effort: one attempt, bounded by the configured timeout,
//! and every failure collapses to `None` so callers fall back to the
//! centroid estimate.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{Coordinate, Km};

const USER_AGENT: &str = "cart-optimizer/0.1.0";

#[derive(Debug, Deserialize)]
struct TableResponse {
    /// Pairwise distances in meters
    distances: Option<Vec<Vec<f64>>>,
}

#[derive(Clone, Debug)]
pub struct RoutingClient {
    http: Client,
    base_url: Option<String>,
}

impl RoutingClient {
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config
                .base_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Table URL for the points, `None` when unconfigured or there is nothing to route
    pub fn table_url(&self, points: &[Coordinate]) -> Option<String> {
        let base = self.base_url.as_deref()?;
        if points.is_empty() {
            return None;
        }
        let coords = points
            .iter()
            .map(|p| format!("{},{}", p.lon, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        Some(format!(
            "{base}/table/v1/driving/{coords}?annotations=distance"
        ))
    }

    /// Pairwise travel distances in kilometers, keyed by input order
    pub async fn distance_matrix_km(&self, points: &[Coordinate]) -> Option<Vec<Vec<Km>>> {
        let url = self.table_url(points)?;
        debug!(points = points.len(), "requesting routed distance matrix");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "routing request failed, using centroid distance");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "routing service returned an error, using centroid distance");
            return None;
        }

        let table = match response.json::<TableResponse>().await {
            Ok(table) => table,
            Err(error) => {
                warn!(%error, "unreadable routing response, using centroid distance");
                return None;
            }
        };

        let Some(distances) = table.distances else {
            warn!("routing response has no distances, using centroid distance");
            return None;
        };

        Some(
            distances
                .into_iter()
                .map(|row| row.into_iter().map(|meters| meters / 1000.0).collect())
                .collect(),
        )
    }
}
