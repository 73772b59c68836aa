//! Request/response contract around the optimizer.
//!
//! Callers hand over the user position and slider plus the already-resolved
//! shopping list as JSON. Any failure becomes `{ "error": .. }`; plans are
//! only ever returned all together.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::algorithms::greedy::GreedyPlanner;
use crate::algorithms::{validate_slider, PlanSolver};
use crate::config::OptimizerConfig;
use crate::error::ServiceError;
use crate::models::{Coordinate, Plan, ShoppingList};
use crate::utils::distance::{CentroidEstimator, RoutedEstimator};
use crate::utils::routing::RoutingClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    #[serde(rename = "cart_id", alias = "cartId", default)]
    pub cart_id: String,
    pub user_lat: f64,
    pub user_lon: f64,
    /// 0..=10
    pub slider: i32,
}

impl OptimizeRequest {
    pub fn user(&self) -> Coordinate {
        Coordinate::new(self.user_lat, self.user_lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptimizeResponse {
    Plans { plans: Vec<Plan> },
    Error { error: String },
}

impl OptimizeResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, OptimizeResponse::Error { .. })
    }

    pub fn plans(&self) -> Option<&[Plan]> {
        match self {
            OptimizeResponse::Plans { plans } => Some(plans),
            OptimizeResponse::Error { .. } => None,
        }
    }
}

impl From<Result<Vec<Plan>, ServiceError>> for OptimizeResponse {
    fn from(result: Result<Vec<Plan>, ServiceError>) -> Self {
        match result {
            Ok(plans) => OptimizeResponse::Plans { plans },
            Err(error) => OptimizeResponse::Error {
                error: error.to_string(),
            },
        }
    }
}

/// Parses the shopping list payload, a JSON array of items
pub fn parse_shopping_list(items_json: &str) -> Result<ShoppingList, ServiceError> {
    Ok(serde_json::from_str(items_json)?)
}

/// Validates, parses and optimizes in that order
pub fn try_handle<S: PlanSolver>(
    solver: &S,
    request: &OptimizeRequest,
    items_json: &str,
) -> Result<Vec<Plan>, ServiceError> {
    validate_slider(request.slider)?;
    let shopping_list = parse_shopping_list(items_json)?;
    Ok(solver.optimize(&shopping_list, request.user(), request.slider)?)
}

pub fn handle_request<S: PlanSolver>(
    solver: &S,
    request: &OptimizeRequest,
    items_json: &str,
) -> OptimizeResponse {
    let result = try_handle(solver, request, items_json);
    if let Err(error) = &result {
        warn!(cart_id = %request.cart_id, %error, "optimize request rejected");
    }
    result.into()
}

/// Like [`handle_request`], but first asks the routing service for a distance
/// matrix over the user and every candidate store. Without one the centroid
/// estimate is used.
pub async fn handle_request_routed(
    config: &OptimizerConfig,
    client: &RoutingClient,
    request: &OptimizeRequest,
    items_json: &str,
) -> OptimizeResponse {
    let result = try_handle_routed(config, client, request, items_json).await;
    if let Err(error) = &result {
        warn!(cart_id = %request.cart_id, %error, "optimize request rejected");
    }
    result.into()
}

async fn try_handle_routed(
    config: &OptimizerConfig,
    client: &RoutingClient,
    request: &OptimizeRequest,
    items_json: &str,
) -> Result<Vec<Plan>, ServiceError> {
    validate_slider(request.slider)?;
    let shopping_list = parse_shopping_list(items_json)?;
    let planner = routed_planner(config, client, &shopping_list, request.user()).await;
    Ok(planner.optimize(&shopping_list, request.user(), request.slider)?)
}

async fn routed_planner(
    config: &OptimizerConfig,
    client: &RoutingClient,
    shopping_list: &ShoppingList,
    user: Coordinate,
) -> GreedyPlanner {
    let fallback = CentroidEstimator {
        earth_radius_km: config.earth_radius_km,
    };
    let stores = shopping_list.store_locations();
    if stores.is_empty() || !client.is_configured() {
        return GreedyPlanner::with_estimator(config.clone(), fallback);
    }

    let mut points = Vec::with_capacity(stores.len() + 1);
    points.push(user);
    points.extend(stores.iter().copied());

    let routed = client
        .distance_matrix_km(&points)
        .await
        .and_then(|matrix| RoutedEstimator::new(user, stores, matrix, fallback));

    match routed {
        Some(estimator) => {
            info!(points = points.len(), "using routed distances");
            GreedyPlanner::with_estimator(config.clone(), estimator)
        }
        None => GreedyPlanner::with_estimator(config.clone(), fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(slider: i32) -> OptimizeRequest {
        OptimizeRequest {
            cart_id: "cart-1".into(),
            user_lat: 0.0,
            user_lon: 0.0,
            slider,
        }
    }

    #[test]
    fn test_request_wire_names() {
        let json = r#"{"cart_id":"c1","userLat":1.0,"userLon":2.0,"slider":4}"#;
        let parsed: OptimizeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cart_id, "c1");
        assert_eq!(parsed.user(), Coordinate::new(1.0, 2.0));

        let json = r#"{"cartId":"c9","userLat":1.0,"userLon":2.0,"slider":4}"#;
        let parsed: OptimizeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cart_id, "c9");

        let json = r#"{"userLat":1.0,"userLon":2.0,"slider":4}"#;
        let parsed: OptimizeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.cart_id, "");

        let written = serde_json::to_value(&parsed).unwrap();
        assert!(written.get("cart_id").is_some());
    }

    #[test]
    fn test_slider_checked_before_payload() {
        let response = handle_request(&GreedyPlanner::default(), &request(12), "not json");
        match response {
            OptimizeResponse::Error { error } => assert!(error.contains("slider out of range")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_payload() {
        let result = try_handle(&GreedyPlanner::default(), &request(5), "[{\"quantity\": 1}");
        assert!(matches!(result, Err(ServiceError::MalformedPayload(_))));
    }

    #[test]
    fn test_duplicate_products_become_error_response() {
        let items = r#"[
            {"productId":"milk","candidateStores":[{"storeId":"A","storeLatLon":{"lat":0.0,"lon":0.0},"price":1.0}]},
            {"productId":"milk","candidateStores":[{"storeId":"B","storeLatLon":{"lat":0.0,"lon":0.0},"price":0.9}]}
        ]"#;
        let response = handle_request(&GreedyPlanner::default(), &request(5), items);

        assert!(response.plans().is_none());
        match response {
            OptimizeResponse::Error { error } => assert!(error.contains("milk")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = handle_request(&GreedyPlanner::default(), &request(0), "[]");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["plans"].as_array().unwrap().len(), 3);
        assert!(json.get("error").is_none());

        let error = OptimizeResponse::Error {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_string(&error).unwrap(), r#"{"error":"boom"}"#);
    }
}
