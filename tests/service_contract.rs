// Integration tests for the JSON request handler
use cart_optimizer::service::{handle_request, OptimizeRequest, OptimizeResponse};
use cart_optimizer::GreedyPlanner;
use serde_json::Value;

const ITEMS: &str = r#"[
    {
        "productId": "espresso",
        "quantity": 2,
        "candidateStores": [
            {"storeId": "bar-centrale", "storeLatLon": {"lat": 45.4642, "lon": 9.1900}, "price": 2.40},
            {"storeId": "torrefazione", "storeLatLon": {"lat": 45.4700, "lon": 9.2000}, "price": 2.10}
        ]
    },
    {
        "productId": "cornetto",
        "quantity": 1,
        "candidateStores": [
            {"storeId": "bar-centrale", "storeLatLon": {"lat": 45.4642, "lon": 9.1900}, "price": 1.30}
        ]
    },
    {"productId": "panettone", "quantity": 1, "candidateStores": []}
]"#;

fn request(slider: i32) -> OptimizeRequest {
    serde_json::from_value(serde_json::json!({
        "cartId": "cart-42",
        "userLat": 45.4642,
        "userLon": 9.1900,
        "slider": slider,
    }))
    .unwrap()
}

#[test]
fn test_handler_returns_three_plans() {
    let response = handle_request(&GreedyPlanner::default(), &request(5), ITEMS);
    let json = serde_json::to_value(&response).unwrap();

    let plans = json["plans"].as_array().unwrap();
    let kinds: Vec<&str> = plans.iter().map(|p| p["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["cheapest", "balanced", "single_store"]);

    assert_eq!(plans[0]["assignments"]["espresso"], "torrefazione");
    assert_eq!(plans[0]["assignments"]["cornetto"], "bar-centrale");
    assert_eq!(plans[0]["storesUsed"], 2);
    assert!(plans[0]["assignments"].get("panettone").is_none());
    assert_eq!(plans[0]["omitted"], serde_json::json!(["panettone"]));

    // Single-store candidates are ranked on what they buy: torrefazione only
    // sells espresso, which undercuts bar-centrale's two-item basket
    assert_eq!(plans[2]["storesUsed"], 1);
    assert_eq!(plans[2]["assignments"]["espresso"], "torrefazione");
    assert!(plans[2]["assignments"].get("cornetto").is_none());
    assert_eq!(plans[2]["omitted"], serde_json::json!(["cornetto", "panettone"]));
    assert!(plans[2]["kmEst"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_handler_reads_snake_case_cart_id() {
    let request: OptimizeRequest = serde_json::from_str(
        r#"{"cart_id":"c1","userLat":45.4642,"userLon":9.19,"slider":3}"#,
    )
    .unwrap();
    assert_eq!(request.cart_id, "c1");

    let response = handle_request(&GreedyPlanner::default(), &request, ITEMS);
    assert_eq!(response.plans().map(<[_]>::len), Some(3));
}

#[test]
fn test_handler_rejects_slider_without_plans() {
    for slider in [-1, 11] {
        let response = handle_request(&GreedyPlanner::default(), &request(slider), ITEMS);
        assert!(response.is_error());
        assert!(response.plans().is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("plans").is_none());
        assert!(json["error"].as_str().unwrap().contains("slider out of range"));
    }
}

#[test]
fn test_handler_reports_malformed_payload() {
    let response = handle_request(&GreedyPlanner::default(), &request(5), "{\"productId\": 1}");
    match response {
        OptimizeResponse::Error { error } => assert!(error.starts_with("malformed shopping list")),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn test_response_round_trips_through_json() {
    let response = handle_request(&GreedyPlanner::default(), &request(2), ITEMS);
    let text = serde_json::to_string(&response).unwrap();
    let parsed: OptimizeResponse = serde_json::from_str(&text).unwrap();
    let original = response.plans().unwrap();
    let restored = parsed.plans().unwrap();
    for (a, b) in original.iter().zip(restored) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.omitted, b.omitted);
        assert!((a.total - b.total).abs() < 1e-9);
    }

    let value: Value = serde_json::from_str(&text).unwrap();
    let balanced = &value["plans"][1];
    assert!(balanced["total"].as_f64().unwrap() >= balanced["rawTotal"].as_f64().unwrap());
}
