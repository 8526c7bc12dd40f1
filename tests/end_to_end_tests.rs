//! Full envelope-in, response-out round trips through the public API,
//! covering the end-to-end scenarios of `spec.md` §8.

use transit_catalogue::io::{Envelope, StatRequest, StatResponse};
use transit_catalogue::orchestrator::Orchestrator;

fn build(envelope: serde_json::Value) -> Orchestrator {
    let envelope: Envelope = serde_json::from_value(envelope).unwrap();
    Orchestrator::build(envelope).unwrap()
}

fn scenario_envelope() -> serde_json::Value {
    serde_json::json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {"B": 1000.0}},
            {"type": "Stop", "name": "B", "latitude": 55.0, "longitude": 37.01, "road_distances": {}},
            {"type": "Bus", "name": "1", "is_roundtrip": true, "stops": ["A", "B", "A"]}
        ],
        "render_settings": {},
        "routing_settings": {"bus_wait_time": 6.0, "bus_velocity": 40.0},
        "stat_requests": []
    })
}

#[test]
fn scenario_s1_round_bus_stats() {
    let orchestrator = build(scenario_envelope());
    let response = orchestrator.handle(StatRequest::Bus {
        id: 1,
        name: "1".to_string(),
    });
    let StatResponse::Bus {
        stop_count,
        unique_stop_count,
        route_length,
        curvature,
        ..
    } = response
    else {
        panic!("expected a bus response");
    };
    assert_eq!(stop_count, 3);
    assert_eq!(unique_stop_count, 2);
    assert_eq!(route_length, 2000.0);
    assert!(curvature >= 1.0);
}

#[test]
fn scenario_s2_direct_bus_asymmetric_distances() {
    let envelope = serde_json::json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {"B": 1500.0}},
            {"type": "Stop", "name": "B", "latitude": 55.0, "longitude": 37.01, "road_distances": {"A": 1800.0}},
            {"type": "Bus", "name": "2", "is_roundtrip": false, "stops": ["A", "B"]}
        ],
        "render_settings": {},
        "routing_settings": {},
        "stat_requests": []
    });
    let orchestrator = build(envelope);
    let response = orchestrator.handle(StatRequest::Bus {
        id: 1,
        name: "2".to_string(),
    });
    let StatResponse::Bus {
        stop_count,
        unique_stop_count,
        route_length,
        ..
    } = response
    else {
        panic!("expected a bus response");
    };
    assert_eq!(stop_count, 3);
    assert_eq!(unique_stop_count, 2);
    assert_eq!(route_length, 3300.0);
}

#[test]
fn scenario_s3_route_wait_then_bus() {
    let envelope = serde_json::json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0, "road_distances": {"B": 1500.0}},
            {"type": "Stop", "name": "B", "latitude": 55.0, "longitude": 37.01, "road_distances": {"A": 1800.0}},
            {"type": "Bus", "name": "2", "is_roundtrip": false, "stops": ["A", "B"]}
        ],
        "render_settings": {},
        "routing_settings": {"bus_wait_time": 6.0, "bus_velocity": 40.0},
        "stat_requests": []
    });
    let orchestrator = build(envelope);
    let response = orchestrator.handle(StatRequest::Route {
        id: 1,
        from: "A".to_string(),
        to: "B".to_string(),
    });
    let StatResponse::Route {
        total_time, items, ..
    } = response
    else {
        panic!("expected a route response");
    };
    assert!((total_time - 8.25).abs() < 1e-9);
    assert_eq!(items.len(), 2);
}

#[test]
fn scenario_s4_disconnected_stops_report_not_found() {
    let envelope = serde_json::json!({
        "base_requests": [
            {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0, "road_distances": {}},
            {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 1.0, "road_distances": {}}
        ],
        "render_settings": {},
        "routing_settings": {},
        "stat_requests": []
    });
    let orchestrator = build(envelope);
    let response = orchestrator.handle(StatRequest::Route {
        id: 9,
        from: "A".to_string(),
        to: "B".to_string(),
    });
    assert_eq!(response, StatResponse::NotFound { request_id: 9 });
}

#[test]
fn scenario_s5_map_response_is_non_empty_svg() {
    let orchestrator = build(scenario_envelope());
    let response = orchestrator.handle(StatRequest::Map { id: 1 });
    let StatResponse::Map { map, .. } = response else {
        panic!("expected a map response");
    };
    assert!(map.starts_with("<?xml"));
    assert_eq!(map.matches("<polyline").count(), 1);
    assert_eq!(map.matches("<circle").count(), 2);
}

#[test]
fn scenario_s6_stop_query_known_and_unknown() {
    let orchestrator = build(scenario_envelope());
    let known = orchestrator.handle(StatRequest::Stop {
        id: 1,
        name: "A".to_string(),
    });
    assert_eq!(
        known,
        StatResponse::Stop {
            request_id: 1,
            buses: vec!["1".to_string()],
        }
    );

    let unknown = orchestrator.handle(StatRequest::Stop {
        id: 2,
        name: "C".to_string(),
    });
    assert_eq!(unknown, StatResponse::NotFound { request_id: 2 });
}

#[test]
fn full_envelope_round_trip_serializes_to_expected_shape() {
    let mut envelope_json = scenario_envelope();
    envelope_json["stat_requests"] = serde_json::json!([
        {"id": 1, "type": "Bus", "name": "1"},
        {"id": 2, "type": "Stop", "name": "nonexistent"}
    ]);
    let envelope: Envelope = serde_json::from_value(envelope_json).unwrap();
    let stat_requests = envelope.stat_requests.clone();
    let orchestrator = Orchestrator::build(envelope).unwrap();
    let responses: Vec<StatResponse> = stat_requests
        .into_iter()
        .map(|r| orchestrator.handle(r))
        .collect();

    let serialized = serde_json::to_value(&responses).unwrap();
    assert_eq!(serialized[0]["request_id"], 1);
    assert!(serialized[0].get("route_length").is_some());
    assert_eq!(serialized[1]["error_message"], "not found");
}
