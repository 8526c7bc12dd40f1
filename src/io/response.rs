//! Hand-written `Serialize` for the four stat-response shapes. A derive
//! doesn't fit: each request kind has its own success payload, but they
//! all share the same `error_message: "not found"` failure shape, so
//! the variant tag itself must stay invisible on the wire (`spec.md`
//! §6).

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single route leg on the wire: `{type: "Wait", ...}` or `{type:
/// "Bus", ...}`. Carries names, not ids — the orchestrator resolves
/// `StopId`/`BusId` back to names when it builds this from an
/// [`crate::router::Itinerary`], since the response layer has no
/// catalogue access of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: u32, time: f64 },
}

impl Serialize for RouteItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RouteItem::Wait { stop_name, time } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "Wait")?;
                map.serialize_entry("stop_name", stop_name)?;
                map.serialize_entry("time", time)?;
                map.end()
            }
            RouteItem::Bus {
                bus,
                span_count,
                time,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "Bus")?;
                map.serialize_entry("bus", bus)?;
                map.serialize_entry("span_count", span_count)?;
                map.serialize_entry("time", time)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatResponse {
    Stop {
        request_id: u64,
        buses: Vec<String>,
    },
    Bus {
        request_id: u64,
        curvature: f64,
        route_length: f64,
        stop_count: usize,
        unique_stop_count: usize,
    },
    Map {
        request_id: u64,
        map: String,
    },
    Route {
        request_id: u64,
        total_time: f64,
        items: Vec<RouteItem>,
    },
    NotFound {
        request_id: u64,
    },
}

impl Serialize for StatResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatResponse::Stop { request_id, buses } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("request_id", request_id)?;
                map.serialize_entry("buses", buses)?;
                map.end()
            }
            StatResponse::Bus {
                request_id,
                curvature,
                route_length,
                stop_count,
                unique_stop_count,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("request_id", request_id)?;
                map.serialize_entry("curvature", curvature)?;
                map.serialize_entry("route_length", route_length)?;
                map.serialize_entry("stop_count", stop_count)?;
                map.serialize_entry("unique_stop_count", unique_stop_count)?;
                map.end()
            }
            StatResponse::Map { request_id, map: svg } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("request_id", request_id)?;
                map.serialize_entry("map", svg)?;
                map.end()
            }
            StatResponse::Route {
                request_id,
                total_time,
                items,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("request_id", request_id)?;
                map.serialize_entry("total_time", total_time)?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            StatResponse::NotFound { request_id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("request_id", request_id)?;
                map.serialize_entry("error_message", "not found")?;
                map.end()
            }
        }
    }
}
