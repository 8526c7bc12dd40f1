//! Thin composition of catalogue, graph, router, and renderer behind a
//! single query entry point. See `spec.md` §4.6.

use std::cell::OnceCell;

use crate::catalogue::{Catalogue, RouteKind};
use crate::error::{Error, Result};
use crate::graph::{RoutingSettings, TransitGraph};
use crate::io::request::{BaseRequest, Envelope};
use crate::io::response::{RouteItem, StatResponse};
use crate::io::StatRequest;
use crate::render::{render_map, RenderSettings};
use crate::router::{Leg, Router};

/// Owns the catalogue for the lifetime of a single ingest-then-query
/// session, and lazily builds the two downstream products — the
/// transit graph and the rendered map — on first use. Neither is
/// rebuilt: both the graph and the map are treated as immutable once
/// built, per `spec.md` §5.
pub struct Orchestrator {
    catalogue: Catalogue,
    render_settings: RenderSettings,
    routing_settings: RoutingSettings,
    graph: OnceCell<TransitGraph>,
    rendered_map: OnceCell<String>,
}

impl Orchestrator {
    /// Ingests the base requests into a fresh catalogue. Fatal
    /// (`Err`) on any structural problem — an unknown stop referenced
    /// by a bus or a distance entry, or an invalid routing setting —
    /// since ingest failures are construction-time per `spec.md` §7.
    pub fn build(envelope: Envelope) -> Result<Self> {
        let mut catalogue = Catalogue::new();

        let mut pending_distances = Vec::new();
        for request in &envelope.base_requests {
            request.validate()?;
            if let BaseRequest::Stop {
                name,
                latitude,
                longitude,
                road_distances,
            } = request
            {
                catalogue.add_stop(name.clone(), crate::geo::Coordinate::new(*latitude, *longitude));
                for (neighbor, meters) in road_distances {
                    pending_distances.push((name.clone(), neighbor.clone(), *meters));
                }
            }
        }
        log::debug!("catalogue: {} stops ingested", catalogue.stop_count_total());

        for (from, to, meters) in pending_distances {
            catalogue.set_distance(&from, &to, meters)?;
        }

        for request in &envelope.base_requests {
            if let BaseRequest::Bus {
                name,
                is_roundtrip,
                stops,
            } = request
            {
                let bus = catalogue.add_bus(name.clone());
                catalogue.set_bus_route_type(
                    bus,
                    if *is_roundtrip {
                        RouteKind::Round
                    } else {
                        RouteKind::Direct
                    },
                );
                for stop_name in stops {
                    let stop_id = catalogue
                        .stop_id(stop_name)
                        .ok_or_else(|| Error::UnknownStop(stop_name.clone()))?;
                    catalogue.append_stop_to_bus(bus, stop_id);
                }
            }
        }

        let render_settings = envelope.render_settings.into_settings()?;
        let routing_settings = envelope.routing_settings.into_settings()?;

        Ok(Self {
            catalogue,
            render_settings,
            routing_settings,
            graph: OnceCell::new(),
            rendered_map: OnceCell::new(),
        })
    }

    fn graph(&self) -> Result<&TransitGraph> {
        if let Some(graph) = self.graph.get() {
            return Ok(graph);
        }
        let graph = TransitGraph::build(&self.catalogue, &self.routing_settings)?;
        log::debug!(
            "graph built: {} vertices, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(self.graph.get_or_init(|| graph))
    }

    fn rendered_map(&self) -> &str {
        if let Some(map) = self.rendered_map.get() {
            return map;
        }
        let map = render_map(&self.catalogue, &self.render_settings);
        log::debug!("map rendered: {} bytes", map.len());
        self.rendered_map.get_or_init(|| map)
    }

    /// Dispatches a single stat request, never propagating a
    /// query-level error to the caller — those become
    /// `StatResponse::NotFound` per `spec.md` §7.
    pub fn handle(&self, request: StatRequest) -> StatResponse {
        let request_id = request.id();
        match self.handle_inner(request) {
            Ok(response) => response,
            Err(_) => StatResponse::NotFound { request_id },
        }
    }

    fn handle_inner(&self, request: StatRequest) -> Result<StatResponse> {
        match request {
            StatRequest::Stop { id, name } => {
                let stop_id = self
                    .catalogue
                    .stop_id(&name)
                    .ok_or_else(|| Error::UnknownStop(name.clone()))?;
                let buses = self
                    .catalogue
                    .buses_at_stop(stop_id)?
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                Ok(StatResponse::Stop {
                    request_id: id,
                    buses,
                })
            }
            StatRequest::Bus { id, name } => {
                let bus_id = self
                    .catalogue
                    .bus_id(&name)
                    .ok_or_else(|| Error::UnknownBus(name.clone()))?;
                Ok(StatResponse::Bus {
                    request_id: id,
                    curvature: self.catalogue.curvature(bus_id)?,
                    route_length: self.catalogue.get_route_length(bus_id)?,
                    stop_count: self.catalogue.stop_count(bus_id)?,
                    unique_stop_count: self.catalogue.unique_stop_count(bus_id)?,
                })
            }
            StatRequest::Map { id } => Ok(StatResponse::Map {
                request_id: id,
                map: self.rendered_map().to_string(),
            }),
            StatRequest::Route { id, from, to } => {
                let from_id = self
                    .catalogue
                    .stop_id(&from)
                    .ok_or_else(|| Error::UnknownStop(from.clone()))?;
                let to_id = self
                    .catalogue
                    .stop_id(&to)
                    .ok_or_else(|| Error::UnknownStop(to.clone()))?;
                let graph = self.graph()?;
                let router = Router::new(graph);
                let itinerary = router.route(from_id, to_id)?;
                let items = itinerary
                    .legs
                    .into_iter()
                    .map(|leg| self.describe_leg(leg))
                    .collect();
                Ok(StatResponse::Route {
                    request_id: id,
                    total_time: itinerary.total_time,
                    items,
                })
            }
        }
    }

    fn describe_leg(&self, leg: Leg) -> RouteItem {
        match leg {
            Leg::Wait { stop, time } => RouteItem::Wait {
                stop_name: self.catalogue.stop(stop).name.to_string(),
                time,
            },
            Leg::Bus {
                bus,
                span_count,
                time,
            } => RouteItem::Bus {
                bus: self.catalogue.bus(bus).name.to_string(),
                span_count,
                time,
            },
        }
    }
}
