//! Lifts a [`Catalogue`] into a directed weighted graph encoding
//! boarding delay and per-ride travel time, per `spec.md` §4.4.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

use crate::catalogue::{BusId, Catalogue, RouteKind, StopId};
use crate::error::Result;

/// Minutes-per-km-per-hour conversion factor (km/h -> m/min).
const KM_PER_HOUR_TO_METERS_PER_MINUTE: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
pub struct RoutingSettings {
    pub bus_wait_time: f64,
    pub bus_velocity: f64,
}

/// What a traversed edge actually means, decoded back into a leg by
/// the router. `Wait` has no bus — that absence is how the router
/// tells a boarding delay apart from a ride.
#[derive(Debug, Clone, Copy)]
pub enum EdgePayload {
    Wait {
        stop: StopId,
    },
    Ride {
        bus: BusId,
        from: StopId,
        to: StopId,
        span_count: u32,
        time: f64,
    },
}

impl EdgePayload {
    pub fn time(&self) -> f64 {
        match self {
            EdgePayload::Wait { .. } => 0.0, // weight lives on the edge itself
            EdgePayload::Ride { time, .. } => *time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub(crate) struct EdgeWeight(pub f64);

#[derive(Debug, Clone, Copy)]
pub(crate) struct StopVertices {
    pub arrive: NodeIndex,
    pub board: NodeIndex,
}

pub struct TransitGraph {
    pub(crate) graph: DiGraph<(), EdgeWeight>,
    pub(crate) stop_vertices: HashMap<StopId, StopVertices>,
    pub(crate) edge_payload: HashMap<EdgeIndex, EdgePayload>,
}

impl TransitGraph {
    pub fn build(catalogue: &Catalogue, settings: &RoutingSettings) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut stop_vertices = HashMap::new();

        for (stop_id, _) in catalogue.stops() {
            let arrive = graph.add_node(());
            let board = graph.add_node(());
            stop_vertices.insert(stop_id, StopVertices { arrive, board });
        }

        let mut edge_payload = HashMap::new();
        for (&stop_id, vertices) in &stop_vertices {
            let edge = graph.add_edge(vertices.arrive, vertices.board, EdgeWeight(settings.bus_wait_time));
            edge_payload.insert(edge, EdgePayload::Wait { stop: stop_id });
        }

        // (from board vertex, to arrive vertex) -> best proposal so far.
        let mut best: HashMap<(NodeIndex, NodeIndex), (f64, EdgePayload)> = HashMap::new();
        for (bus_id, bus) in catalogue.buses() {
            propose_ride_edges(
                catalogue,
                bus_id,
                &bus.logical_traversal(),
                settings,
                &stop_vertices,
                &mut best,
            )?;
        }

        for ((from, to), (time, payload)) in best {
            let edge = graph.add_edge(from, to, EdgeWeight(time));
            edge_payload.insert(edge, payload);
        }

        Ok(Self {
            graph,
            stop_vertices,
            edge_payload,
        })
    }

    pub fn vertices_for(&self, stop: StopId) -> Option<StopVertices> {
        self.stop_vertices.get(&stop).copied()
    }

    pub fn arrive_vertex(&self, stop: StopId) -> Option<NodeIndex> {
        self.stop_vertices.get(&stop).map(|v| v.arrive)
    }

    pub fn board_vertex(&self, stop: StopId) -> Option<NodeIndex> {
        self.stop_vertices.get(&stop).map(|v| v.board)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(from, to)
    }

    pub fn edge_weight(&self, edge: EdgeIndex) -> f64 {
        self.graph[edge].0
    }
}

/// Over a bus's logical traversal (for `Direct` buses this is already
/// the out-and-back palindrome, so a single pass covers both
/// directions), proposes a ride edge for every ordered pair `(i, j)`
/// with `i < j`, accumulating road distance stepwise and converting it
/// to minutes. Pairs where `stop_i` and `stop_j` are the same physical
/// stop are skipped — a bus passing back through its own start (every
/// `Round` loop, every `Direct` bus at its pivot) never offers a
/// same-stop ride, matching `CreateTransportGraphData`'s
/// `if (stop_from != stop_to)` guard in the original. Only the
/// cheapest proposal per `(from, to)` vertex pair survives, across all
/// buses (`spec.md` §3 "Between the same (from,to) ... keep the edge
/// with the minimum weight").
fn propose_ride_edges(
    catalogue: &Catalogue,
    bus_id: BusId,
    traversal: &[StopId],
    settings: &RoutingSettings,
    stop_vertices: &HashMap<StopId, StopVertices>,
    best: &mut HashMap<(NodeIndex, NodeIndex), (f64, EdgePayload)>,
) -> Result<()> {
    for (i, &stop_i) in traversal.iter().enumerate() {
        let mut distance = 0.0;
        let mut previous = stop_i;
        for (span, &stop_j) in traversal.iter().enumerate().skip(i + 1) {
            let leg = catalogue
                .get_distance(previous, stop_j)
                .ok_or_else(|| unknown_distance(catalogue, previous, stop_j))?;
            distance += leg;
            previous = stop_j;

            if stop_i == stop_j {
                continue;
            }

            let span_count = (span - i) as u32;
            let time = distance / (settings.bus_velocity * KM_PER_HOUR_TO_METERS_PER_MINUTE);

            let from = stop_vertices[&stop_i].board;
            let to = stop_vertices[&stop_j].arrive;
            let payload = EdgePayload::Ride {
                bus: bus_id,
                from: stop_i,
                to: stop_j,
                span_count,
                time,
            };

            best.entry((from, to))
                .and_modify(|(best_time, best_payload)| {
                    if time < *best_time {
                        *best_time = time;
                        *best_payload = payload;
                    }
                })
                .or_insert((time, payload));
        }
    }
    Ok(())
}

fn unknown_distance(catalogue: &Catalogue, a: StopId, b: StopId) -> crate::error::Error {
    crate::error::Error::UnknownDistance(
        catalogue.stop(a).name.to_string(),
        catalogue.stop(b).name.to_string(),
    )
}
