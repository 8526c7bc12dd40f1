//! Single-source shortest-path over the transit graph, decoded back
//! into a human-readable multi-leg itinerary. See `spec.md` §4.5.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::catalogue::{BusId, StopId};
use crate::error::{Error, Result};
use crate::graph::{EdgePayload, TransitGraph};

#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    Wait {
        stop: StopId,
        time: f64,
    },
    Bus {
        bus: BusId,
        span_count: u32,
        time: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub total_time: f64,
    pub legs: Vec<Leg>,
}

pub struct Router<'a> {
    graph: &'a TransitGraph,
}

impl<'a> Router<'a> {
    pub fn new(graph: &'a TransitGraph) -> Self {
        Self { graph }
    }

    /// Shortest-time itinerary from `from` to `to`.
    ///
    /// `from == to` is a special case returning an empty leg list with
    /// zero total time, without touching the graph at all, per
    /// `spec.md` §4.5. An unreachable pair yields `Error::NotReachable`.
    pub fn route(&self, from: StopId, to: StopId) -> Result<Itinerary> {
        if from == to {
            return Ok(Itinerary {
                total_time: 0.0,
                legs: Vec::new(),
            });
        }

        let from_vertices = self
            .graph
            .vertices_for(from)
            .ok_or_else(|| Error::UnknownStop(String::new()))?;
        let to_vertices = self
            .graph
            .vertices_for(to)
            .ok_or_else(|| Error::UnknownStop(String::new()))?;

        let source = from_vertices.arrive;
        let target = to_vertices.arrive;
        let (distance, predecessor) = shortest_paths(self.graph, source, target);

        let Some(&total_time) = distance.get(&target) else {
            return Err(Error::NotReachable);
        };

        let mut edges = Vec::new();
        let mut current = target;
        while current != source {
            let Some(&edge) = predecessor.get(&current) else {
                break;
            };
            edges.push(edge);
            let (edge_source, _) = self.graph.graph.edge_endpoints(edge).expect("edge exists");
            current = edge_source;
        }
        edges.reverse();

        let legs = edges
            .into_iter()
            .map(|edge| decode_leg(self.graph, edge))
            .collect::<Result<Vec<_>>>()?;

        Ok(Itinerary { total_time, legs })
    }
}

fn decode_leg(graph: &TransitGraph, edge: EdgeIndex) -> Result<Leg> {
    match graph.edge_payload.get(&edge) {
        Some(EdgePayload::Wait { stop }) => Ok(Leg::Wait {
            stop: *stop,
            time: graph.graph[edge].0,
        }),
        Some(EdgePayload::Ride {
            bus,
            span_count,
            time,
            ..
        }) => Ok(Leg::Bus {
            bus: *bus,
            span_count: *span_count,
            time: *time,
        }),
        None => Err(Error::NotReachable),
    }
}

/// Min-heap ordering key over `f64` (which has no total order of its
/// own) — NaNs never appear here since all weights come from positive
/// travel times.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapKey(f64);

impl Eq for HeapKey {}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest key.
        other.0.total_cmp(&self.0)
    }
}

/// Dijkstra that also records a predecessor edge per vertex, so the
/// router can reconstruct the edge list — petgraph's own `dijkstra`
/// helper returns distances only.
fn shortest_paths(
    graph: &TransitGraph,
    source: NodeIndex,
    target: NodeIndex,
) -> (HashMap<NodeIndex, f64>, HashMap<NodeIndex, EdgeIndex>) {
    let mut distance = HashMap::new();
    let mut predecessor = HashMap::new();
    let mut heap = BinaryHeap::new();

    distance.insert(source, 0.0);
    heap.push((HeapKey(0.0), source));

    while let Some((HeapKey(cost), node)) = heap.pop() {
        if node == target {
            break;
        }
        if cost > *distance.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + edge.weight().0;
            if next_cost < *distance.get(&next).unwrap_or(&f64::INFINITY) {
                distance.insert(next, next_cost);
                predecessor.insert(next, edge.id());
                heap.push((HeapKey(next_cost), next));
            }
        }
    }

    (distance, predecessor)
}
