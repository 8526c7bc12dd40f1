//! Owns stops and buses by interned handle, with pointer-stable
//! storage (an arena, not raw pointers — see `spec.md` §9).

mod bus;
mod distance;
mod stop;

pub use bus::{Bus, BusId, RouteKind};
pub use distance::DistanceMatrix;
pub use stop::{Stop, StopId};

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Indexes stops, buses, and the inter-stop distance matrix.
///
/// Exclusively owns its entity storage; every handle (`StopId`,
/// `BusId`) is a non-owning reference whose validity is bounded by the
/// catalogue's own lifetime.
#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_by_name: HashMap<Box<str>, StopId>,
    bus_by_name: HashMap<Box<str>, BusId>,
    distances: DistanceMatrix,
    /// Bus names serving each stop, kept sorted for stable output
    /// (`spec.md` §3 "Stop→buses index").
    buses_at_stop: HashMap<StopId, BTreeSet<Box<str>>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stop. Name uniqueness is not enforced here — it is
    /// the ingest layer's job to dedup, per `spec.md` §4.1.
    pub fn add_stop(&mut self, name: impl Into<Box<str>>, coordinate: Coordinate) -> StopId {
        let name = name.into();
        let id = StopId(self.stops.len() as u32);
        self.stop_by_name.insert(name.clone(), id);
        self.buses_at_stop.insert(id, BTreeSet::new());
        self.stops.push(Stop { name, coordinate });
        id
    }

    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_by_name.get(name).copied()
    }

    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.index()]
    }

    pub fn stops(&self) -> impl Iterator<Item = (StopId, &Stop)> {
        self.stops
            .iter()
            .enumerate()
            .map(|(i, stop)| (StopId(i as u32), stop))
    }

    pub fn stop_count_total(&self) -> usize {
        self.stops.len()
    }

    /// Sets the directed distance `a -> b`, seeding `b -> a` the same
    /// way if it has never been set. Fails with `UnknownStop` if
    /// either stop is not in the catalogue — see `spec.md` §9 for why
    /// this implementation prefers an error over the source's silent
    /// ignore. [`Self::set_distance_lenient`] keeps the historical
    /// behavior for callers that want it.
    pub fn set_distance(&mut self, a: &str, b: &str, meters: f64) -> Result<()> {
        let a_id = self.require_stop(a)?;
        let b_id = self.require_stop(b)?;
        self.distances.set(a_id, b_id, meters);
        Ok(())
    }

    /// Same as [`Self::set_distance`], but logs and silently no-ops
    /// instead of erroring when either stop is unknown.
    pub fn set_distance_lenient(&mut self, a: &str, b: &str, meters: f64) {
        match (self.stop_id(a), self.stop_id(b)) {
            (Some(a_id), Some(b_id)) => self.distances.set(a_id, b_id, meters),
            _ => log::warn!(
                "ignoring distance {a:?} -> {b:?} ({meters}m): unknown stop in the pair"
            ),
        }
    }

    /// Distance `a -> b` in meters, per the lookup policy of `spec.md`
    /// §3. `None` if the pair was never set in either direction.
    pub fn get_distance(&self, a: StopId, b: StopId) -> Option<f64> {
        self.distances.get(a, b)
    }

    pub fn add_bus(&mut self, name: impl Into<Box<str>>) -> BusId {
        let name = name.into();
        let id = BusId(self.buses.len() as u32);
        self.bus_by_name.insert(name.clone(), id);
        self.buses.push(Bus {
            name,
            stops: Vec::new(),
            kind: RouteKind::Round,
        });
        id
    }

    pub fn bus_id(&self, name: &str) -> Option<BusId> {
        self.bus_by_name.get(name).copied()
    }

    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.index()]
    }

    pub fn buses(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.buses
            .iter()
            .enumerate()
            .map(|(i, bus)| (BusId(i as u32), bus))
    }

    pub fn set_bus_route_type(&mut self, bus: BusId, kind: RouteKind) {
        self.buses[bus.index()].kind = kind;
    }

    /// Appends `stop` to `bus`'s stored sequence and records the
    /// incidence in the stop→buses index.
    pub fn append_stop_to_bus(&mut self, bus: BusId, stop: StopId) {
        self.buses[bus.index()].stops.push(stop);
        let bus_name = self.buses[bus.index()].name.clone();
        self.buses_at_stop
            .entry(stop)
            .or_default()
            .insert(bus_name);
    }

    /// Sum of [`Self::get_distance`] over consecutive stops in the bus's
    /// logical traversal.
    pub fn get_route_length(&self, bus: BusId) -> Result<f64> {
        self.route_length_with(bus, |a, b| {
            self.get_distance(a, b)
                .ok_or_else(|| self.unknown_distance(a, b))
        })
    }

    /// Same as [`Self::get_route_length`] but using great-circle
    /// distance instead of the road-distance matrix.
    pub fn get_geo_route_length(&self, bus: BusId) -> Result<f64> {
        self.route_length_with(bus, |a, b| {
            Ok(self.stop(a).coordinate.distance(&self.stop(b).coordinate))
        })
    }

    fn route_length_with(
        &self,
        bus: BusId,
        mut leg_length: impl FnMut(StopId, StopId) -> Result<f64>,
    ) -> Result<f64> {
        let bus = self.buses.get(bus.index()).ok_or_else(|| {
            Error::UnknownBus(String::new())
        })?;
        let traversal = bus.logical_traversal();
        let mut total = 0.0;
        for pair in traversal.windows(2) {
            total += leg_length(pair[0], pair[1])?;
        }
        Ok(total)
    }

    /// `route_length / geo_route_length`. `+infinity` if the
    /// geo length is zero (degenerate, single-point route), per
    /// `spec.md` §4.1/§9.
    pub fn curvature(&self, bus: BusId) -> Result<f64> {
        let route_length = self.get_route_length(bus)?;
        let geo_length = self.get_geo_route_length(bus)?;
        Ok(route_length / geo_length)
    }

    pub fn stop_count(&self, bus: BusId) -> Result<usize> {
        Ok(self.require_bus(bus)?.stop_count())
    }

    pub fn unique_stop_count(&self, bus: BusId) -> Result<usize> {
        Ok(self.require_bus(bus)?.unique_stop_count())
    }

    /// Sorted bus names serving `stop`.
    pub fn buses_at_stop(&self, stop: StopId) -> Result<Vec<&str>> {
        self.buses_at_stop
            .get(&stop)
            .map(|names| names.iter().map(AsRef::as_ref).collect())
            .ok_or_else(|| Error::UnknownStop(String::new()))
    }

    fn require_stop(&mut self, name: &str) -> Result<StopId> {
        self.stop_id(name)
            .ok_or_else(|| Error::UnknownStop(name.to_string()))
    }

    fn require_bus(&self, bus: BusId) -> Result<&Bus> {
        self.buses
            .get(bus.index())
            .ok_or_else(|| Error::UnknownBus(String::new()))
    }

    fn unknown_distance(&self, a: StopId, b: StopId) -> Error {
        Error::UnknownDistance(self.stop(a).name.to_string(), self.stop(b).name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_round_trip_fixture() -> (Catalogue, BusId) {
        let mut cat = Catalogue::new();
        let a = cat.add_stop("A", Coordinate::new(55.0, 37.0));
        let b = cat.add_stop("B", Coordinate::new(55.0, 37.01));
        cat.set_distance("A", "B", 1000.0).unwrap();

        let bus = cat.add_bus("1");
        cat.append_stop_to_bus(bus, a);
        cat.append_stop_to_bus(bus, b);
        cat.append_stop_to_bus(bus, a);
        (cat, bus)
    }

    #[test]
    fn scenario_s1_round_trip_stats() {
        let (cat, bus) = build_round_trip_fixture();
        assert_eq!(cat.stop_count(bus).unwrap(), 3);
        assert_eq!(cat.unique_stop_count(bus).unwrap(), 2);
        assert_eq!(cat.get_route_length(bus).unwrap(), 2000.0);
    }

    #[test]
    fn scenario_s2_direct_route_uses_asymmetric_distances() {
        let mut cat = Catalogue::new();
        let a = cat.add_stop("A", Coordinate::new(55.0, 37.0));
        let b = cat.add_stop("B", Coordinate::new(55.0, 37.01));
        cat.set_distance("A", "B", 1500.0).unwrap();
        cat.set_distance("B", "A", 1800.0).unwrap();

        let bus = cat.add_bus("2");
        cat.set_bus_route_type(bus, RouteKind::Direct);
        cat.append_stop_to_bus(bus, a);
        cat.append_stop_to_bus(bus, b);

        assert_eq!(cat.stop_count(bus).unwrap(), 3);
        assert_eq!(cat.unique_stop_count(bus).unwrap(), 2);
        assert_eq!(cat.get_route_length(bus).unwrap(), 3300.0);
    }

    #[test]
    fn unknown_bus_and_stop_queries_error() {
        let cat = Catalogue::new();
        assert!(matches!(
            cat.buses_at_stop(StopId(0)),
            Err(Error::UnknownStop(_))
        ));
    }

    #[test]
    fn buses_at_stop_is_sorted_and_complete() {
        let mut cat = Catalogue::new();
        let a = cat.add_stop("A", Coordinate::new(0.0, 0.0));
        let bus_z = cat.add_bus("Z");
        let bus_a = cat.add_bus("A-line");
        cat.append_stop_to_bus(bus_z, a);
        cat.append_stop_to_bus(bus_a, a);

        assert_eq!(cat.buses_at_stop(a).unwrap(), vec!["A-line", "Z"]);
    }

    #[test]
    fn curvature_is_infinite_for_degenerate_geo_length() {
        let mut cat = Catalogue::new();
        // Same coordinate for both stops: geo length is zero.
        let a = cat.add_stop("A", Coordinate::new(10.0, 10.0));
        let b = cat.add_stop("B", Coordinate::new(10.0, 10.0));
        cat.set_distance("A", "B", 500.0).unwrap();
        let bus = cat.add_bus("1");
        cat.append_stop_to_bus(bus, a);
        cat.append_stop_to_bus(bus, b);
        cat.append_stop_to_bus(bus, a);

        assert_eq!(cat.curvature(bus).unwrap(), f64::INFINITY);
    }

    #[test]
    fn missing_distance_errors() {
        let mut cat = Catalogue::new();
        let a = cat.add_stop("A", Coordinate::new(0.0, 0.0));
        let b = cat.add_stop("B", Coordinate::new(0.0, 1.0));
        let bus = cat.add_bus("1");
        cat.append_stop_to_bus(bus, a);
        cat.append_stop_to_bus(bus, b);

        assert!(matches!(
            cat.get_route_length(bus),
            Err(Error::UnknownDistance(_, _))
        ));
    }
}
