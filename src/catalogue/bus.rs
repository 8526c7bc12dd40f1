use super::stop::StopId;

/// Stable handle into [`super::Catalogue`]'s bus arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub(crate) u32);

impl BusId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The shape of a bus's route.
///
/// A closed sum type rather than an enum-plus-branching, per `spec.md`
/// §9 "ROUND vs DIRECT as a sum type" — every place that needs to know
/// how a bus actually traverses its stops (route length, stop count,
/// map polyline, graph ride edges) matches on this exhaustively instead
/// of re-deriving "is it a loop" from a boolean each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteKind {
    /// The stored stop sequence is the full cycle; first and last stop
    /// may coincide. Logical traversal is the stored sequence as-is.
    #[default]
    Round,
    /// The stored stop sequence is one-way. Logical traversal is the
    /// sequence followed by its reverse, minus the duplicated pivot
    /// stop (`A, B, C` becomes `A, B, C, B, A`).
    Direct,
    /// A bus whose kind was never resolved. Only reachable through the
    /// catalogue's programmatic API (`spec.md`'s JSON envelope always
    /// supplies `is_roundtrip`); treated like `Round` for traversal
    /// purposes since there is no better default.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Bus {
    pub name: Box<str>,
    pub stops: Vec<StopId>,
    pub kind: RouteKind,
}

impl Bus {
    /// The full sequence of stops this bus visits, expanding `Direct`
    /// into its out-and-back form.
    pub fn logical_traversal(&self) -> Vec<StopId> {
        match self.kind {
            RouteKind::Round | RouteKind::Unknown => self.stops.clone(),
            RouteKind::Direct => {
                let mut traversal = self.stops.clone();
                traversal.extend(self.stops.iter().rev().skip(1));
                traversal
            }
        }
    }

    /// Number of stops in the logical traversal: the stored length for
    /// `Round`/`Unknown`, `2 * len - 1` for `Direct`.
    pub fn stop_count(&self) -> usize {
        match self.kind {
            RouteKind::Round | RouteKind::Unknown => self.stops.len(),
            RouteKind::Direct => self.stops.len() * 2 - 1,
        }
    }

    /// Number of distinct stop identities in the stored sequence.
    pub fn unique_stop_count(&self) -> usize {
        let mut seen: Vec<StopId> = self.stops.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }
}
