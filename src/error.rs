use thiserror::Error;

/// Every failure mode the core can produce.
///
/// `UnknownStop`, `UnknownBus`, `UnknownDistance`, `NotReachable` and
/// `RenderUnavailable` are query-level: callers driving a batch of stat
/// requests catch them and turn them into an `"not found"` response
/// instead of aborting the batch. `InputMalformed` and a catalogue
/// invariant violation are construction-time and fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("stop {0:?} is not known to the catalogue")]
    UnknownStop(String),

    #[error("bus {0:?} is not known to the catalogue")]
    UnknownBus(String),

    #[error("no distance recorded between {0:?} and {1:?}")]
    UnknownDistance(String, String),

    #[error("no route found")]
    NotReachable,

    #[error("map was queried before the renderer ran")]
    RenderUnavailable,

    #[error("malformed input: {0}")]
    InputMalformed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
