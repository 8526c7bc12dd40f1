//! JSON request/response envelope: the "external collaborator" layer
//! `spec.md` places outside the core's design but that still has to
//! exist for the crate to be runnable. See `spec.md` §6.

pub mod request;
pub mod response;

pub use request::{BaseRequest, Envelope, RenderSettingsDto, RoutingSettingsDto, StatRequest};
pub use response::{RouteItem, StatResponse};
