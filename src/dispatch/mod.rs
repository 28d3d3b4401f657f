//! Outbound RSVP delivery: payload serialization and the HTTP transport

mod http;
pub mod payload;

pub use http::{DispatchError, Dispatcher, HttpDispatcher};
pub use payload::{sanitize, RsvpPayload};
