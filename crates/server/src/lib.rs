//! HTTP surface for the faregate backend.
//!
//! Exposed as a library so integration tests can build the router
//! in-process; the `faregate` binary wires the same pieces to a listener.

pub mod api;
pub mod metrics;
pub mod state;
