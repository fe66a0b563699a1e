//! Read-only HTTP responder for the current tuning reading.
//!
//! Exposes the published reading as JSON, a static informational page, a
//! health probe, and an SSE stream of live readings. There are no write or
//! command endpoints; every handler is a pure consumer of the reading cell.

mod routes;
mod sse;

pub use routes::{build_router, run_http_server, DataResponse, HealthResponse, TunerHttpState};
