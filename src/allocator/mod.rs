//! Allocation of pool resources to requests.
//!
//! The router walks the request batch in `request_id` order, picks the
//! matching selection policy for each request and turns every reservation
//! into output rows.

pub mod router;

pub use router::{route, route_all, ExhaustionPolicy, Outcome, Router, RoutingError, SkippedRequest};
