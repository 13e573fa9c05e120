//! Request routing.
//!
//! [`route`] turns a batch of requests into a lazy stream of allocation rows.
//! Requests are served strictly in ascending `request_id` order; a normal
//! request yields one row and a redundant request yields two (secondary port
//! first, then primary) on the same device and vlan.

use crate::model::{AllocationResult, PortRole, Request, RequestId, RequestKind};
use crate::pool::{PoolError, Reservation, ResourceSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// What to do with a request the pool cannot satisfy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Stop the run and report the request
    #[default]
    Abort,
    /// Record the request as skipped and keep routing
    Skip,
}

impl fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionPolicy::Abort => write!(f, "abort"),
            ExhaustionPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("request {request_id} ({kind}) could not be satisfied: {source}")]
    Exhausted {
        request_id: RequestId,
        kind: RequestKind,
        #[source]
        source: PoolError,
    },

    #[error("pool rejected request {request_id}: {source}")]
    Pool {
        request_id: RequestId,
        #[source]
        source: PoolError,
    },
}

impl RoutingError {
    pub fn request_id(&self) -> RequestId {
        match self {
            RoutingError::Exhausted { request_id, .. } | RoutingError::Pool { request_id, .. } => *request_id,
        }
    }
}

/// A request left unserved under [`ExhaustionPolicy::Skip`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedRequest {
    pub request_id: RequestId,
    pub kind: RequestKind,
}

/// Running totals of a routing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Requests that received their resources
    pub routed: usize,
    /// Rows handed to the consumer
    pub rows: usize,
    pub skipped: Vec<SkippedRequest>,
}

/// Lazy routing iterator returned by [`route`]
#[derive(Debug)]
pub struct Router<S> {
    source: S,
    requests: std::vec::IntoIter<Request>,
    policy: ExhaustionPolicy,
    /// Second row of a redundant allocation, not yet yielded
    pending: Option<AllocationResult>,
    outcome: Outcome,
    halted: bool,
}

/// Route `requests` against `source`.
///
/// The requests are sorted by `request_id` before the first allocation.
/// Nothing is reserved until the iterator is polled.
pub fn route<S, I>(requests: I, source: S, policy: ExhaustionPolicy) -> Router<S>
where
    S: ResourceSource,
    I: IntoIterator<Item = Request>,
{
    let mut requests: Vec<Request> = requests.into_iter().collect();
    requests.sort_by_key(|request| request.request_id);

    Router {
        source,
        requests: requests.into_iter(),
        policy,
        pending: None,
        outcome: Outcome::default(),
        halted: false,
    }
}

/// Route every request and collect the rows.
///
/// Under [`ExhaustionPolicy::Abort`] the first unsatisfiable request is
/// returned as an error and no rows are handed back.
pub fn route_all<S, I>(
    requests: I,
    source: S,
    policy: ExhaustionPolicy,
) -> Result<(Vec<AllocationResult>, Outcome), RoutingError>
where
    S: ResourceSource,
    I: IntoIterator<Item = Request>,
{
    let mut router = route(requests, source, policy);
    let rows = router.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((rows, router.into_outcome()))
}

impl<S: ResourceSource> Router<S> {
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// Give back the resource source together with the totals
    pub fn into_parts(self) -> (S, Outcome) {
        (self.source, self.outcome)
    }

    fn allocate(&mut self, request: &Request) -> Result<(AllocationResult, Option<AllocationResult>), RoutingError> {
        let taken = if request.redundant {
            self.source.take_redundant()
        } else {
            self.source.take_primary()
        };

        let reservation = taken.map_err(|source| match source {
            PoolError::NoAvailableResource { .. } => RoutingError::Exhausted {
                request_id: request.request_id,
                kind: request.kind(),
                source,
            },
            other => RoutingError::Pool {
                request_id: request.request_id,
                source: other,
            },
        })?;

        match reservation {
            Reservation::Single(resource) => {
                log::debug!(
                    "Request {}: vlan {} on device {} ({} port)",
                    request.request_id, resource.vlan_id, resource.device_id, resource.port_role
                );
                let row = AllocationResult::new(request.request_id, resource.key(), resource.port_role);
                Ok((row, None))
            }
            Reservation::Pair(key) => {
                log::debug!("Request {}: redundant {}", request.request_id, key);
                let first = AllocationResult::new(request.request_id, key, PortRole::Secondary);
                let second = AllocationResult::new(request.request_id, key, PortRole::Primary);
                Ok((first, Some(second)))
            }
        }
    }
}

impl<S: ResourceSource> Iterator for Router<S> {
    type Item = Result<AllocationResult, RoutingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.pending.take() {
            self.outcome.rows += 1;
            return Some(Ok(row));
        }
        if self.halted {
            return None;
        }

        loop {
            let request = self.requests.next()?;
            match self.allocate(&request) {
                Ok((first, second)) => {
                    self.outcome.routed += 1;
                    self.outcome.rows += 1;
                    self.pending = second;
                    return Some(Ok(first));
                }
                Err(RoutingError::Exhausted { request_id, kind, source }) if self.policy == ExhaustionPolicy::Skip => {
                    log::warn!("Skipping request {} ({}): {}", request_id, kind, source);
                    self.outcome.skipped.push(SkippedRequest { request_id, kind });
                }
                Err(error) => {
                    self.halted = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

impl<S: ResourceSource> FusedIterator for Router<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceRecord, SlotKey};
    use crate::pool::{ResourcePool, Selection, SharedPool};
    use std::collections::HashSet;

    fn pool(records: &[(u32, bool, u32)]) -> ResourcePool {
        ResourcePool::from_records(records.iter().map(|&(device_id, primary, vlan_id)| ResourceRecord {
            device_id,
            port_role: PortRole::from_primary_flag(primary),
            vlan_id,
        }))
        .unwrap()
    }

    fn row(request_id: u64, device_id: u32, primary_port: u8, vlan_id: u32) -> AllocationResult {
        AllocationResult {
            request_id,
            device_id,
            port_role: PortRole::from_primary_flag(primary_port == 1),
            vlan_id,
        }
    }

    #[test]
    fn test_redundant_request_yields_pair() {
        let mut pool = pool(&[(1, true, 10), (1, false, 10)]);
        let (rows, outcome) = route_all(vec![Request::redundant(1)], &mut pool, ExhaustionPolicy::Abort).unwrap();

        assert_eq!(rows, vec![row(1, 1, 0, 10), row(1, 1, 1, 10)]);
        assert_eq!(outcome.routed, 1);
        assert_eq!(outcome.rows, 2);
        assert_eq!(pool.reserved_count(), 2);
    }

    #[test]
    fn test_normal_request_reports_primary_port() {
        let mut pool = pool(&[(1, true, 10)]);
        let (rows, _) = route_all(vec![Request::normal(2)], &mut pool, ExhaustionPolicy::Abort).unwrap();

        assert_eq!(rows, vec![row(2, 1, 1, 10)]);
        assert!(pool.get(SlotKey { vlan_id: 10, device_id: 1 }, PortRole::Primary).unwrap().reserved);
    }

    #[test]
    fn test_exhausted_pool_aborts() {
        let mut pool = pool(&[(1, true, 10)]);
        pool.reserve(Selection::Primary(SlotKey { vlan_id: 10, device_id: 1 })).unwrap();

        let err = route_all(vec![Request::normal(3)], &mut pool, ExhaustionPolicy::Abort).unwrap_err();
        assert_eq!(err.request_id(), 3);
        assert!(matches!(
            err,
            RoutingError::Exhausted {
                kind: RequestKind::Normal,
                source: PoolError::NoAvailableResource { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_abort_stops_the_stream() {
        let mut pool = pool(&[(1, true, 10), (1, true, 11)]);
        let mut router = route(
            vec![Request::normal(1), Request::redundant(2), Request::normal(3)],
            &mut pool,
            ExhaustionPolicy::Abort,
        );

        assert_eq!(router.next().unwrap().unwrap(), row(1, 1, 1, 10));
        assert!(router.next().unwrap().is_err());
        assert!(router.next().is_none());
        assert!(router.next().is_none());
        assert_eq!(router.outcome().routed, 1);
        drop(router);

        // request 3 was never attempted
        assert_eq!(pool.reserved_count(), 1);
    }

    #[test]
    fn test_skip_policy_continues() {
        let mut pool = pool(&[(1, true, 10), (1, true, 11)]);
        let (rows, outcome) = route_all(
            vec![Request::normal(1), Request::redundant(2), Request::normal(3)],
            &mut pool,
            ExhaustionPolicy::Skip,
        )
        .unwrap();

        assert_eq!(rows, vec![row(1, 1, 1, 10), row(3, 1, 1, 11)]);
        assert_eq!(
            outcome.skipped,
            vec![SkippedRequest { request_id: 2, kind: RequestKind::Redundant }]
        );
        assert_eq!(outcome.routed, 2);
    }

    #[test]
    fn test_requests_served_in_id_order() {
        let mut pool = pool(&[(1, true, 10), (1, true, 20), (1, true, 30)]);
        let (rows, _) = route_all(
            vec![Request::normal(30), Request::normal(10), Request::normal(20)],
            &mut pool,
            ExhaustionPolicy::Abort,
        )
        .unwrap();

        // lowest id gets the lowest vlan
        assert_eq!(rows, vec![row(10, 1, 1, 10), row(20, 1, 1, 20), row(30, 1, 1, 30)]);
    }

    #[test]
    fn test_mixed_requests_never_share_resources() {
        let mut records = Vec::new();
        for device_id in 1..=3 {
            for vlan_id in 1..=6 {
                records.push((device_id, true, vlan_id));
                if vlan_id % 2 == 0 {
                    records.push((device_id, false, vlan_id));
                }
            }
        }
        let mut pool = pool(&records);
        let requests: Vec<Request> = (1..=20)
            .map(|id| Request { request_id: id, redundant: id % 3 == 0 })
            .collect();

        let (rows, outcome) = route_all(requests, &mut pool, ExhaustionPolicy::Skip).unwrap();

        let mut seen = HashSet::new();
        for r in &rows {
            assert!(seen.insert((r.device_id, r.vlan_id, r.port_role)), "duplicate row {:?}", r);
        }
        assert!(rows.windows(2).all(|w| w[0].request_id <= w[1].request_id));
        for pair in rows.chunk_by(|a, b| a.request_id == b.request_id).filter(|c| c.len() == 2) {
            assert_eq!(pair[0].device_id, pair[1].device_id);
            assert_eq!(pair[0].vlan_id, pair[1].vlan_id);
            assert_eq!(pair[0].port_role, PortRole::Secondary);
            assert_eq!(pair[1].port_role, PortRole::Primary);
        }
        assert_eq!(outcome.rows, rows.len());
        assert_eq!(pool.reserved_count(), rows.len());
    }

    #[test]
    fn test_routes_through_shared_pool() {
        let shared = SharedPool::new(pool(&[(2, true, 4), (2, false, 4)]));
        let (rows, _) = route_all(vec![Request::redundant(7)], shared.clone(), ExhaustionPolicy::Abort).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(shared.stats().reserved, 2);
    }
}
