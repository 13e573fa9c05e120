//! VLAN resource pool.
//!
//! This module owns the reservable (device, port role, vlan) resources of a
//! run, answers the two "first available" selection queries, and exposes a
//! lock-guarded handle for callers on several threads.

pub mod resource_pool;
pub mod shared;
pub mod source;

// Re-export commonly used types
pub use resource_pool::{PoolError, PoolStats, Reservation, ResourcePool, Selection};
pub use shared::SharedPool;
pub use source::ResourceSource;
