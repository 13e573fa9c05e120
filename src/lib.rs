//! # vlan-router - VLAN assignment for device port requests
//!
//! This library assigns VLAN identifiers on device ports to a batch of
//! allocation requests. A *normal* request needs one VLAN on a primary port;
//! a *redundant* request needs the same VLAN on both the primary and the
//! secondary port of one device, for failover.
//!
//! ## Selection rules
//!
//! - Requests are served in ascending `request_id` order.
//! - A normal request takes the free primary-port resource with the smallest
//!   `vlan_id`, ties broken by the smallest `device_id`.
//! - A redundant request takes the (device, vlan) pair whose two ports are
//!   both free, with the same ordering.
//! - Every resource is reserved at most once; reservations are never undone.
//!
//! ## Architecture
//!
//! - `model`: resources, requests and result rows
//! - `pool`: the resource pool, its selection queries and a lock-guarded handle
//! - `allocator`: the lazy request router and exhaustion policy
//! - `loader`: CSV inventory and request loading
//! - `writer`: CSV result writing
//! - `report`: run summary and JSON report
//! - `config` / `config_loader`: YAML run configuration and CLI overrides
//! - `orchestrator`: a complete run from files to files
//! - `utils`: flag parsing and inventory checks
//!
//! ## Example Usage
//!
//! ```rust
//! use vlan_router::allocator::{route_all, ExhaustionPolicy};
//! use vlan_router::model::{PortRole, Request, ResourceRecord};
//! use vlan_router::pool::ResourcePool;
//!
//! let mut pool = ResourcePool::from_records([
//!     ResourceRecord { device_id: 1, port_role: PortRole::Primary, vlan_id: 10 },
//!     ResourceRecord { device_id: 1, port_role: PortRole::Secondary, vlan_id: 10 },
//! ])?;
//!
//! let (rows, _) = route_all([Request::redundant(1)], &mut pool, ExhaustionPolicy::Abort)?;
//! assert_eq!(rows.len(), 2);
//! assert_eq!(pool.reserved_count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## File Formats
//!
//! ```text
//! vlans.csv      device_id,primary_port,vlan_id
//! requests.csv   request_id,redundant
//! output.csv     request_id,device_id,primary_port,vlan_id
//! ```
//!
//! ## Error Handling
//!
//! Library components return typed errors (`thiserror`). The binary and the
//! orchestrator use `color_eyre` for reporting with context.

pub mod model;
pub mod pool;
pub mod allocator;
pub mod loader;
pub mod writer;
pub mod report;
pub mod config;
pub mod config_loader;
pub mod orchestrator;
pub mod utils;
