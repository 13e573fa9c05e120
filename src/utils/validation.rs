//! Inventory consistency checks.
//!
//! These checks never reject an inventory. They report how much of the pool
//! can serve redundant requests so an operator can spot a half-exported
//! device before the run starts failing requests.

use crate::model::{PortRole, SlotKey, VlanResource};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pairing statistics for a resource inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    /// (device, vlan) slots with both port roles present
    pub complete_pairs: usize,
    /// Slots with only a primary port
    pub unpaired_primaries: usize,
    /// Slots with only a secondary port
    pub unpaired_secondaries: usize,
}

/// Count complete and half-present (device, vlan) slots
///
/// Checks for:
/// - Primary ports without a secondary partner (usable by normal requests only)
/// - Secondary ports without a primary partner (never selectable)
///
/// # Examples
/// ```
/// use vlan_router::model::{PortRole, VlanResource};
/// use vlan_router::utils::validation::validate_inventory;
///
/// let resources = [
///     VlanResource { device_id: 1, port_role: PortRole::Primary, vlan_id: 10, reserved: false },
///     VlanResource { device_id: 1, port_role: PortRole::Secondary, vlan_id: 10, reserved: false },
///     VlanResource { device_id: 2, port_role: PortRole::Primary, vlan_id: 10, reserved: false },
/// ];
/// let report = validate_inventory(resources.iter());
/// assert_eq!(report.complete_pairs, 1);
/// assert_eq!(report.unpaired_primaries, 1);
/// ```
pub fn validate_inventory<'a, I>(resources: I) -> InventoryReport
where
    I: IntoIterator<Item = &'a VlanResource>,
{
    let mut slots: BTreeMap<SlotKey, (bool, bool)> = BTreeMap::new();
    for resource in resources {
        let entry = slots.entry(resource.key()).or_default();
        match resource.port_role {
            PortRole::Primary => entry.0 = true,
            PortRole::Secondary => entry.1 = true,
        }
    }

    let mut report = InventoryReport::default();
    for (has_primary, has_secondary) in slots.values() {
        match (has_primary, has_secondary) {
            (true, true) => report.complete_pairs += 1,
            (true, false) => report.unpaired_primaries += 1,
            (false, true) => report.unpaired_secondaries += 1,
            (false, false) => {}
        }
    }

    log::info!(
        "Inventory: {} complete port pairs, {} primary-only slots, {} secondary-only slots",
        report.complete_pairs, report.unpaired_primaries, report.unpaired_secondaries
    );

    if report.unpaired_secondaries > 0 {
        log::warn!(
            "{} secondary port(s) have no primary partner and can never be allocated",
            report.unpaired_secondaries
        );
    }

    report
}
