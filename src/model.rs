//! Core data types for VLAN allocation.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::utils::flag;

/// Device identifier as found in the resource inventory
pub type DeviceId = u32;

/// 802.1Q VLAN identifier
pub type VlanId = u32;

/// Request identifier, unique within one request file
pub type RequestId = u64;

/// Physical port role on a device.
///
/// Encoded as `primary_port` = 1 for [`PortRole::Primary`] and 0 for
/// [`PortRole::Secondary`] in every file the router reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortRole {
    Secondary,
    Primary,
}

impl PortRole {
    /// The `primary_port` column value for this role
    pub fn flag(self) -> u8 {
        match self {
            PortRole::Secondary => 0,
            PortRole::Primary => 1,
        }
    }

    pub fn from_primary_flag(primary: bool) -> Self {
        if primary {
            PortRole::Primary
        } else {
            PortRole::Secondary
        }
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRole::Primary => write!(f, "primary"),
            PortRole::Secondary => write!(f, "secondary"),
        }
    }
}

impl Serialize for PortRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.flag())
    }
}

impl<'de> Deserialize<'de> for PortRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        flag::parse_flag(&raw)
            .map(PortRole::from_primary_flag)
            .ok_or_else(|| de::Error::custom(format!("invalid primary_port value '{}'", raw)))
    }
}

/// Ordering key for selection: `vlan_id` first, then `device_id`, both ascending.
///
/// The field order matters: the derived `Ord` is the selection comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SlotKey {
    pub vlan_id: VlanId,
    pub device_id: DeviceId,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vlan {} on device {}", self.vlan_id, self.device_id)
    }
}

/// A row of the resource inventory file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ResourceRecord {
    pub device_id: DeviceId,
    #[serde(rename = "primary_port")]
    pub port_role: PortRole,
    pub vlan_id: VlanId,
}

/// One reservable VLAN on one port of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanResource {
    pub device_id: DeviceId,
    pub port_role: PortRole,
    pub vlan_id: VlanId,
    pub reserved: bool,
}

impl VlanResource {
    pub fn key(&self) -> SlotKey {
        SlotKey {
            vlan_id: self.vlan_id,
            device_id: self.device_id,
        }
    }
}

impl From<ResourceRecord> for VlanResource {
    fn from(record: ResourceRecord) -> Self {
        VlanResource {
            device_id: record.device_id,
            port_role: record.port_role,
            vlan_id: record.vlan_id,
            reserved: false,
        }
    }
}

/// What a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// One primary-port VLAN
    Normal,
    /// The same VLAN on both ports of one device
    Redundant,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Normal => write!(f, "normal"),
            RequestKind::Redundant => write!(f, "redundant"),
        }
    }
}

/// A row of the request file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Request {
    pub request_id: RequestId,
    #[serde(deserialize_with = "flag::deserialize")]
    pub redundant: bool,
}

impl Request {
    pub fn normal(request_id: RequestId) -> Self {
        Request { request_id, redundant: false }
    }

    pub fn redundant(request_id: RequestId) -> Self {
        Request { request_id, redundant: true }
    }

    pub fn kind(&self) -> RequestKind {
        if self.redundant {
            RequestKind::Redundant
        } else {
            RequestKind::Normal
        }
    }
}

/// One output row. Serializes as `request_id,device_id,primary_port,vlan_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    pub request_id: RequestId,
    pub device_id: DeviceId,
    #[serde(rename = "primary_port")]
    pub port_role: PortRole,
    pub vlan_id: VlanId,
}

impl AllocationResult {
    pub fn new(request_id: RequestId, key: SlotKey, port_role: PortRole) -> Self {
        AllocationResult {
            request_id,
            device_id: key.device_id,
            port_role,
            vlan_id: key.vlan_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key_orders_by_vlan_then_device() {
        let a = SlotKey { vlan_id: 10, device_id: 7 };
        let b = SlotKey { vlan_id: 11, device_id: 1 };
        let c = SlotKey { vlan_id: 10, device_id: 2 };

        let mut keys = vec![a, b, c];
        keys.sort();
        assert_eq!(keys, vec![c, a, b]);
    }

    #[test]
    fn test_port_role_flag() {
        assert_eq!(PortRole::Primary.flag(), 1);
        assert_eq!(PortRole::Secondary.flag(), 0);
        assert_eq!(PortRole::from_primary_flag(true), PortRole::Primary);
    }

    #[test]
    fn test_request_kind() {
        assert_eq!(Request::redundant(4).kind(), RequestKind::Redundant);
        assert_eq!(Request::normal(4).kind(), RequestKind::Normal);
        assert_eq!(RequestKind::Redundant.to_string(), "redundant");
    }
}
