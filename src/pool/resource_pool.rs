//! VLAN resource pool.
//!
//! Owns every (device, port role, vlan) resource of a run and answers the two
//! selection queries. Free slots are indexed in ordered sets keyed by
//! [`SlotKey`], so "first available" is the first element of a set and the
//! selection order is exactly the `SlotKey` ordering (vlan, then device).

use crate::model::{PortRole, RequestKind, ResourceRecord, SlotKey, VlanResource};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Errors raised by pool queries and reservations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("no free resource available for a {kind} request")]
    NoAvailableResource { kind: RequestKind },

    #[error("duplicate resource: {key} ({role} port)")]
    DuplicateResource { key: SlotKey, role: PortRole },

    #[error("resource {key} ({role} port) is already reserved")]
    AlreadyReserved { key: SlotKey, role: PortRole },

    #[error("no {role} port resource exists for {key}")]
    UnknownResource { key: SlotKey, role: PortRole },
}

/// What to reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The primary port resource of a slot
    Primary(SlotKey),
    /// Both port resources of a slot
    Pair(SlotKey),
}

/// What a successful reservation consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    Single(VlanResource),
    Pair(SlotKey),
}

/// Pool occupancy snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total: usize,
    pub reserved: usize,
    pub free_primary: usize,
    pub free_pairs: usize,
}

/// Resource indices of one (vlan, device) slot
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    primary: Option<usize>,
    secondary: Option<usize>,
}

impl Slot {
    fn index(&self, role: PortRole) -> Option<usize> {
        match role {
            PortRole::Primary => self.primary,
            PortRole::Secondary => self.secondary,
        }
    }
}

#[derive(Debug, Default)]
pub struct ResourcePool {
    resources: Vec<VlanResource>,
    slots: BTreeMap<SlotKey, Slot>,
    /// Slots whose primary port is free
    free_primaries: BTreeSet<SlotKey>,
    /// Slots where both port roles exist and are free
    free_pairs: BTreeSet<SlotKey>,
    reserved: usize,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from inventory records, rejecting duplicates
    pub fn from_records<I>(records: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = ResourceRecord>,
    {
        let mut pool = Self::new();
        for record in records {
            pool.insert(record)?;
        }
        Ok(pool)
    }

    /// Add a free resource. The (vlan, device, role) triple must be new.
    pub fn insert(&mut self, record: ResourceRecord) -> Result<(), PoolError> {
        let resource = VlanResource::from(record);
        let key = resource.key();
        let index = self.resources.len();

        let slot = self.slots.entry(key).or_default();
        let target = match resource.port_role {
            PortRole::Primary => &mut slot.primary,
            PortRole::Secondary => &mut slot.secondary,
        };
        if target.is_some() {
            return Err(PoolError::DuplicateResource { key, role: resource.port_role });
        }
        *target = Some(index);

        self.resources.push(resource);
        self.refresh(key);
        Ok(())
    }

    /// Free primary resource with the smallest vlan, then smallest device
    pub fn find_primary_candidate(&self) -> Result<SlotKey, PoolError> {
        self.free_primaries
            .first()
            .copied()
            .ok_or(PoolError::NoAvailableResource { kind: RequestKind::Normal })
    }

    /// Fully free (device, vlan) pair with the smallest vlan, then smallest device
    pub fn find_redundant_candidate(&self) -> Result<SlotKey, PoolError> {
        self.free_pairs
            .first()
            .copied()
            .ok_or(PoolError::NoAvailableResource { kind: RequestKind::Redundant })
    }

    /// Mark the selected resource(s) reserved.
    ///
    /// Every targeted resource is checked before any flag changes, so a
    /// rejected pair selection leaves both members untouched.
    pub fn reserve(&mut self, selection: Selection) -> Result<Reservation, PoolError> {
        match selection {
            Selection::Primary(key) => {
                let index = self.free_index(key, PortRole::Primary)?;
                self.mark_reserved(index);
                self.refresh(key);
                Ok(Reservation::Single(self.resources[index]))
            }
            Selection::Pair(key) => {
                let secondary = self.free_index(key, PortRole::Secondary)?;
                let primary = self.free_index(key, PortRole::Primary)?;
                self.mark_reserved(secondary);
                self.mark_reserved(primary);
                self.refresh(key);
                Ok(Reservation::Pair(key))
            }
        }
    }

    /// Select and reserve the next primary resource in one step
    pub fn take_primary(&mut self) -> Result<Reservation, PoolError> {
        let key = self.find_primary_candidate()?;
        self.reserve(Selection::Primary(key))
    }

    /// Select and reserve the next free pair in one step
    pub fn take_redundant(&mut self) -> Result<Reservation, PoolError> {
        let key = self.find_redundant_candidate()?;
        self.reserve(Selection::Pair(key))
    }

    pub fn get(&self, key: SlotKey, role: PortRole) -> Option<&VlanResource> {
        self.slots
            .get(&key)
            .and_then(|slot| slot.index(role))
            .map(|index| &self.resources[index])
    }

    /// Resources in load order
    pub fn iter(&self) -> impl Iterator<Item = &VlanResource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn reserved_count(&self) -> usize {
        self.reserved
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total: self.resources.len(),
            reserved: self.reserved,
            free_primary: self.free_primaries.len(),
            free_pairs: self.free_pairs.len(),
        }
    }

    fn free_index(&self, key: SlotKey, role: PortRole) -> Result<usize, PoolError> {
        let index = self
            .slots
            .get(&key)
            .and_then(|slot| slot.index(role))
            .ok_or(PoolError::UnknownResource { key, role })?;
        if self.resources[index].reserved {
            return Err(PoolError::AlreadyReserved { key, role });
        }
        Ok(index)
    }

    // Only ever sets the flag; nothing in the pool clears it.
    fn mark_reserved(&mut self, index: usize) {
        let resource = &mut self.resources[index];
        debug_assert!(!resource.reserved);
        resource.reserved = true;
        self.reserved += 1;
    }

    /// Recompute the free-set membership of one slot
    fn refresh(&mut self, key: SlotKey) {
        let Some(slot) = self.slots.get(&key).copied() else {
            return;
        };
        let is_free = |index: Option<usize>| index.map_or(false, |i| !self.resources[i].reserved);
        let primary_free = is_free(slot.primary);
        let pair_free = primary_free && is_free(slot.secondary);

        if primary_free {
            self.free_primaries.insert(key);
        } else {
            self.free_primaries.remove(&key);
        }
        if pair_free {
            self.free_pairs.insert(key);
        } else {
            self.free_pairs.remove(&key);
        }
    }
}
