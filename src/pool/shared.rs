//! Lock-guarded pool handle.
//!
//! Each `take_*` call runs selection and reservation inside a single critical
//! section, so callers on different threads can never be handed the same
//! resource.

use super::resource_pool::{PoolStats, Reservation, ResourcePool};
use super::PoolError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct SharedPool {
    inner: Arc<Mutex<ResourcePool>>,
}

impl SharedPool {
    pub fn new(pool: ResourcePool) -> Self {
        SharedPool {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn take_primary(&self) -> Result<Reservation, PoolError> {
        self.lock().take_primary()
    }

    pub fn take_redundant(&self) -> Result<Reservation, PoolError> {
        self.lock().take_redundant()
    }

    pub fn stats(&self) -> PoolStats {
        self.lock().stats()
    }

    /// Run `f` with exclusive access to the pool
    pub fn with_pool<T>(&self, f: impl FnOnce(&mut ResourcePool) -> T) -> T {
        f(&mut self.lock())
    }

    /// Recover the pool once every other handle is gone
    pub fn into_inner(self) -> Option<ResourcePool> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|mutex| mutex.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    // A panic elsewhere cannot leave a slot half reserved: `reserve` validates
    // before it writes.
    fn lock(&self) -> MutexGuard<'_, ResourcePool> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortRole, ResourceRecord};
    use std::collections::HashSet;
    use std::thread;

    fn pool_with_pairs(devices: u32, vlans: u32) -> ResourcePool {
        let mut pool = ResourcePool::new();
        for device_id in 1..=devices {
            for vlan_id in 1..=vlans {
                for port_role in [PortRole::Primary, PortRole::Secondary] {
                    pool.insert(ResourceRecord { device_id, port_role, vlan_id }).unwrap();
                }
            }
        }
        pool
    }

    #[test]
    fn test_concurrent_takes_never_collide() {
        let shared = SharedPool::new(pool_with_pairs(4, 25));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    loop {
                        let result = if worker % 2 == 0 {
                            shared.take_primary()
                        } else {
                            shared.take_redundant()
                        };
                        match result {
                            Ok(reservation) => taken.push(reservation),
                            Err(_) => break,
                        }
                    }
                    taken
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for reservation in handle.join().unwrap() {
                let claimed = match reservation {
                    Reservation::Single(resource) => vec![(resource.key(), resource.port_role)],
                    Reservation::Pair(key) => vec![(key, PortRole::Primary), (key, PortRole::Secondary)],
                };
                for triple in claimed {
                    assert!(seen.insert(triple), "resource {:?} handed out twice", triple);
                }
            }
        }

        let pool = shared.into_inner().unwrap();
        assert_eq!(pool.reserved_count(), seen.len());
        assert_eq!(pool.stats().free_primary, 0);
    }

    #[test]
    fn test_with_pool_sees_reservations() {
        let shared = SharedPool::new(pool_with_pairs(1, 2));
        shared.take_redundant().unwrap();
        assert_eq!(shared.with_pool(|pool| pool.reserved_count()), 2);
        assert_eq!(shared.stats().free_pairs, 1);
    }
}
