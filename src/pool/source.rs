//! Where the router draws resources from.

use super::resource_pool::{Reservation, ResourcePool};
use super::shared::SharedPool;
use super::PoolError;

/// Atomic select-and-reserve operations consumed by the router
pub trait ResourceSource {
    fn take_primary(&mut self) -> Result<Reservation, PoolError>;
    fn take_redundant(&mut self) -> Result<Reservation, PoolError>;
}

impl ResourceSource for ResourcePool {
    fn take_primary(&mut self) -> Result<Reservation, PoolError> {
        ResourcePool::take_primary(self)
    }

    fn take_redundant(&mut self) -> Result<Reservation, PoolError> {
        ResourcePool::take_redundant(self)
    }
}

impl ResourceSource for SharedPool {
    fn take_primary(&mut self) -> Result<Reservation, PoolError> {
        SharedPool::take_primary(self)
    }

    fn take_redundant(&mut self) -> Result<Reservation, PoolError> {
        SharedPool::take_redundant(self)
    }
}

impl<S: ResourceSource + ?Sized> ResourceSource for &mut S {
    fn take_primary(&mut self) -> Result<Reservation, PoolError> {
        (**self).take_primary()
    }

    fn take_redundant(&mut self) -> Result<Reservation, PoolError> {
        (**self).take_redundant()
    }
}
