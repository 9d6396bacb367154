//! Sharing a master database between threads
//!
//! The master [`Airspaces`] lives behind a [`SharedAirspaces`] handle. Mutation
//! takes the write lock, queries and synchronisation take the read lock.
//! Query results borrow the guard, so they have to be consumed (or collected
//! into owned values) before the lock is released.
//!
//! A warning pass keeps its own [`AirspacesView`], refreshed with
//! [`AirspacesView::synchronise_in_range`] and queried without any lock.

use crate::airspaces::{Airspaces, AirspacesView};
use crate::predicate::AirspacePredicate;
use crate::types::GeoPoint;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to a master database shared between threads
#[derive(Debug, Clone, Default)]
pub struct SharedAirspaces {
    inner: Arc<RwLock<Airspaces>>,
}

impl SharedAirspaces {
    pub fn new(airspaces: Airspaces) -> Self {
        Self {
            inner: Arc::new(RwLock::new(airspaces)),
        }
    }

    /// Shared access for queries
    ///
    /// A writer that panicked cannot leave the database half-updated in a way
    /// queries would notice, so poisoning is ignored.
    pub fn read(&self) -> RwLockReadGuard<'_, Airspaces> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access for loading and refreshing the database
    pub fn write(&self) -> RwLockWriteGuard<'_, Airspaces> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change counter of the master database
    pub fn serial(&self) -> u64 {
        self.read().serial()
    }
}

impl From<Airspaces> for SharedAirspaces {
    fn from(airspaces: Airspaces) -> Self {
        Self::new(airspaces)
    }
}

impl AirspacesView {
    /// [`synchronise_with`][Self::synchronise_with] the shared master
    ///
    /// Holds the master's read lock for the duration of the scan; the view
    /// itself is never locked.
    pub fn synchronise_in_range<P>(
        &mut self,
        master: &SharedAirspaces,
        location: GeoPoint,
        range: f64,
        condition: P,
    ) -> bool
    where
        P: AirspacePredicate,
    {
        let master = master.read();
        self.synchronise_with(&*master, location, range, condition)
    }
}
