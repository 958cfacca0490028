use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::panic::Location;

use tracing::{trace, warn};

use crate::memory::free_list::{FreeList, Reusable};
use crate::memory::stats::PoolStats;
use crate::memory::tracker::{LeaseSite, LeaseTracker};
use crate::PoolConfig;

/// One free list plus everything needed to serve it.
///
/// All methods take `&self`; the list lives behind a `RefCell` whose borrows
/// never outlive a single call, so any number of leases from the same slot can
/// be alive at once. The `RefCell` also makes the slot `!Sync`.
pub struct Slot<T> {
    /// Name used in diagnostics
    name: &'static str,
    /// Idle objects
    list: RefCell<FreeList<T>>,
    /// Outstanding call sites, when tracking is enabled
    tracker: Option<RefCell<LeaseTracker>>,
    /// Allocates an object on a miss
    make: Box<dyn Fn() -> T>,
}

impl<T: Reusable> Slot<T> {
    /// Create a slot and populate it to `config.capacity`.
    pub fn new(name: &'static str, config: &PoolConfig, make: impl Fn() -> T + 'static) -> Self {
        let list = FreeList::populated(config.capacity, &make);
        Self {
            name,
            list: RefCell::new(list),
            tracker: config.track_leases.then(|| RefCell::new(LeaseTracker::new())),
            make: Box::new(make),
        }
    }

    /// Take an object out of the slot.
    ///
    /// Never fails: an exhausted slot allocates a fresh object and logs a
    /// sizing hint. The contents of the returned object are unspecified.
    #[track_caller]
    pub fn checkout(&self) -> T {
        let popped = self.list.borrow_mut().pop();
        let item = match popped {
            Some(item) => item,
            None => {
                warn!(
                    slot = self.name,
                    capacity = self.capacity(),
                    "scratch pool miss, allocating a fresh object; consider raising the capacity"
                );
                (self.make)()
            }
        };
        if let Some(tracker) = &self.tracker {
            tracker.borrow_mut().record(item.identity(), Location::caller());
        }
        item
    }

    /// Give an object back. Dropped silently if the slot is already full.
    pub fn checkin(&self, item: T) {
        if let Some(tracker) = &self.tracker {
            tracker.borrow_mut().release(item.identity());
        }
        if let Err(dropped) = self.list.borrow_mut().push(item) {
            trace!(slot = self.name, "scratch pool full, dropping returned object");
            drop(dropped);
        }
    }

    /// Give back every object yielded by `items`.
    pub fn checkin_all(&self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.checkin(item);
        }
    }

    /// Borrow an object that returns to the slot when the lease drops.
    #[track_caller]
    pub fn lease(&self) -> Lease<'_, T> {
        Lease {
            item: Some(self.checkout()),
            slot: self,
        }
    }

    /// Call sites of tracked outstanding checkouts; empty when untracked.
    pub fn outstanding_sites(&self) -> Vec<LeaseSite> {
        self.tracker
            .as_ref()
            .map(|tracker| tracker.borrow().outstanding())
            .unwrap_or_default()
    }

    /// Log every tracked outstanding checkout. Returns how many were found.
    pub fn report_outstanding(&self) -> usize {
        let sites = self.outstanding_sites();
        for site in &sites {
            warn!(slot = self.name, "outstanding scratch object: {}", site);
        }
        sites.len()
    }
}

impl<T> Slot<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of idle objects.
    pub fn available(&self) -> usize {
        self.list.borrow().len()
    }

    /// Maximum number of idle objects kept.
    pub fn capacity(&self) -> usize {
        self.list.borrow().capacity()
    }

    /// Whether checkout call sites are being recorded.
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_some()
    }

    /// Borrow the slot statistics.
    pub fn stats(&self) -> Ref<'_, PoolStats> {
        Ref::map(self.list.borrow(), |list| list.stats())
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("available", &self.available())
            .field("capacity", &self.capacity())
            .field("tracking", &self.is_tracking())
            .finish()
    }
}

/// An object borrowed from a [`Slot`].
///
/// Dereferences to the object and checks it back in on drop, so the object
/// cannot be used after it has been returned, nor returned twice.
pub struct Lease<'a, T: Reusable> {
    item: Option<T>,
    slot: &'a Slot<T>,
}

impl<'a, T: Reusable> Lease<'a, T> {
    /// Keep the object for good; it will not return to the slot.
    pub fn detach(mut self) -> T {
        let item = self.take();
        if let Some(tracker) = &self.slot.tracker {
            tracker.borrow_mut().release(item.identity());
        }
        item
    }

    fn take(&mut self) -> T {
        match self.item.take() {
            Some(item) => item,
            None => unreachable!("lease emptied before drop"),
        }
    }
}

impl<T: Reusable> Deref for Lease<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("lease emptied before drop"),
        }
    }
}

impl<T: Reusable> DerefMut for Lease<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("lease emptied before drop"),
        }
    }
}

impl<T: Reusable> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.slot.checkin(item);
        }
    }
}

impl<T: Reusable + fmt::Debug> fmt::Debug for Lease<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lease").field(&**self).finish()
    }
}
