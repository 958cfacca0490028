//! Free-list pooling of reusable objects.
//!
//! A [`FreeList`] holds idle objects, a [`Slot`] wraps one list together with
//! the factory used on a miss and the optional [`LeaseTracker`].

pub mod free_list;
pub mod lease;
pub mod stats;
pub mod tracker;

pub use free_list::{FreeList, PoolError, Reusable};
pub use lease::{Lease, Slot};
pub use stats::PoolStats;
pub use tracker::{LeaseSite, LeaseTracker};
