use crate::memory::stats::PoolStats;

/// Errors raised while configuring pools.
///
/// Checkout and checkin themselves never fail: an empty list allocates and a
/// full list drops the returned object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("Malformed parameter '{0}': expected key=value")]
    MalformedParameter(String),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// An object that can live in a free list.
pub trait Reusable {
    /// Address that identifies this object for as long as it lives.
    ///
    /// Must survive moves, so heap-backed objects return the address of their
    /// backing buffer rather than of `self`.
    fn identity(&self) -> usize;
}

/// Fixed-capacity stack of idle objects.
///
/// Popping from an empty list and pushing onto a full one are both legal;
/// they are counted in the statistics and otherwise reported to the caller
/// through the return value.
#[derive(Debug)]
pub struct FreeList<T> {
    /// Idle objects, most recently returned last
    items: Vec<T>,
    /// Maximum number of idle objects kept
    capacity: usize,
    /// Statistics tracking
    stats: PoolStats,
}

impl<T> FreeList<T> {
    /// Create an empty list that will keep at most `capacity` objects.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            stats: PoolStats::new(),
        }
    }

    /// Create a list filled to capacity with objects from `make`.
    pub fn populated(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        let mut list = Self::new(capacity);
        while list.items.len() < capacity {
            list.items.push(make());
        }
        list
    }

    /// Take an idle object, or `None` when the list is exhausted.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop();
        match item {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        item
    }

    /// Return an object. Hands it back as `Err` when the list is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.items.len() >= self.capacity {
            self.stats.record_discard();
            return Err(item);
        }
        self.items.push(item);
        self.stats.record_checkin();
        Ok(())
    }

    /// Number of idle objects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maximum number of idle objects kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Get list statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
