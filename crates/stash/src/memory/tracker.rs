use std::collections::HashMap;
use std::fmt;
use std::panic::Location;

/// Where an outstanding object was checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaseSite {
    /// Identity of the leased object (see [`crate::Reusable::identity`])
    pub identity: usize,
    /// Call site of the checkout
    pub location: &'static Location<'static>,
}

impl fmt::Display for LeaseSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} checked out at {}", self.identity, self.location)
    }
}

/// Records the checkout call site of every outstanding object.
///
/// Only consulted when lease tracking is enabled for a slot, so untracked
/// slots pay a single branch per checkout.
#[derive(Debug, Default)]
pub struct LeaseTracker {
    sites: HashMap<usize, &'static Location<'static>>,
}

impl LeaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember that `identity` was checked out at `location`.
    pub fn record(&mut self, identity: usize, location: &'static Location<'static>) {
        self.sites.insert(identity, location);
    }

    /// Forget `identity`. Returns false if it was not being tracked.
    pub fn release(&mut self, identity: usize) -> bool {
        self.sites.remove(&identity).is_some()
    }

    /// Number of tracked outstanding objects.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Outstanding checkouts, ordered by call site for stable reports.
    pub fn outstanding(&self) -> Vec<LeaseSite> {
        let mut sites: Vec<LeaseSite> = self
            .sites
            .iter()
            .map(|(&identity, &location)| LeaseSite { identity, location })
            .collect();
        sites.sort_by(|a, b| {
            (a.location.file(), a.location.line(), a.location.column(), a.identity).cmp(&(
                b.location.file(),
                b.location.line(),
                b.location.column(),
                b.identity,
            ))
        });
        sites
    }
}
