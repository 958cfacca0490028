//! Typed scratch pools for vectors and matrices.
//!
//! A [`Scratch`] owns one [`Slot`] per pooled type (the four vector
//! dimensions and the three matrix shapes), each populated up front from a
//! [`StorageProvider`]. Operations that need temporaries lease them here
//! instead of allocating. The pool is single-threaded: create one per thread.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use stash::{
    parse_capacity, parse_flag, parse_parameters, Lease, LeaseSite, PoolConfig, PoolError, PoolStats,
    Reusable, Slot,
};
use tracing::debug;

use crate::numerics::storage::{HeapStorage, StorageProvider};
use crate::numerics::types::matrix::{Mat3, Mat3x4, Mat4};
use crate::numerics::types::vector::Vector;

/// Capacities of every slot of a [`Scratch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    /// Vectors of dimension 1 through 4
    pub vector_capacity: [usize; 4],
    pub mat3_capacity: usize,
    pub mat3x4_capacity: usize,
    pub mat4_capacity: usize,
    /// Record the call site of every outstanding checkout
    pub track_leases: bool,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            vector_capacity: [16, 16, 128, 16],
            mat3_capacity: 8,
            mat3x4_capacity: 8,
            mat4_capacity: 8,
            track_leases: false,
        }
    }
}

impl ScratchConfig {
    /// Empty slots; every checkout allocates.
    pub fn minimal() -> Self {
        Self {
            vector_capacity: [0; 4],
            mat3_capacity: 0,
            mat3x4_capacity: 0,
            mat4_capacity: 0,
            track_leases: false,
        }
    }

    /// Four times the default capacities, for deep call chains.
    pub fn heavy() -> Self {
        let base = Self::default();
        Self {
            vector_capacity: base.vector_capacity.map(|c| c * 4),
            mat3_capacity: base.mat3_capacity * 4,
            mat3x4_capacity: base.mat3x4_capacity * 4,
            mat4_capacity: base.mat4_capacity * 4,
            track_leases: false,
        }
    }

    /// Default capacities with call-site tracking on.
    pub fn tracked() -> Self {
        Self {
            track_leases: true,
            ..Self::default()
        }
    }

    /// Start from the defaults and apply `key=value` overrides, e.g.
    /// `"vec3=64,mat4=4,track=true"`. Keys: `vec1`..`vec4`, `mat3`, `mat3x4`,
    /// `mat4`, `track`.
    pub fn from_params(params: &str) -> Result<Self, PoolError> {
        let mut config = Self::default();
        for (key, value) in parse_parameters(params)? {
            match key.as_str() {
                "vec1" => config.vector_capacity[0] = parse_capacity(&key, &value)?,
                "vec2" => config.vector_capacity[1] = parse_capacity(&key, &value)?,
                "vec3" => config.vector_capacity[2] = parse_capacity(&key, &value)?,
                "vec4" => config.vector_capacity[3] = parse_capacity(&key, &value)?,
                "mat3" => config.mat3_capacity = parse_capacity(&key, &value)?,
                "mat3x4" => config.mat3x4_capacity = parse_capacity(&key, &value)?,
                "mat4" => config.mat4_capacity = parse_capacity(&key, &value)?,
                "track" => config.track_leases = parse_flag(&key, &value)?,
                _ => return Err(PoolError::UnknownParameter(key)),
            }
        }
        Ok(config)
    }

    fn pool(&self, capacity: usize) -> PoolConfig {
        PoolConfig {
            capacity,
            track_leases: self.track_leases,
        }
    }
}

/// Types that have a slot in [`Scratch`].
pub trait Pooled: Reusable + Sized {
    fn slot(scratch: &Scratch) -> &Slot<Self>;
}

/// Per-thread pools of reusable temporaries.
#[derive(Debug)]
pub struct Scratch {
    vec1: Slot<Vector<1>>,
    vec2: Slot<Vector<2>>,
    vec3: Slot<Vector<3>>,
    vec4: Slot<Vector<4>>,
    mat3: Slot<Mat3>,
    mat3x4: Slot<Mat3x4>,
    mat4: Slot<Mat4>,
}

impl Scratch {
    /// Default capacities on the heap.
    pub fn new() -> Self {
        Self::with_config(&ScratchConfig::default())
    }

    pub fn with_config(config: &ScratchConfig) -> Self {
        Self::with_provider(config, Rc::new(HeapStorage))
    }

    /// Pools whose objects draw their storage from `provider`.
    pub fn with_provider(config: &ScratchConfig, provider: Rc<dyn StorageProvider>) -> Self {
        debug!(?config, "creating scratch pools");
        let p = provider.clone();
        let vec1 = Slot::new("vec1", &config.pool(config.vector_capacity[0]), move || {
            Vector::with_provider(&*p)
        });
        let p = provider.clone();
        let vec2 = Slot::new("vec2", &config.pool(config.vector_capacity[1]), move || {
            Vector::with_provider(&*p)
        });
        let p = provider.clone();
        let vec3 = Slot::new("vec3", &config.pool(config.vector_capacity[2]), move || {
            Vector::with_provider(&*p)
        });
        let p = provider.clone();
        let vec4 = Slot::new("vec4", &config.pool(config.vector_capacity[3]), move || {
            Vector::with_provider(&*p)
        });
        let p = provider.clone();
        let mat3 = Slot::new("mat3", &config.pool(config.mat3_capacity), move || {
            Mat3::with_provider(&*p)
        });
        let p = provider.clone();
        let mat3x4 = Slot::new("mat3x4", &config.pool(config.mat3x4_capacity), move || {
            Mat3x4::with_provider(&*p)
        });
        let p = provider;
        let mat4 = Slot::new("mat4", &config.pool(config.mat4_capacity), move || {
            Mat4::with_provider(&*p)
        });

        Self {
            vec1,
            vec2,
            vec3,
            vec4,
            mat3,
            mat3x4,
            mat4,
        }
    }

    /// Take an object out of its pool. Contents are unspecified.
    #[track_caller]
    pub fn checkout<T: Pooled>(&self) -> T {
        T::slot(self).checkout()
    }

    /// Return an object to its pool; dropped if the pool is full.
    pub fn checkin<T: Pooled>(&self, item: T) {
        T::slot(self).checkin(item);
    }

    pub fn checkin_all<T: Pooled>(&self, items: impl IntoIterator<Item = T>) {
        T::slot(self).checkin_all(items);
    }

    /// Borrow an object that goes back to its pool when the lease drops.
    #[track_caller]
    pub fn lease<T: Pooled>(&self) -> Lease<'_, T> {
        T::slot(self).lease()
    }

    /// Idle objects of type `T`.
    pub fn available<T: Pooled>(&self) -> usize {
        T::slot(self).available()
    }

    pub fn capacity<T: Pooled>(&self) -> usize {
        T::slot(self).capacity()
    }

    pub fn stats<T: Pooled>(&self) -> PoolStats {
        T::slot(self).stats().clone()
    }

    /// Tracked outstanding checkouts across every pool, with the pool name.
    pub fn outstanding_sites(&self) -> Vec<(&'static str, LeaseSite)> {
        let mut sites = Vec::new();
        self.for_each_slot(|name, slot_sites| {
            sites.extend(slot_sites.into_iter().map(|site| (name, site)));
        });
        sites
    }

    /// Log every tracked outstanding checkout; returns how many there were.
    pub fn report_outstanding(&self) -> usize {
        self.vec1.report_outstanding()
            + self.vec2.report_outstanding()
            + self.vec3.report_outstanding()
            + self.vec4.report_outstanding()
            + self.mat3.report_outstanding()
            + self.mat3x4.report_outstanding()
            + self.mat4.report_outstanding()
    }

    fn for_each_slot(&self, mut visit: impl FnMut(&'static str, Vec<LeaseSite>)) {
        visit(self.vec1.name(), self.vec1.outstanding_sites());
        visit(self.vec2.name(), self.vec2.outstanding_sites());
        visit(self.vec3.name(), self.vec3.outstanding_sites());
        visit(self.vec4.name(), self.vec4.outstanding_sites());
        visit(self.mat3.name(), self.mat3.outstanding_sites());
        visit(self.mat3x4.name(), self.mat3x4.outstanding_sites());
        visit(self.mat4.name(), self.mat4.outstanding_sites());
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! pooled {
    ($ty:ty, $field:ident) => {
        impl Pooled for $ty {
            fn slot(scratch: &Scratch) -> &Slot<Self> {
                &scratch.$field
            }
        }
    };
}

pooled!(Vector<1>, vec1);
pooled!(Vector<2>, vec2);
pooled!(Vector<3>, vec3);
pooled!(Vector<4>, vec4);
pooled!(Mat3, mat3);
pooled!(Mat3x4, mat3x4);
pooled!(Mat4, mat4);
