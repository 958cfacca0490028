//! # Stash - Reusable Scratch Objects
//!
//! Stash keeps fixed-capacity free lists of heap-backed objects so that hot
//! numeric code can borrow a temporary instead of allocating one per call.
//!
//! ## Core Features
//!
//! - **Free Lists**: O(1) checkout/checkin, populated once up front
//! - **Lease Guards**: a borrowed object returns itself when dropped
//! - **Graceful Exhaustion**: an empty list allocates a fresh object and logs a sizing hint
//! - **Lease Tracking**: optional call-site recording to find leaked checkouts
//! - **Statistics**: hit/miss/discard counters per list
//!
//! Slots are deliberately `!Sync`: a slot belongs to one thread, and sharing it
//! across threads is rejected at compile time.
//!
//! ## Quick Start
//!
//! ```rust
//! use stash::{PoolConfig, Reusable, Slot};
//!
//! struct Buffer(Box<[f32]>);
//!
//! impl Reusable for Buffer {
//!     fn identity(&self) -> usize {
//!         self.0.as_ptr() as usize
//!     }
//! }
//!
//! let slot = Slot::new("buffer", &PoolConfig::untracked(4), || {
//!     Buffer(vec![0.0; 16].into_boxed_slice())
//! });
//!
//! {
//!     let mut lease = slot.lease();
//!     lease.0[0] = 1.0;
//!     assert_eq!(slot.available(), 3);
//! } // returned here
//!
//! assert_eq!(slot.available(), 4);
//! println!("Hit rate: {:.1}%", slot.stats().hit_rate() * 100.0);
//! ```

pub mod memory;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// Re-export commonly used types for convenience
pub use memory::free_list::{FreeList, PoolError, Reusable};
pub use memory::lease::{Lease, Slot};
pub use memory::stats::PoolStats;
pub use memory::tracker::{LeaseSite, LeaseTracker};

/// Version information for the stash crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a single free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of objects created up front; also the most the list will keep
    pub capacity: usize,
    /// Record the call site of every outstanding checkout
    pub track_leases: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            track_leases: false,
        }
    }
}

impl PoolConfig {
    /// A list of the given capacity without lease tracking.
    pub fn untracked(capacity: usize) -> Self {
        Self {
            capacity,
            track_leases: false,
        }
    }

    /// A list of the given capacity that records checkout call sites.
    pub fn tracked(capacity: usize) -> Self {
        Self {
            capacity,
            track_leases: true,
        }
    }

    /// A list that never holds anything; every checkout allocates.
    pub fn disabled() -> Self {
        Self::untracked(0)
    }
}

/// Split a `key=value,key=value` parameter string into a map.
///
/// Keys are trimmed and lower-cased, values are trimmed. Empty segments are
/// skipped so trailing commas are harmless.
pub fn parse_parameters(params: &str) -> Result<HashMap<String, String>, PoolError> {
    let mut parsed = HashMap::new();
    for segment in params.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| PoolError::MalformedParameter(segment.to_string()))?;
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(PoolError::MalformedParameter(segment.to_string()));
        }
        parsed.insert(key, value.trim().to_string());
    }
    Ok(parsed)
}

/// Parse a capacity value from a parameter map entry.
pub fn parse_capacity(key: &str, value: &str) -> Result<usize, PoolError> {
    value.parse::<usize>().map_err(|_| PoolError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parse a boolean flag (`true/false`, `on/off`, `yes/no`, `1/0`).
pub fn parse_flag(key: &str, value: &str) -> Result<bool, PoolError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(PoolError::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, 16);
        assert!(!config.track_leases);
    }

    #[test]
    fn test_pool_config_presets() {
        assert_eq!(PoolConfig::untracked(8).capacity, 8);
        assert!(PoolConfig::tracked(2).track_leases);
        assert_eq!(PoolConfig::disabled().capacity, 0);
    }

    #[test]
    fn test_parse_parameters() {
        let params = parse_parameters(" Vec3 = 64, track=on,,").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["vec3"], "64");
        assert_eq!(params["track"], "on");
    }

    #[test]
    fn test_parse_parameters_rejects_missing_value() {
        let result = parse_parameters("vec3");
        assert!(matches!(result, Err(PoolError::MalformedParameter(_))));

        let result = parse_parameters("=4");
        assert!(matches!(result, Err(PoolError::MalformedParameter(_))));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_capacity("mat4", "12").unwrap(), 12);
        assert!(parse_capacity("mat4", "-1").is_err());
        assert!(parse_flag("track", "YES").unwrap());
        assert!(!parse_flag("track", "0").unwrap());
        assert!(matches!(
            parse_flag("track", "maybe"),
            Err(PoolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
    }
}
