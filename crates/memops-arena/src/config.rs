//! Allocator configuration parameters.

use std::error::Error;
use std::fmt;

/// How the free-range list stores its descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreeListStorage {
    /// Grow by a fixed number of slots whenever an insertion finds the list
    /// full. Growth is linear, not doubling: the list is expected to stay
    /// short relative to the buffer.
    Growable {
        /// Slots added per growth step.
        increment: u32,
    },
    /// Never grow. Inserting into a full list is a sizing error.
    Fixed {
        /// Maximum number of descriptors.
        capacity: u32,
    },
}

impl FreeListStorage {
    /// Growable storage with the default increment.
    pub const fn growable() -> Self {
        Self::Growable {
            increment: AllocatorConfig::DEFAULT_GROWTH_INCREMENT,
        }
    }

    /// Fixed storage holding at most `capacity` descriptors.
    pub const fn fixed(capacity: u32) -> Self {
        Self::Fixed { capacity }
    }

    /// Number of slots reserved up front.
    pub fn initial_slots(&self) -> usize {
        match *self {
            Self::Growable { increment } => increment as usize,
            Self::Fixed { capacity } => capacity as usize,
        }
    }
}

impl Default for FreeListStorage {
    fn default() -> Self {
        Self::growable()
    }
}

/// Configuration shared by both allocators.
///
/// Fields that only the lazy allocator reads (`defrag_threshold`,
/// `block_pool_capacity`) are ignored by the eager one. Validated at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Storage policy of the free-range list.
    ///
    /// Default: growable in steps of 16 slots.
    pub storage: FreeListStorage,

    /// Free-list length at which the lazy allocator defragments on its own.
    /// If a pass leaves the list at or above this length, the next pass
    /// runs after this many further frees.
    ///
    /// Default: 10_000. Must be non-zero, and no larger than the capacity
    /// when storage is fixed.
    pub defrag_threshold: u32,

    /// Maximum number of released handles the lazy allocator keeps for
    /// reuse. Zero disables pooling.
    ///
    /// Default: 1024.
    pub block_pool_capacity: u32,
}

impl AllocatorConfig {
    /// Default growth step of a growable free list.
    pub const DEFAULT_GROWTH_INCREMENT: u32 = 16;

    /// Default automatic defragmentation threshold.
    pub const DEFAULT_DEFRAG_THRESHOLD: u32 = 10_000;

    /// Default handle pool capacity.
    pub const DEFAULT_BLOCK_POOL_CAPACITY: u32 = 1024;

    /// Config for an eager allocator: growable storage, defaults elsewhere.
    pub fn eager() -> Self {
        Self {
            storage: FreeListStorage::growable(),
            defrag_threshold: Self::DEFAULT_DEFRAG_THRESHOLD,
            block_pool_capacity: Self::DEFAULT_BLOCK_POOL_CAPACITY,
        }
    }

    /// Config for a lazy allocator whose free list holds at most
    /// `free_range_capacity` descriptors.
    ///
    /// The default threshold is clamped to the capacity so a full list
    /// always gets a defragmentation pass before it overflows.
    pub fn lazy(free_range_capacity: u32) -> Self {
        Self {
            storage: FreeListStorage::fixed(free_range_capacity),
            defrag_threshold: Self::DEFAULT_DEFRAG_THRESHOLD.min(free_range_capacity),
            block_pool_capacity: Self::DEFAULT_BLOCK_POOL_CAPACITY,
        }
    }

    /// Check the storage policy. This is all the eager allocator reads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.storage {
            FreeListStorage::Growable { increment: 0 } => Err(ConfigError::ZeroGrowthIncrement),
            FreeListStorage::Fixed { capacity: 0 } => Err(ConfigError::ZeroFixedCapacity),
            _ => Ok(()),
        }
    }

    /// Check the storage policy and the defragmentation threshold, as the
    /// lazy allocator does at construction.
    pub fn validate_lazy(&self) -> Result<(), ConfigError> {
        self.validate()?;
        check_threshold(self.defrag_threshold, self.storage)
    }
}

/// A threshold must be non-zero and, with fixed storage, fit the list.
pub(crate) fn check_threshold(
    threshold: u32,
    storage: FreeListStorage,
) -> Result<(), ConfigError> {
    if threshold == 0 {
        return Err(ConfigError::ZeroDefragThreshold);
    }
    if let FreeListStorage::Fixed { capacity } = storage {
        if threshold > capacity {
            return Err(ConfigError::ThresholdExceedsCapacity {
                threshold,
                capacity,
            });
        }
    }
    Ok(())
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::eager()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`AllocatorConfig::validate()`] and
/// [`AllocatorConfig::validate_lazy()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Growable storage with a growth step of zero would never grow.
    ZeroGrowthIncrement,
    /// Fixed storage with no slots cannot hold the initial range.
    ZeroFixedCapacity,
    /// A threshold of zero is meaningless.
    ZeroDefragThreshold,
    /// The fixed list would overflow before defragmentation kicks in.
    ThresholdExceedsCapacity {
        /// The configured threshold.
        threshold: u32,
        /// The configured fixed capacity.
        capacity: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroGrowthIncrement => write!(f, "growth increment must be at least 1"),
            Self::ZeroFixedCapacity => write!(f, "fixed free-list capacity must be at least 1"),
            Self::ZeroDefragThreshold => write!(f, "defrag threshold must be at least 1"),
            Self::ThresholdExceedsCapacity {
                threshold,
                capacity,
            } => write!(
                f,
                "defrag threshold {threshold} exceeds fixed free-list capacity {capacity}"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_defaults_are_valid() {
        let config = AllocatorConfig::eager();
        assert_eq!(config.storage, FreeListStorage::Growable { increment: 16 });
        assert_eq!(config.defrag_threshold, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lazy_clamps_threshold_to_capacity() {
        let config = AllocatorConfig::lazy(64);
        assert_eq!(config.defrag_threshold, 64);
        assert!(config.validate_lazy().is_ok());

        let config = AllocatorConfig::lazy(50_000);
        assert_eq!(config.defrag_threshold, 10_000);
    }

    #[test]
    fn zero_increment_rejected() {
        let config = AllocatorConfig {
            storage: FreeListStorage::Growable { increment: 0 },
            ..AllocatorConfig::eager()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGrowthIncrement));
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            AllocatorConfig::lazy(0).validate(),
            Err(ConfigError::ZeroFixedCapacity)
        );
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = AllocatorConfig {
            defrag_threshold: 0,
            ..AllocatorConfig::eager()
        };
        assert_eq!(config.validate_lazy(), Err(ConfigError::ZeroDefragThreshold));
        // The eager allocator never reads the threshold.
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_above_fixed_capacity_rejected() {
        let config = AllocatorConfig {
            defrag_threshold: 129,
            ..AllocatorConfig::lazy(128)
        };
        assert_eq!(
            config.validate_lazy(),
            Err(ConfigError::ThresholdExceedsCapacity {
                threshold: 129,
                capacity: 128
            })
        );
    }

    #[test]
    fn eager_config_with_small_fixed_list_is_valid() {
        let config = AllocatorConfig {
            storage: FreeListStorage::fixed(8),
            ..AllocatorConfig::eager()
        };
        assert_eq!(config.validate(), Ok(()));
        assert!(config.validate_lazy().is_err());
    }

    #[test]
    fn growable_storage_ignores_threshold_size() {
        let config = AllocatorConfig {
            defrag_threshold: u32::MAX,
            ..AllocatorConfig::eager()
        };
        assert!(config.validate_lazy().is_ok());
    }
}
