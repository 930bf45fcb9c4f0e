//! Table configuration: sizing policy, growth threshold and hasher selection.

use crate::bucket_table::BucketTable;
use crate::error::TableError;
use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket count used when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 16;
/// Growth threshold for `len / capacity`.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// Hard ceiling on the bucket count; growth stops here.
pub const MAX_CAPACITY: usize = 1 << 30;

/// Sizing policy of a [`BucketTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Requested bucket count; rounded up to a power of two on build.
    pub initial_capacity: usize,
    /// The table doubles once `len / capacity` exceeds this value.
    pub load_factor: f64,
    /// Largest bucket count the table may grow to. Must be a power of two.
    pub max_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            max_capacity: MAX_CAPACITY,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidCapacity(self.initial_capacity));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(TableError::InvalidLoadFactor(self.load_factor));
        }
        if !self.max_capacity.is_power_of_two() {
            return Err(TableError::InvalidMaxCapacity(self.max_capacity));
        }
        Ok(())
    }

    /// Bucket count actually allocated: next power of two, clamped to the ceiling.
    pub(crate) fn bucket_count(&self) -> usize {
        self.initial_capacity
            .checked_next_power_of_two()
            .unwrap_or(self.max_capacity)
            .min(self.max_capacity)
    }

    /// Raise the initial capacity so that `len` entries fit without growing.
    pub(crate) fn presized_for(mut self, len: usize) -> Self {
        let needed = (len as f64 / self.load_factor) as usize;
        self.initial_capacity = needed.saturating_add(1).max(self.initial_capacity);
        self
    }
}

/// Builder for tables with a non-default policy or hasher.
///
/// ```
/// use chain_table::{BucketTable, TableBuilder};
///
/// let table: BucketTable<String, u32> = TableBuilder::new()
///     .capacity(100)
///     .load_factor(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(table.capacity(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder<S = DefaultHashBuilder> {
    config: TableConfig,
    hasher: S,
}

impl TableBuilder<DefaultHashBuilder> {
    pub fn new() -> Self {
        Self {
            config: TableConfig::default(),
            hasher: DefaultHashBuilder::default(),
        }
    }
}

impl Default for TableBuilder<DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TableBuilder<S>
where
    S: BuildHasher,
{
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.config.load_factor = load_factor;
        self
    }

    pub fn max_capacity(mut self, max_capacity: usize) -> Self {
        self.config.max_capacity = max_capacity;
        self
    }

    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the hash builder, keeping the sizing policy.
    pub fn hasher<T: BuildHasher>(self, hasher: T) -> TableBuilder<T> {
        TableBuilder {
            config: self.config,
            hasher,
        }
    }

    pub fn build<K, V>(self) -> Result<BucketTable<K, V, S>, TableError> {
        BucketTable::with_config_and_hasher(self.config, self.hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: defaults pass validation and allocate 16 buckets.
    #[test]
    fn defaults_are_valid() {
        let c = TableConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.bucket_count(), 16);
    }

    /// Invariant: requested capacities round up to the next power of two.
    #[test]
    fn bucket_count_rounds_up() {
        for (req, want) in [(1, 1), (2, 2), (3, 4), (17, 32), (64, 64), (1000, 1024)] {
            let c = TableConfig {
                initial_capacity: req,
                ..TableConfig::default()
            };
            assert_eq!(c.bucket_count(), want, "requested {}", req);
        }
    }

    /// Invariant: the ceiling clamps oversized requests, including ones whose
    /// next power of two overflows `usize`.
    #[test]
    fn bucket_count_is_clamped() {
        let c = TableConfig {
            initial_capacity: usize::MAX,
            ..TableConfig::default()
        };
        assert_eq!(c.bucket_count(), MAX_CAPACITY);

        let c = TableConfig {
            initial_capacity: 100,
            max_capacity: 8,
            ..TableConfig::default()
        };
        assert_eq!(c.bucket_count(), 8);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        let zero = TableConfig {
            initial_capacity: 0,
            ..TableConfig::default()
        };
        assert_eq!(zero.validate(), Err(TableError::InvalidCapacity(0)));

        for lf in [0.0, -1.0, f64::INFINITY] {
            let c = TableConfig {
                load_factor: lf,
                ..TableConfig::default()
            };
            assert_eq!(c.validate(), Err(TableError::InvalidLoadFactor(lf)));
        }
        let nan = TableConfig {
            load_factor: f64::NAN,
            ..TableConfig::default()
        };
        assert!(matches!(nan.validate(), Err(TableError::InvalidLoadFactor(_))));

        for max in [0, 3, 48] {
            let c = TableConfig {
                max_capacity: max,
                ..TableConfig::default()
            };
            assert_eq!(c.validate(), Err(TableError::InvalidMaxCapacity(max)));
        }
    }

    /// Invariant: presizing uses `max(len / load_factor + 1, capacity)`.
    #[test]
    fn presizing_avoids_immediate_growth() {
        let c = TableConfig::default().presized_for(100);
        assert_eq!(c.initial_capacity, 134);
        assert_eq!(c.bucket_count(), 256);

        let small = TableConfig::default().presized_for(3);
        assert_eq!(small.initial_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn builder_propagates_errors() {
        let r = TableBuilder::new().capacity(0).build::<u32, u32>();
        assert!(matches!(r, Err(TableError::InvalidCapacity(0))));
        let r = TableBuilder::new().load_factor(-0.5).build::<u32, u32>();
        assert!(matches!(r, Err(TableError::InvalidLoadFactor(_))));
    }
}
