//! chain-table: a single-threaded hash table using separate chaining,
//! power-of-two bucket arrays and built-in chain diagnostics.
//!
//! Internal Design:
//!
//! Summary
//! - `BucketTable<K, V, S>` owns a bucket array of chain heads and an
//!   arena (`slotmap::SlotMap`) holding every entry. Chains are singly
//!   linked through arena handles, so entries never move in memory when
//!   chains are relinked.
//! - Bucket index: the entry's 64-bit hash, high bits folded into the low
//!   ones (`h ^ (h >> 16)`), masked with `capacity - 1`.
//! - New keys are linked at the head of their chain. Iteration therefore
//!   visits buckets in ascending order and, within a bucket, the most
//!   recently inserted key first. This order is observable but is not a
//!   stable contract.
//!
//! Growth
//! - Checked after each insertion of a new key: while `len / capacity`
//!   exceeds the load factor (0.75 by default) the bucket array doubles.
//! - Doubling relinks existing entries from their stored hash; `K: Hash`
//!   is never called after insertion and no key or value is moved.
//! - Capacity never shrinks. At the configured ceiling (2^30 buckets by
//!   default) growth stops and the load factor is allowed to exceed the
//!   threshold; `at_capacity_ceiling()` and the statistics report say so.
//!
//! Diagnostics
//! - Collision count, longest chain and resize count are maintained on
//!   every link/unlink. `statistics()` reads them in O(1);
//!   `scan_statistics()` recomputes the same report by walking every chain,
//!   and the two always agree.
//!
//! Constraints
//! - Single-threaded: the table is `!Send`/`!Sync`. Callers that share
//!   one across threads must wrap it in their own lock.
//! - Views (`keys`, `values`, `entries`) borrow the table, so mutation
//!   while a view is alive does not compile.
//! - Reentrancy: calling back into the same table from `K: Eq`/`K: Hash`
//!   panics in debug builds.
//! - Keys are immutable once stored; values can be replaced with `put` or
//!   edited through `get_mut`.

mod bucket_table;
mod bucket_table_proptest;
mod chain;
pub mod config;
mod error;
pub mod iter;
mod reentrancy;
pub mod stats;

// Public surface
pub use bucket_table::BucketTable;
pub use config::{TableBuilder, TableConfig};
pub use error::TableError;
pub use iter::{Entries, Keys, Values};
pub use stats::Statistics;
