//! BucketTable: separate-chaining hash table over an entry arena.

use crate::chain::{bucket_index, Arena, Entry, EntryKey, Links};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::iter::{Entries, Keys, Values};
use crate::reentrancy::OpCheck;
use crate::stats::{Counters, Statistics};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::SlotMap;

/// Hash table with one singly linked chain per bucket.
///
/// Capacity (the bucket count) is always a power of two. After each
/// insertion of a new key the table doubles while `len / capacity` exceeds
/// the load factor, until the configured ceiling is reached; past the
/// ceiling the load factor grows without bound. Capacity never shrinks.
pub struct BucketTable<K, V, S = DefaultHashBuilder> {
    hasher: S,
    config: TableConfig,
    heads: Vec<Option<EntryKey>>,
    chain_lens: Vec<usize>,
    arena: Arena<K, V>,
    counters: Counters,
    ops: OpCheck,
}

impl<K, V> BucketTable<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Table with at least `capacity` buckets, rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for BucketTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> BucketTable<K, V>
where
    K: Eq + Hash,
{
    /// Bulk-load from pairs; later duplicates overwrite earlier ones.
    ///
    /// The table is sized up front as `max(n / load_factor + 1, 16)` buckets
    /// so loading `n` pairs never triggers growth.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
    {
        let pairs = pairs.into_iter();
        let config = TableConfig::default().presized_for(pairs.len());
        let mut table = Self::from_valid_config(config, DefaultHashBuilder::default());
        for (k, v) in pairs {
            table.put(k, v);
        }
        table
    }
}

impl<K, V, S> BucketTable<K, V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_valid_config(TableConfig::default(), hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        let config = TableConfig {
            initial_capacity: capacity,
            ..TableConfig::default()
        };
        Self::with_config_and_hasher(config, hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self::from_valid_config(config, hasher))
    }

    fn from_valid_config(config: TableConfig, hasher: S) -> Self {
        let capacity = config.bucket_count();
        Self {
            hasher,
            config,
            heads: vec![None; capacity],
            chain_lens: vec![0; capacity],
            arena: SlotMap::with_key(),
            counters: Counters::default(),
            ops: OpCheck::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.heads.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// True once growth is disabled because the bucket count hit the ceiling.
    pub fn at_capacity_ceiling(&self) -> bool {
        self.capacity() >= self.config.max_capacity
    }

    /// Length of the chain hanging off `bucket`; `None` if out of range.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.chain_lens.get(bucket).copied()
    }

    /// Bucket a key maps to at the current capacity.
    pub fn bucket_of<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        bucket_index(self.hasher.hash_one(q), self.capacity())
    }

    /// Number of times the bucket array has doubled.
    pub fn resize_count(&self) -> usize {
        self.counters.resizes()
    }

    /// Entries that share a bucket with another entry: sum of `len - 1` over chains.
    pub fn collision_count(&self) -> usize {
        self.counters.collisions()
    }

    pub fn max_chain_len(&self) -> usize {
        self.counters.max_chain_len()
    }

    fn find_key<Q>(&self, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        let head = self.heads[bucket_index(hash, self.capacity())];
        Links::new(&self.arena, head)
            .find(|(_, e)| e.hash == hash && e.key.borrow() == q)
            .map(|(k, _)| k)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin();
        self.find_key(q).map(|k| &self.arena[k].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let found = {
            let _op = self.ops.begin();
            self.find_key(q)
        };
        found.map(move |k| &mut self.arena[k].value)
    }

    /// Value for `q`, or `default` when the key is absent.
    pub fn get_or<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).is_some()
    }

    /// Linear scan over every chain.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Insert or overwrite. Returns the replaced value when `key` was present.
    ///
    /// A new key is linked at the head of its chain; if the load factor is
    /// then exceeded and the ceiling allows, the table grows before returning.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        K: Eq + Hash,
    {
        let (hash, bucket, existing) = {
            let _op = self.ops.begin();
            let hash = self.hasher.hash_one(&key);
            let bucket = bucket_index(hash, self.capacity());
            let existing = Links::new(&self.arena, self.heads[bucket])
                .find(|(_, e)| e.hash == hash && e.key == key)
                .map(|(k, _)| k);
            (hash, bucket, existing)
        };
        if let Some(k) = existing {
            return Some(core::mem::replace(&mut self.arena[k].value, value));
        }
        let k = self.arena.insert(Entry::new(key, value, hash));
        self.link_front(bucket, k);
        self.grow_if_needed();
        None
    }

    /// Remove `q`, returning its value; `None` if absent. Never shrinks.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _op = self.ops.begin();
        let hash = self.hasher.hash_one(q);
        let bucket = bucket_index(hash, self.capacity());

        let mut prev: Option<EntryKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let e = &self.arena[k];
            if e.hash == hash && e.key.borrow() == q {
                let next = e.next;
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.arena[p].next = next,
                }
                self.counters.unlinked(self.chain_lens[bucket]);
                self.chain_lens[bucket] -= 1;
                // Unlinked above, so the chain is consistent before K/V drop.
                return self.arena.remove(k).map(|e| (e.key, e.value));
            }
            prev = cur;
            cur = e.next;
        }
        None
    }

    /// Drop every entry. Capacity and the resize count are kept.
    pub fn clear(&mut self) {
        self.heads.fill(None);
        self.chain_lens.fill(0);
        self.counters.reset_chains();
        self.arena.clear();
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(&self.heads, &self.arena, self.len())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.heads, &self.arena, self.len())
    }

    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries::new(&self.heads, &self.arena, self.len())
    }

    /// Same as [`entries`](Self::entries).
    pub fn iter(&self) -> Entries<'_, K, V> {
        self.entries()
    }

    pub fn key_snapshot(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.keys().cloned().collect()
    }

    pub fn value_snapshot(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values().cloned().collect()
    }

    pub fn entry_snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.entries()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Report built from the incrementally maintained counters.
    pub fn statistics(&self) -> Statistics {
        Statistics::from_parts(
            self.len(),
            self.capacity(),
            self.counters.non_empty_buckets(),
            self.counters.max_chain_len(),
            self.counters.collisions(),
            self.counters.resizes(),
            self.at_capacity_ceiling(),
        )
    }

    /// Report recomputed by walking every chain link; ignores all cached counts.
    pub fn scan_statistics(&self) -> Statistics {
        Statistics::from_chain_lengths(
            self.heads
                .iter()
                .map(|&head| Links::new(&self.arena, head).count()),
            self.counters.resizes(),
            self.at_capacity_ceiling(),
        )
    }

    fn link_front(&mut self, bucket: usize, k: EntryKey) {
        self.arena[k].next = self.heads[bucket];
        self.heads[bucket] = Some(k);
        self.chain_lens[bucket] += 1;
        self.counters.linked(self.chain_lens[bucket]);
    }

    fn grow_if_needed(&mut self) {
        while self.load_factor() > self.config.load_factor && !self.at_capacity_ceiling() {
            self.grow();
        }
    }

    /// Double the bucket array and relink every entry from its stored hash.
    ///
    /// Old buckets are drained in ascending order, each chain in link order,
    /// and every entry is pushed onto the front of its new chain. Chain
    /// counters are rebuilt by the relinking itself.
    fn grow(&mut self) {
        let capacity = self.capacity() * 2;
        let old_heads = core::mem::replace(&mut self.heads, vec![None; capacity]);
        self.chain_lens = vec![0; capacity];
        self.counters.reset_chains();

        for head in old_heads {
            let mut cur = head;
            while let Some(k) = cur {
                cur = self.arena[k].next;
                let bucket = bucket_index(self.arena[k].hash, capacity);
                self.link_front(bucket, k);
            }
        }
        self.counters.resized();
    }
}

impl<K, V, S> Extend<(K, V)> for BucketTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for BucketTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let config = TableConfig::default().presized_for(iter.size_hint().0);
        let mut table = Self::from_valid_config(config, DefaultHashBuilder::default());
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a BucketTable<K, V, S>
where
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

/// `{k1=v1, k2=v2}` in bucket-then-chain order.
impl<K, V, S> fmt::Display for BucketTable<K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> fmt::Debug for BucketTable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
