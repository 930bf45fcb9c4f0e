//! Chains: singly linked entry lists stored in a shared arena.
//!
//! Every entry lives in one `SlotMap`; a chain is a head handle in the
//! bucket array followed by `next` links between entries. Relinking an
//! entry moves a handle, never the key or value.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena handle of one entry.
    pub(crate) struct EntryKey;
}

pub(crate) type Arena<K, V> = SlotMap<EntryKey, Entry<K, V>>;

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Hash computed once at insertion; growth re-buckets from this.
    pub(crate) hash: u64,
    pub(crate) next: Option<EntryKey>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            next: None,
        }
    }
}

/// Spread the high bits into the low ones, then mask to `capacity` (a power of two).
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    let spread = hash ^ (hash >> 16);
    (spread as usize) & (capacity - 1)
}

/// Walks the handles of one chain in link order.
pub(crate) struct Links<'a, K, V> {
    arena: &'a Arena<K, V>,
    cur: Option<EntryKey>,
}

impl<'a, K, V> Links<'a, K, V> {
    pub(crate) fn new(arena: &'a Arena<K, V>, head: Option<EntryKey>) -> Self {
        Self { arena, cur: head }
    }
}

impl<'a, K, V> Iterator for Links<'a, K, V> {
    type Item = (EntryKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let e = &self.arena[k];
        self.cur = e.next;
        Some((k, e))
    }
}
