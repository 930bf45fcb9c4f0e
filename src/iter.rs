//! Lazy views over a table: keys, values and entries.
//!
//! All three walk buckets in ascending index order and each chain in link
//! order (most recently inserted first). A view stops after yielding the
//! number of entries the table held when it was created.
//!
//! Views borrow the table, so the table cannot be mutated while one is
//! alive; the borrow checker rules out the resize-during-iteration case.

use crate::chain::{Arena, Entry, EntryKey};
use crate::error::TableError;
use core::iter::FusedIterator;

/// Position shared by the three views.
struct Cursor<'a, K, V> {
    heads: &'a [Option<EntryKey>],
    arena: &'a Arena<K, V>,
    bucket: usize,
    current: Option<EntryKey>,
    visited: usize,
    total: usize,
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            heads: self.heads,
            arena: self.arena,
            bucket: self.bucket,
            current: self.current,
            visited: self.visited,
            total: self.total,
        }
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn new(heads: &'a [Option<EntryKey>], arena: &'a Arena<K, V>, total: usize) -> Self {
        let mut c = Self {
            heads,
            arena,
            bucket: 0,
            current: None,
            visited: 0,
            total,
        };
        c.seek_bucket();
        c
    }

    /// Move `bucket` forward to the first non-empty slot at or after it.
    fn seek_bucket(&mut self) {
        while self.bucket < self.heads.len() && self.heads[self.bucket].is_none() {
            self.bucket += 1;
        }
        self.current = self.heads.get(self.bucket).copied().flatten();
    }

    fn advance(&mut self) -> Option<&'a Entry<K, V>> {
        if self.visited >= self.total {
            return None;
        }
        let arena = self.arena;
        let entry = &arena[self.current?];
        self.visited += 1;
        self.current = entry.next;
        if self.current.is_none() {
            self.bucket += 1;
            self.seek_bucket();
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.total - self.visited;
        (n, Some(n))
    }
}

/// Keys in bucket-then-chain order.
pub struct Keys<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

/// Values in bucket-then-chain order.
pub struct Values<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

/// `(key, value)` pairs in bucket-then-chain order.
pub struct Entries<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(heads: &'a [Option<EntryKey>], arena: &'a Arena<K, V>, total: usize) -> Self {
        Self {
            cursor: Cursor::new(heads, arena, total),
        }
    }

    /// Like `next`, but reports exhaustion as an error.
    pub fn try_next(&mut self) -> Result<&'a K, TableError> {
        self.next().ok_or(TableError::IteratorExhausted)
    }
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(heads: &'a [Option<EntryKey>], arena: &'a Arena<K, V>, total: usize) -> Self {
        Self {
            cursor: Cursor::new(heads, arena, total),
        }
    }

    pub fn try_next(&mut self) -> Result<&'a V, TableError> {
        self.next().ok_or(TableError::IteratorExhausted)
    }
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(heads: &'a [Option<EntryKey>], arena: &'a Arena<K, V>, total: usize) -> Self {
        Self {
            cursor: Cursor::new(heads, arena, total),
        }
    }

    pub fn try_next(&mut self) -> Result<(&'a K, &'a V), TableError> {
        self.next().ok_or(TableError::IteratorExhausted)
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|e| &e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|e| &e.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance().map(|e| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<K, V> Clone for Entries<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
        }
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> ExactSizeIterator for Entries<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Entries<'_, K, V> {}
