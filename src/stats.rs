//! Chain diagnostics.
//!
//! `Counters` is updated on every link and unlink so that reading the
//! collision count or the longest chain is O(1). `Statistics` is the
//! plain report handed to callers; it can come from the counters or from
//! a full walk of the bucket array, and the two must agree.

use core::fmt;

/// Incrementally maintained chain counters.
#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    collisions: usize,
    max_chain_len: usize,
    resizes: usize,
    /// `by_len[n]` = number of buckets whose chain has exactly `n` entries (n >= 1).
    by_len: Vec<usize>,
}

impl Counters {
    /// Record that a chain grew to `new_len`.
    pub(crate) fn linked(&mut self, new_len: usize) {
        debug_assert!(new_len >= 1);
        if self.by_len.len() <= new_len {
            self.by_len.resize(new_len + 1, 0);
        }
        if new_len >= 2 {
            self.collisions += 1;
            self.by_len[new_len - 1] -= 1;
        }
        self.by_len[new_len] += 1;
        self.max_chain_len = self.max_chain_len.max(new_len);
    }

    /// Record that a chain of `old_len` lost one entry.
    pub(crate) fn unlinked(&mut self, old_len: usize) {
        debug_assert!(old_len >= 1 && old_len < self.by_len.len());
        self.by_len[old_len] -= 1;
        if old_len >= 2 {
            self.collisions -= 1;
            self.by_len[old_len - 1] += 1;
        }
        // The shrunk chain now has old_len - 1 entries, so the maximum can
        // only drop by one.
        if old_len == self.max_chain_len && self.by_len[old_len] == 0 {
            self.max_chain_len -= 1;
        }
    }

    /// Forget every chain; the resize count survives.
    pub(crate) fn reset_chains(&mut self) {
        self.collisions = 0;
        self.max_chain_len = 0;
        self.by_len.clear();
    }

    pub(crate) fn resized(&mut self) {
        self.resizes += 1;
    }

    pub(crate) fn collisions(&self) -> usize {
        self.collisions
    }

    pub(crate) fn max_chain_len(&self) -> usize {
        self.max_chain_len
    }

    pub(crate) fn resizes(&self) -> usize {
        self.resizes
    }

    pub(crate) fn non_empty_buckets(&self) -> usize {
        self.by_len.iter().skip(1).sum()
    }
}

/// Snapshot of table health, rendered by `Display` as a text report.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub size: usize,
    pub capacity: usize,
    pub load_factor: f64,
    pub non_empty_buckets: usize,
    pub max_chain_length: usize,
    pub average_chain_length: f64,
    /// Entries sharing a bucket with an earlier entry: sum of `len - 1` over chains.
    pub collisions: usize,
    pub resizes: usize,
    /// Growth has stopped; `load_factor` may exceed the configured threshold.
    pub at_ceiling: bool,
}

impl Statistics {
    pub(crate) fn from_parts(
        size: usize,
        capacity: usize,
        non_empty_buckets: usize,
        max_chain_length: usize,
        collisions: usize,
        resizes: usize,
        at_ceiling: bool,
    ) -> Self {
        let average_chain_length = if non_empty_buckets > 0 {
            size as f64 / non_empty_buckets as f64
        } else {
            0.0
        };
        Self {
            size,
            capacity,
            load_factor: size as f64 / capacity as f64,
            non_empty_buckets,
            max_chain_length,
            average_chain_length,
            collisions,
            resizes,
            at_ceiling,
        }
    }

    /// Build from a list of per-bucket chain lengths.
    pub(crate) fn from_chain_lengths<I>(lengths: I, resizes: usize, at_ceiling: bool) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let (mut capacity, mut size, mut non_empty, mut max, mut collisions) = (0, 0, 0, 0, 0);
        for len in lengths {
            capacity += 1;
            size += len;
            if len > 0 {
                non_empty += 1;
                collisions += len - 1;
            }
            max = max.max(len);
        }
        Self::from_parts(size, capacity, non_empty, max, collisions, resizes, at_ceiling)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== BucketTable statistics ===")?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "Capacity: {}", self.capacity)?;
        writeln!(f, "Load factor: {:.2}", self.load_factor)?;
        writeln!(
            f,
            "Non-empty buckets: {}/{}",
            self.non_empty_buckets, self.capacity
        )?;
        writeln!(f, "Max chain length: {}", self.max_chain_length)?;
        writeln!(f, "Average chain length: {:.2}", self.average_chain_length)?;
        writeln!(f, "Collisions: {}", self.collisions)?;
        write!(f, "Resizes: {}", self.resizes)?;
        if self.at_ceiling {
            write!(f, "\nCapacity ceiling reached: growth disabled")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recompute(lengths: &[usize]) -> (usize, usize, usize) {
        let s = Statistics::from_chain_lengths(lengths.iter().copied(), 0, false);
        (s.collisions, s.max_chain_length, s.non_empty_buckets)
    }

    /// Invariant: counters driven by link/unlink events match a recomputation
    /// from the resulting chain lengths at every step.
    #[test]
    fn counters_track_chain_lengths() {
        let mut lengths = vec![0usize; 4];
        let mut c = Counters::default();
        let script: &[(usize, bool)] = &[
            (0, true),
            (0, true),
            (1, true),
            (0, true),
            (0, false),
            (2, true),
            (0, false),
            (0, false),
            (1, false),
            (2, false),
        ];
        for &(bucket, link) in script {
            if link {
                lengths[bucket] += 1;
                c.linked(lengths[bucket]);
            } else {
                c.unlinked(lengths[bucket]);
                lengths[bucket] -= 1;
            }
            assert_eq!(
                (c.collisions(), c.max_chain_len(), c.non_empty_buckets()),
                recompute(&lengths),
                "after {:?} on bucket {}",
                if link { "link" } else { "unlink" },
                bucket
            );
        }
    }

    /// Invariant: the maximum drops only when no other chain is as long.
    #[test]
    fn max_survives_when_another_chain_is_as_long() {
        let mut c = Counters::default();
        c.linked(1);
        c.linked(2); // bucket A = 2
        c.linked(1);
        c.linked(2); // bucket B = 2
        c.unlinked(2); // A -> 1
        assert_eq!(c.max_chain_len(), 2);
        c.unlinked(2); // B -> 1
        assert_eq!(c.max_chain_len(), 1);
    }

    #[test]
    fn reset_keeps_resizes() {
        let mut c = Counters::default();
        c.linked(1);
        c.linked(2);
        c.resized();
        c.reset_chains();
        assert_eq!(c.collisions(), 0);
        assert_eq!(c.max_chain_len(), 0);
        assert_eq!(c.non_empty_buckets(), 0);
        assert_eq!(c.resizes(), 1);
    }

    #[test]
    fn report_is_deterministic() {
        let s = Statistics::from_chain_lengths([2, 0, 1, 0], 3, false);
        let text = s.to_string();
        let expected = "=== BucketTable statistics ===\n\
                        Size: 3\n\
                        Capacity: 4\n\
                        Load factor: 0.75\n\
                        Non-empty buckets: 2/4\n\
                        Max chain length: 2\n\
                        Average chain length: 1.50\n\
                        Collisions: 1\n\
                        Resizes: 3";
        assert_eq!(text, expected);

        let at_max = Statistics::from_chain_lengths([5], 0, true);
        assert!(at_max.to_string().ends_with("growth disabled"));
    }

    #[test]
    fn empty_table_has_zero_average() {
        let s = Statistics::from_chain_lengths([0; 16], 0, false);
        assert_eq!(s.average_chain_length, 0.0);
        assert_eq!(s.load_factor, 0.0);
    }
}
