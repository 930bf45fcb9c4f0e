#![cfg(test)]

// Property tests for BucketTable kept inside the crate so they can compare
// the cached counters against a full scan.

use crate::bucket_table::BucketTable;
use crate::config::TableBuilder;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations: indices shrink toward earlier keys and the pool
// itself shrinks, which keeps counterexamples small.
#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    ContainsValue(i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), -8i32..8).prop_map(|(i, v)| Op::Put(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,4}".prop_map(Op::Contains),
            1 => (-8i32..8).prop_map(Op::ContainsValue),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap. After every
// operation:
// - `len`/`is_empty` match the model;
// - capacity is a power of two and never decreases;
// - the load factor is within the threshold unless growth is capped;
// - cached counters equal a from-scratch scan;
// - views yield exactly the live entries, each once.
fn run<S: BuildHasher>(
    mut sut: BucketTable<String, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            Op::Put(i, v) => {
                let k = pool[i].clone();
                let prev = sut.put(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
                prop_assert_eq!(sut.get(&k), Some(&v));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                prop_assert!(!sut.contains_key(k.as_str()));
            }
            Op::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                prop_assert_eq!(*sut.get_or(k.as_str(), &i32::MIN), *model.get(k).unwrap_or(&i32::MIN));
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            Op::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|&m| m == v));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let keys: Vec<_> = sut.keys().cloned().collect();
                let distinct: BTreeSet<_> = keys.iter().cloned().collect();
                prop_assert_eq!(keys.len(), distinct.len(), "a key was visited twice");
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(distinct, m_keys);

                let entries: HashMap<String, i32> =
                    sut.entries().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&entries, &model);
                prop_assert_eq!(sut.values().len(), model.len());
                prop_assert_eq!(sut.entry_snapshot().len(), model.len());
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());

        let cap = sut.capacity();
        prop_assert!(cap.is_power_of_two());
        prop_assert!(cap >= last_capacity, "capacity shrank from {} to {}", last_capacity, cap);
        last_capacity = cap;

        if !sut.at_capacity_ceiling() {
            prop_assert!(sut.load_factor() <= sut.config().load_factor);
        }

        let chain_total: usize = (0..cap).filter_map(|b| sut.chain_len(b)).sum();
        prop_assert_eq!(chain_total, sut.len());
        prop_assert_eq!(sut.statistics(), sut.scan_statistics());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: BucketTable<String, i32> = BucketTable::with_capacity(2).unwrap();
        run(sut, pool, ops)?;
    }
}

// Every key hashes to 0, so the whole table is one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same invariants with every key colliding: stresses chain unlinking at
// every position and the longest-chain counter.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = BucketTable::with_capacity_and_hasher(2, ConstBuildHasher).unwrap();
        run(sut, pool, ops)?;
    }
}

// Same invariants with growth capped at 8 buckets, so the load factor is
// allowed to exceed the threshold.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_capped((pool, ops) in arb_scenario()) {
        let sut = TableBuilder::new().capacity(1).max_capacity(8).build().unwrap();
        run(sut, pool, ops)?;
    }
}

// Iteration completeness: N distinct puts yield exactly N distinct keys.
proptest! {
    #[test]
    fn prop_iteration_yields_each_key_once(keys in proptest::collection::hash_set(any::<u32>(), 0..300)) {
        let mut t: BucketTable<u32, u32> = BucketTable::new();
        for &k in &keys {
            t.put(k, k.wrapping_mul(3));
        }
        let seen: Vec<u32> = t.keys().copied().collect();
        prop_assert_eq!(seen.len(), keys.len());
        let seen_set: std::collections::HashSet<u32> = seen.into_iter().collect();
        prop_assert_eq!(&seen_set, &keys);
        for (k, v) in t.entries() {
            prop_assert_eq!(*v, k.wrapping_mul(3));
        }
    }
}
