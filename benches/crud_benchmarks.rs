use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::{BTreeMap, BTreeSet};
use tree_query::{BTree, Enumerable, RbTree, SortedDictionary, SortedSet};

const N: usize = 10_000;
const DEGREE: usize = 8;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn btree_of(keys: &[i64]) -> BTree<i64> {
    let mut tree = BTree::new(DEGREE).expect("valid degree");
    tree.extend(keys.iter().copied());
    tree
}

// ─── Tree Benchmarks ────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("RbTree", N), |b| {
        b.iter(|| {
            let mut tree = RbTree::new();
            for &k in keys {
                tree.insert(k);
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter(|| btree_of(keys));
    });

    group.bench_function(BenchmarkId::new("SortedSet", N), |b| {
        b.iter(|| {
            let mut set = SortedSet::new();
            for &k in keys {
                set.add(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

fn bench_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_tree: RbTree<i64> = keys.iter().copied().collect();
    let b_tree = btree_of(&keys);
    let std_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("RbTree", N), |b| {
        b.iter(|| keys.iter().filter(|k| rb_tree.contains(k)).count());
    });

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter(|| keys.iter().filter(|k| b_tree.contains(k)).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().filter(|k| std_set.contains(k)).count());
    });

    group.finish();
}

fn bench_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("RbTree", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<RbTree<i64>>(),
            |mut tree| {
                for k in &keys {
                    tree.remove(k);
                }
                tree
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTree", N), |b| {
        b.iter_batched(
            || btree_of(&keys),
            |mut tree| {
                for k in &keys {
                    tree.remove(k);
                }
                tree
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<i64>>(),
            |mut set| {
                for k in &keys {
                    set.remove(k);
                }
                set
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ─── Dictionary Benchmarks ──────────────────────────────────────────────────

fn bench_dictionary_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let dictionary: SortedDictionary<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let std_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("dictionary_get_random");

    group.bench_function(BenchmarkId::new("SortedDictionary", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = dictionary.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = std_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

// ─── Query Benchmarks ───────────────────────────────────────────────────────

fn bench_query_pipeline(c: &mut Criterion) {
    let keys = random_keys(N);

    let mut group = c.benchmark_group("query_filter_order_take");

    group.bench_function(BenchmarkId::new("Enumerable", N), |b| {
        let query = Enumerable::from_slice(&keys)
            .filter(|k| k % 3 == 0)
            .order_by(|k| *k)
            .into_enumerable()
            .take(100);
        b.iter(|| query.to_vec().expect("replayable source"));
    });

    group.bench_function(BenchmarkId::new("Vec", N), |b| {
        b.iter(|| {
            let mut kept: Vec<i64> = keys.iter().copied().filter(|k| k % 3 == 0).collect();
            kept.sort();
            kept.truncate(100);
            kept
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(tree_benches, bench_insert_ordered, bench_insert_random, bench_contains_random, bench_remove_random,);

criterion_group!(dictionary_benches, bench_dictionary_get_random);

criterion_group!(query_benches, bench_query_pipeline);

criterion_main!(tree_benches, dictionary_benches, query_benches);
