// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldtree::{
    BottomUpFieldTree, CoverFieldTree, FieldConfig, FieldTreeGeneric, PartitionFieldTree, Rect,
    Topology,
};

const EXTENT: i64 = 4096;

fn gen_grid_rects(n: usize, cell: i64) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    let half = n as i64 * cell / 2;
    for y in 0..n {
        for x in 0..n {
            let cx = x as i64 * cell - half + cell / 2;
            let cy = y as i64 * cell - half + cell / 2;
            out.push(Rect::from_center_size(cx, cy, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_in(&mut self, span: i64) -> i64 {
        (self.next_u64() % span.unsigned_abs()) as i64 - span / 2
    }
}

fn gen_random_rects(count: usize, span: i64, max_side: i64) -> Vec<Rect> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let cx = rng.next_in(span);
            let cy = rng.next_in(span);
            let w = rng.next_in(max_side).abs() + 1;
            let h = rng.next_in(max_side).abs() + 1;
            Rect::from_center_size(cx, cy, w, h)
        })
        .collect()
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: i64) -> Vec<Rect> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.next_in(EXTENT), rng.next_in(EXTENT));
        for _ in 0..per_cluster {
            let dx = rng.next_in(spread);
            let dy = rng.next_in(spread);
            out.push(Rect::from_center_size(cx + dx, cy + dy, 12, 12));
        }
    }
    out
}

fn cover() -> CoverFieldTree<Rect> {
    CoverFieldTree::with_config(
        FieldConfig::new(EXTENT, EXTENT)
            .with_capacity(8)
            .with_overlap(0.3),
    )
}

fn bottom_up() -> BottomUpFieldTree<Rect> {
    BottomUpFieldTree::with_config(FieldConfig::default().with_capacity(8).with_overlap(0.3))
}

fn partition() -> PartitionFieldTree<Rect> {
    PartitionFieldTree::with_config(FieldConfig::new(EXTENT, EXTENT).with_capacity(8))
}

fn built<Topo: Topology>(
    make: fn() -> FieldTreeGeneric<Rect, Topo>,
    rects: &[Rect],
) -> FieldTreeGeneric<Rect, Topo> {
    let mut tree = make();
    tree.add_many(rects.iter().copied());
    tree
}

fn bench_insert_one_by_one<Topo: Topology>(
    c: &mut Criterion,
    name: &str,
    make: fn() -> FieldTreeGeneric<Rect, Topo>,
) {
    let mut group = c.benchmark_group(name);
    for &n in &[32_usize, 64, 128] {
        let rects = gen_grid_rects(n, 24);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("add_grid_n{n}"), |b| {
            b.iter_batched(
                make,
                |mut tree| {
                    for r in &rects {
                        tree.add(*r);
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("add_many_grid_n{n}"), |b| {
            b.iter_batched(
                make,
                |mut tree| {
                    tree.add_many(rects.iter().copied());
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    let rects = gen_random_rects(4096, EXTENT, 64);
    group.bench_function("add_many_random", |b| {
        b.iter_batched(
            make,
            |mut tree| {
                tree.add_many(rects.iter().copied());
                black_box(tree.node_count());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_queries<Topo: Topology>(
    c: &mut Criterion,
    name: &str,
    make: fn() -> FieldTreeGeneric<Rect, Topo>,
) {
    let mut group = c.benchmark_group(name);
    let rects = gen_clustered_rects(16, 256, 256);
    let tree = built(make, &rects);
    group.bench_function("window_query_many", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in 0..256_i64 {
                let x = (q % 16) * 256 - EXTENT / 2;
                let y = (q / 16) * 256 - EXTENT / 2;
                total += tree.window_query(x, y, 400, 400).len();
            }
            black_box(total);
        });
    });
    group.bench_function("range_query_many", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in 0..256_i64 {
                let x = (q % 16) * 256 - EXTENT / 2;
                let y = (q / 16) * 256 - EXTENT / 2;
                total += tree.range_query(x, y, 200).len();
            }
            black_box(total);
        });
    });
    group.bench_function("find_nearest_many", |b| {
        b.iter(|| {
            let mut total = 0_usize;
            for q in 0..256_i64 {
                let x = (q % 16) * 256 - EXTENT / 2;
                let y = (q / 16) * 256 - EXTENT / 2;
                total += tree.find_nearest(x, y).len();
            }
            black_box(total);
        });
    });
    group.bench_function("nearest_iter_first_32", |b| {
        b.iter(|| black_box(tree.nearest_iter(0, 0).take(32).count()));
    });
    group.bench_function("pop_nearest_drain", |b| {
        b.iter_batched(
            || built(make, &rects),
            |mut tree| {
                while let Some(r) = tree.pop_nearest(0, 0) {
                    black_box(r);
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_cover(c: &mut Criterion) {
    bench_insert_one_by_one(c, "cover_insert", cover);
    bench_queries(c, "cover_query", cover);
}

fn bench_bottom_up(c: &mut Criterion) {
    bench_insert_one_by_one(c, "bottom_up_insert", bottom_up);
    bench_queries(c, "bottom_up_query", bottom_up);
}

fn bench_partition(c: &mut Criterion) {
    bench_insert_one_by_one(c, "partition_insert", partition);
    bench_queries(c, "partition_query", partition);
}

criterion_group!(benches, bench_cover, bench_bottom_up, bench_partition);
criterion_main!(benches);
