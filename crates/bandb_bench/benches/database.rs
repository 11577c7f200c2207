//! Ban database benchmarks.

use bandb_bench::bench_player;
use bandb_core::{BanDatabase, Config, NoopEnforcer};
use bandb_storage::InMemoryBackend;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

fn populated_file(dir: &TempDir, count: u64) -> std::path::PathBuf {
    let path = dir.path().join("bans.db");
    let mut db = BanDatabase::load_with_config(&path, Config::new().sync_on_write(false)).unwrap();
    for n in 0..count {
        db.add(&mut NoopEnforcer, &bench_player(n), "benchmark", 3_600)
            .unwrap();
    }
    path
}

/// Benchmark appending bans.
fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    group.bench_function("memory", |b| {
        let mut db = BanDatabase::open_with_backend(
            "bench",
            Box::new(InMemoryBackend::new()),
            Config::default(),
        )
        .unwrap();
        let mut n = 0u64;
        b.iter(|| {
            db.add(&mut NoopEnforcer, &bench_player(n), "benchmark", 0)
                .unwrap();
            n += 1;
        });
    });

    group.sample_size(20);
    for sync in [false, true] {
        let label = if sync { "file_sync" } else { "file_nosync" };
        group.bench_function(label, |b| {
            let dir = TempDir::new().unwrap();
            let config = Config::new().sync_on_write(sync);
            let mut db = BanDatabase::load_with_config(&dir.path().join("bans.db"), config).unwrap();
            let mut n = 0u64;
            b.iter(|| {
                db.add(&mut NoopEnforcer, &bench_player(n), "benchmark", 0)
                    .unwrap();
                n += 1;
            });
        });
    }

    group.finish();
}

/// Benchmark loading ban files of growing size.
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(20);

    for count in [100u64, 1_000, 10_000].iter() {
        let dir = TempDir::new().unwrap();
        let path = populated_file(&dir, *count);

        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &path, |b, path| {
            b.iter(|| {
                let db = BanDatabase::load(black_box(path)).unwrap();
                black_box(db.len());
            });
        });
    }

    group.finish();
}

/// Benchmark the ban lookup done when a player connects.
fn bench_find_enforced(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_enforced");

    for count in [100u64, 1_000, 10_000].iter() {
        let dir = TempDir::new().unwrap();
        let db = BanDatabase::load(&populated_file(&dir, *count)).unwrap();
        let absent = bench_player(u64::MAX >> 8);
        let now = bandb_core::unix_now();

        group.bench_with_input(BenchmarkId::new("miss", count), &db, |b, db| {
            b.iter(|| black_box(db.find_enforced(black_box(&absent), now)));
        });
    }

    group.finish();
}

/// Benchmark lifting bans.
fn bench_deactivate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deactivate");
    group.sample_size(20);

    group.bench_function("file_sync", |b| {
        let dir = TempDir::new().unwrap();
        let mut db = BanDatabase::load(&populated_file(&dir, 1_000)).unwrap();
        let mut index = 0usize;
        b.iter(|| {
            black_box(db.deactivate(index % 1_000).unwrap());
            index += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_load,
    bench_find_enforced,
    bench_deactivate,
);

criterion_main!(benches);
