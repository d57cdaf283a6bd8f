//! Store benchmarks

use biosconf_api::{Attribute, AttributeType, AttributeValue, BaseTable, Bound, PendingAttribute, PendingAttributes};
use biosconf_manager::persistence::{self, PersistedState};
use biosconf_manager::{validation, PendingChangeSet, SchemaTable};
use core::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

fn table(size: usize) -> BaseTable {
    (0..size)
        .map(|i| {
            let attribute = Attribute::integer(0).with_bounds(vec![
                Bound::lower_bound(0),
                Bound::upper_bound(1024),
                Bound::scalar_increment(4),
            ]);
            (format!("Attr{:04}", i), attribute)
        })
        .collect()
}

fn proposed(size: usize) -> PendingAttributes {
    (0..size)
        .map(|i| {
            let change = PendingAttribute::new(AttributeType::Integer, AttributeValue::Integer((i as i64 % 256) * 4));
            (format!("Attr{:04}", i), change)
        })
        .collect()
}

fn bench_validate_integer(c: &mut Criterion) {
    let bounds = vec![Bound::lower_bound(0), Bound::upper_bound(1024), Bound::scalar_increment(4)];
    c.bench_function("validate_integer", |b| {
        b.iter(|| validation::validate_integer(black_box(512), black_box(&bounds)))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let schema = SchemaTable::from_table(table(256));
    let changes = proposed(256);
    c.bench_function("reconcile_256", |b| {
        b.iter(|| {
            let mut pending = PendingChangeSet::new();
            pending.reconcile(&schema, black_box(changes.clone())).map(|set| set.len())
        })
    });
}

fn bench_encode_decode(c: &mut Criterion) {
    let state = PersistedState {
        base_table: table(256),
        pending: proposed(64),
        ..PersistedState::default()
    };
    let bytes = persistence::encode(&state.as_view()).unwrap_or_default();

    c.bench_function("encode_256", |b| b.iter(|| persistence::encode(black_box(&state.as_view()))));
    c.bench_function("decode_256", |b| b.iter(|| persistence::decode(black_box(&bytes))));
}

criterion_group!(store_benchmarks, bench_validate_integer, bench_reconcile, bench_encode_decode);

criterion_main!(store_benchmarks);
