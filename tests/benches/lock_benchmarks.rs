//! # Value-Lock Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | create_deposit | < 50µs |
//! | withdraw (either party) | < 50µs |
//! | get_info | < 10µs |
//! | handler round trip (JSON) | < 200µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use value_lock::{
    AssetId, InMemoryDepositStore, InMemoryEventLog, InMemoryLedger, LockRequest,
    LockRequestEnvelope, ManualClock, Value, ValueLockApi, ValueLockEngine, ValueLockHandler,
    MS_PER_MINUTE,
};

const ALICE: [u8; 20] = [0xA1; 20];
const BOB: [u8; 20] = [0xB0; 20];
const T0: u64 = 1_700_000_000_000;

type Engine =
    ValueLockEngine<Arc<ManualClock>, InMemoryLedger, InMemoryEventLog, InMemoryDepositStore>;

fn engine() -> (Engine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let engine = ValueLockEngine::new(
        clock.clone(),
        InMemoryLedger::new(),
        InMemoryEventLog::new(),
        InMemoryDepositStore::new(),
    );
    (engine, clock)
}

fn qnt(amount: u128) -> Value {
    Value::new(AssetId::new("QNT"), amount)
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("value-lock-create");
    let (engine, _) = engine();

    group.bench_function("create_deposit", |b| {
        b.iter(|| black_box(engine.create_deposit(ALICE, qnt(100), BOB, 60).is_ok()))
    });
    group.finish();
}

fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("value-lock-lifecycle");

    for size in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("create_then_claim", size), &size, |b, &n| {
            b.iter(|| {
                let (engine, clock) = engine();
                let ids: Vec<_> = (0..n)
                    .filter_map(|_| engine.create_deposit(ALICE, qnt(1), BOB, 1).ok())
                    .map(|(id, _)| id)
                    .collect();
                clock.advance(MS_PER_MINUTE);
                for id in ids {
                    black_box(engine.withdraw_by_recipient(BOB, id).is_ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("value-lock-queries");
    let (engine, _) = engine();
    let ids: Vec<_> = (0..1_000)
        .filter_map(|_| engine.create_deposit(ALICE, qnt(1), BOB, 10).ok())
        .map(|(id, _)| id)
        .collect();

    group.bench_function("get_info", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % ids.len();
            black_box(engine.get_info(ids[i]).is_ok())
        })
    });
    group.bench_function("time_until_unlock", |b| {
        b.iter(|| black_box(engine.time_until_unlock(ids[0]).ok()))
    });
    group.finish();
}

fn bench_handler(c: &mut Criterion) {
    let mut group = c.benchmark_group("value-lock-handler");
    let (engine, clock) = engine();
    let handler = ValueLockHandler::new(engine, clock);

    group.bench_function("json_create", |b| {
        b.iter(|| {
            let envelope = LockRequestEnvelope::new(
                ALICE,
                T0,
                LockRequest::CreateDeposit {
                    value: qnt(5),
                    recipient: BOB,
                    duration_minutes: 1,
                },
            );
            let raw = serde_json::to_string(&envelope).unwrap_or_default();
            black_box(handler.handle_json(&raw).is_ok())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_create,
    bench_lifecycle,
    bench_queries,
    bench_handler
);
criterion_main!(benches);
