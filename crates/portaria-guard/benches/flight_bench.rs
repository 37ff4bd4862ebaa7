//! Performance benchmarks for the single-flight manager.
//!
//! Run with: cargo bench -p portaria-guard
//!
//! These benchmarks measure:
//! - Per-flight overhead with an immediately ready operation
//! - Deduplication under concurrent callers for one key

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tokio::runtime::Runtime;

use portaria_guard::flight::SingleFlight;

fn bench_flight_overhead(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let flights: Arc<SingleFlight<String, u64>> = Arc::new(SingleFlight::new());

    c.bench_function("flight_ready_operation", |b| {
        b.to_async(&rt).iter(|| {
            let flights = flights.clone();
            async move {
                let result = flights
                    .execute("bench-key".to_string(), || async { Ok::<_, String>(42u64) })
                    .await;
                black_box(result)
            }
        })
    });
}

fn bench_flight_dedup(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let flights: Arc<SingleFlight<String, u64>> = Arc::new(SingleFlight::new());

    let callers = 16usize;
    let mut group = c.benchmark_group("flight_dedup");
    group.throughput(Throughput::Elements(callers as u64));

    group.bench_function("concurrent_same_key", |b| {
        b.to_async(&rt).iter(|| {
            let flights = flights.clone();
            async move {
                let handles: Vec<_> = (0..callers)
                    .map(|_| {
                        let flights = flights.clone();
                        tokio::spawn(async move {
                            flights
                                .execute("bench-key".to_string(), || async {
                                    tokio::task::yield_now().await;
                                    Ok::<_, String>(42u64)
                                })
                                .await
                        })
                    })
                    .collect();
                let results = futures::future::join_all(handles).await;
                black_box(results)
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_flight_overhead, bench_flight_dedup);
criterion_main!(benches);
