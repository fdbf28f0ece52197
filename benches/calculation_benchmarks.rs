//! Performance benchmarks for the allowance engine.
//!
//! Covers:
//! - A single inbound allowance request through the HTTP router
//! - Fee-sheet batches of increasing size
//! - Roster reconciliation of 1000 employees with transfers
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use allowance_engine::api::{AppState, create_router};
use allowance_engine::calculation::{RosterSources, reconcile_rosters, run_allowance_batch};
use allowance_engine::config::{AllowanceSettings, ConfigLoader};
use allowance_engine::models::{
    EmployeeRecord, OptionalDate, OrgLevel, OrgPath, TransferEvent,
};

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/engine.yaml").expect("Failed to load config");
    AppState::new(config)
}

fn day(year: i32, ordinal: u32) -> OptionalDate {
    OptionalDate::present(NaiveDate::from_yo_opt(year, ordinal).unwrap())
}

/// Creates `count` fee-sheet rows cycling through every date state.
fn create_fee_rows(count: usize) -> Vec<EmployeeRecord> {
    (0..count)
        .map(|i| {
            let mut row = EmployeeRecord::new(
                format!("E{:05}", i),
                format!("employee {}", i),
                OrgPath::new("G", "R", "N", "D"),
            );
            row.hire_date = day(2015 + (i % 11) as i32, 1 + (i % 360) as u32);
            match i % 4 {
                1 => row.leave_date = day(2025, 1 + (i % 365) as u32),
                2 => row.transfer_out_date = day(2025, 1 + (i % 365) as u32),
                3 => row.transfer_in_date = day(2025, 1 + (i % 365) as u32),
                _ => {}
            }
            row
        })
        .collect()
}

/// Creates rosters of `count` employees, a third of whom transferred.
fn create_roster_sources(count: usize) -> RosterSources {
    let rows = create_fee_rows(count);
    let (active, resigned): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .map(|mut row| {
            row.transfer_in_date = OptionalDate::ABSENT;
            row.transfer_out_date = OptionalDate::ABSENT;
            row
        })
        .partition(|row| row.leave_date.is_absent());

    let transfers = (0..count)
        .filter(|i| i % 3 == 0)
        .map(|i| TransferEvent {
            employee_id: format!("E{:05}", i),
            name: format!("employee {}", i),
            hire_date: OptionalDate::ABSENT,
            transfer_date: NaiveDate::from_yo_opt(2025, 1 + (i % 365) as u32).unwrap(),
            before: OrgPath::new("G", "R", "N", "D"),
            after: OrgPath::new("G", "R", if i % 2 == 0 { "S" } else { "N" }, "D"),
        })
        .collect();

    RosterSources {
        active,
        resigned,
        transfers,
    }
}

/// Benchmark: Single inbound allowance request through the router.
fn bench_single_inbound_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::json!({"join_date": "2025-02-21", "target_year": 2025}).to_string();

    c.bench_function("single_inbound_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/allowance/inbound")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Fee-sheet batches of various sizes.
fn bench_fee_batch(c: &mut Criterion) {
    let settings = AllowanceSettings::default();
    let mut group = c.benchmark_group("fee_batch");

    for size in [10usize, 100, 1000] {
        let rows = create_fee_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), &rows, |b, rows| {
            b.iter(|| black_box(run_allowance_batch(rows, 2025, &settings)))
        });
    }

    group.finish();
}

/// Benchmark: Reconciliation of 1000 employees.
fn bench_reconcile_1000(c: &mut Criterion) {
    let sources = create_roster_sources(1000);
    let level = OrgLevel::try_from(3).unwrap();

    let mut group = c.benchmark_group("reconciliation");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("reconcile_1000", |b| {
        b.iter(|| black_box(reconcile_rosters(&sources, level).unwrap()))
    });
    group.finish();
}

/// Benchmark: Batch of 1000 rows through the router, including JSON handling.
fn bench_batch_request_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::json!({"target_year": 2025, "rows": create_fee_rows(1000)}).to_string();

    let mut group = c.benchmark_group("large_batch_request");
    group.throughput(Throughput::Elements(1000));
    group.sample_size(10);

    group.bench_function("batch_request_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/allowance/batch")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_inbound_request,
    bench_fee_batch,
    bench_reconcile_1000,
    bench_batch_request_1000,
);
criterion_main!(benches);
