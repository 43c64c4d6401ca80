//! Benchmarks for the reducer and action parsing.
//!
//! Benchmark targets:
//! - Single reduce on a 1k-entry state: <100us
//! - Action parsing: <10us
//! - Context summary for a 1k-entry state: <5ms

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use aiveno::models::{Action, ActionRequest, AppState};
use aiveno::reduce;
use aiveno::services::build_context;
use chrono::Utc;
use serde_json::json;

fn populated_state(size: usize) -> AppState {
    let now = Utc::now();
    let mut state = AppState::default();
    for i in 0..size {
        let reminder = Action::add_reminder(&format!("Task {i}"), "2024-05-01 10:00", None);
        let expense = Action::add_expense(f64::from(u32::try_from(i).unwrap_or(0)), "Item", None);
        for action in [reminder, expense].into_iter().flatten() {
            state = reduce(state, action, now);
        }
    }
    state
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 1_000] {
        let state = populated_state(size);
        let target = state.reminders[size / 2].id.clone();
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("add_reminder", size), &state, |b, s| {
            b.iter_batched(
                || s.clone(),
                |s| {
                    let action = Action::add_reminder("Bench", "2024-05-01", Some("high"));
                    action.map(|a| reduce(s, a, Utc::now()))
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("toggle", size), &state, |b, s| {
            b.iter_batched(
                || s.clone(),
                |s| {
                    reduce(
                        s,
                        Action::ToggleReminder {
                            id: black_box(target.clone()),
                        },
                        Utc::now(),
                    )
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("action_parse");

    let reminder = ActionRequest::new(
        "add_reminder",
        json!({"title": "Pay rent", "dueDate": "2024-05-01 10:00", "priority": "high"}),
    );
    let expense = ActionRequest::new(
        "add_expense",
        json!({"amount": "₹1,250", "description": "Groceries", "category": "food"}),
    );
    let missing = ActionRequest::new("add_reminder", json!({"title": "No date"}));

    group.bench_function("add_reminder", |b| {
        b.iter(|| Action::parse(black_box(&reminder)));
    });
    group.bench_function("add_expense_string_amount", |b| {
        b.iter(|| Action::parse(black_box(&expense)));
    });
    group.bench_function("rejected", |b| {
        b.iter(|| Action::parse(black_box(&missing)));
    });

    group.finish();
}

fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_summary");

    for size in [10usize, 1_000] {
        let state = populated_state(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, s| {
            b.iter(|| build_context(black_box(s)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reduce, bench_parse, bench_context);
criterion_main!(benches);
