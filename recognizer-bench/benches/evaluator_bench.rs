//! Evaluator benchmarks.
//!
//! Throughput is reported per input byte, so a flat bytes/sec figure across
//! the length sweep means evaluation time grows linearly with input length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use recognizer_core::{recognize, Dfa, Predicate};
use std::collections::HashSet;

const LENGTHS: [usize; 4] = [64, 1024, 16 * 1024, 256 * 1024];

fn even_ones(q: u32, a: u8) -> u32 {
    match (q, a) {
        (1, b'1') => 2,
        (2, b'1') => 1,
        _ => q,
    }
}

fn binary_input(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| if (i * 7 + i / 3) % 2 == 0 { b'1' } else { b'0' })
        .collect()
}

fn bench_closure_evaluator(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator_closure");

    let accept: HashSet<u32> = [1].into_iter().collect();
    let mod_seven = |q: u64, a: u8| match a {
        b'0' => (2 * q) % 7,
        b'1' => (2 * q + 1) % 7,
        _ => q,
    };
    let divisible = Predicate(|q: &u64| *q == 0);

    for len in LENGTHS {
        let input = binary_input(len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("even_ones", len), &input, |b, input| {
            b.iter(|| black_box(recognize(1, &even_ones, &accept, input.iter().copied())))
        });

        group.bench_with_input(BenchmarkId::new("mod_seven", len), &input, |b, input| {
            b.iter(|| black_box(recognize(0, &mod_seven, &divisible, input.iter().copied())))
        });
    }

    group.finish();
}

fn bench_table_dfa(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator_table");

    let definition = serde_json::json!({
        "states": ["r0", "r1", "r2"],
        "initial": "r0",
        "accepting": ["r0"],
        "transitions": [
            {"from": "r0", "on": "0", "to": "r0"},
            {"from": "r0", "on": "1", "to": "r1"},
            {"from": "r1", "on": "0", "to": "r2"},
            {"from": "r1", "on": "1", "to": "r0"},
            {"from": "r2", "on": "0", "to": "r1"},
            {"from": "r2", "on": "1", "to": "r2"}
        ]
    });
    let dfa = Dfa::from_json(&definition).unwrap();

    for len in LENGTHS {
        let input = binary_input(len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("mod_three", len), &input, |b, input| {
            b.iter(|| black_box(dfa.recognize(input).unwrap()))
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator_compile");

    // Chain of states, each advancing on its own letter
    let chain = serde_json::json!({
        "states": (0..26).map(|i| format!("s{}", i)).collect::<Vec<_>>(),
        "initial": "s0",
        "accepting": ["s25"],
        "transitions": (0..25).map(|i| serde_json::json!({
            "from": format!("s{}", i),
            "on": ((b'a' + i as u8) as char).to_string(),
            "to": format!("s{}", i + 1)
        })).collect::<Vec<_>>()
    });

    group.bench_function("chain_26", |b| {
        b.iter(|| black_box(Dfa::from_json(&chain).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_closure_evaluator,
    bench_table_dfa,
    bench_compile
);
criterion_main!(benches);
