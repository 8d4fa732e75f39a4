//! Performance benchmarks for the SPL compilation pipeline.
//!
//! - Scripts: the programs under `test_scripts/`, end to end
//! - Phases: parsing alone vs. the semantic/codegen pipeline on a parsed tree
//! - Scaling: generated programs with a growing number of instructions
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use spl::{Compiler, Pipeline, parse};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// A program with `n` if-else statements in `main`.
fn generated_program(n: usize) -> String {
    let mut body = Vec::with_capacity(n);
    for i in 0..n {
        body.push(format!(
            "if ((x > {i}) and (not (y eq {i}))) {{ x = (x minus 1) }} else {{ y = (y plus x) }}"
        ));
    }
    format!("main {{ var {{ x y }} x = 100; y = 0; {} }}", body.join(";\n"))
}

fn script_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("pipeline/scripts");
    let compiler = Compiler::new();

    let scripts = [
        ("countdown", include_str!("../test_scripts/countdown.spl")),
        ("max", include_str!("../test_scripts/max.spl")),
        ("procedures", include_str!("../test_scripts/procedures.spl")),
        ("logic", include_str!("../test_scripts/logic.spl")),
        ("arithmetic", include_str!("../test_scripts/arithmetic.spl")),
    ];

    for (name, source) in scripts {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let program = compiler.compile(black_box(source)).unwrap();
                end_profiling_frame();
                black_box(program.len())
            });
        });
    }

    group.finish();
}

fn phase_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/phases");
    let source = generated_program(50);
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse", |b| {
        b.iter(|| black_box(parse(black_box(&source)).unwrap().len()));
    });

    let ast = parse(&source).unwrap();
    let pipeline = Pipeline::default();
    group.bench_function("analyse_and_generate", |b| {
        b.iter(|| black_box(pipeline.run(black_box(&ast)).unwrap().program.len()));
    });

    group.finish();
}

fn scaling_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/scaling");
    let compiler = Compiler::new();

    // Each conditional uses 10 places; stay under the place namespace.
    for n in [10, 30, 60] {
        let source = generated_program(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("conditionals_{n}"), |b| {
            b.iter(|| black_box(compiler.compile(black_box(&source)).unwrap().len()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    script_benchmarks,
    phase_benchmarks,
    scaling_benchmarks
);

criterion_main!(benches);
