//! Benchmarks for Ripple graph construction and impact analysis.
//!
//! These benchmarks measure:
//! - Building the dependency graph from an entry file (parse + resolve)
//! - Reverse impact propagation over an already built graph
//! - Scaling behavior with project size

// Benchmark code - performance of the benchmark setup is not critical
#![allow(missing_docs)]
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_possible_truncation)]

mod common;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ripple::{ChangeDescriptor, ChangeKind, Config, FileIdentity, Ripple, analyze_impact};

use common::{create_project, generate_layered_project};

/// Benchmark graph construction on projects of different sizes.
fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for layers in &[2, 5, 10, 20] {
        let width = 8;
        let files = generate_layered_project(*layers, width);
        let (_dir, path) = create_project(&files);
        let entry = path.join("src/index.ts");

        group.throughput(Throughput::Elements(files.len() as u64));

        group.bench_with_input(BenchmarkId::new("files", files.len()), layers, |b, _| {
            let mut ripple = Ripple::new(Config::new(&path)).expect("failed to create Ripple");
            b.iter(|| {
                let project = ripple.build(&entry).expect("build failed");
                black_box(project)
            });
        });
    }

    group.finish();
}

/// Benchmark impact analysis alone, with the graph built once up front.
fn bench_analyze_impact(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_impact");

    for layers in &[5, 20, 50] {
        let files = generate_layered_project(*layers, 8);
        let (_dir, path) = create_project(&files);

        let mut ripple = Ripple::new(Config::new(&path)).expect("failed to create Ripple");
        let project = ripple
            .build(&path.join("src/index.ts"))
            .expect("build failed");

        let leaf = ChangeDescriptor::new(
            FileIdentity::new(path.join("src/core/leaf.ts")),
            ChangeKind::Modify,
        )
        .with_modified_exports(["leaf", "default"]);

        group.throughput(Throughput::Elements(project.graph().file_count() as u64));

        group.bench_with_input(
            BenchmarkId::new("leaf_change", files.len()),
            &leaf,
            |b, descriptor| {
                b.iter(|| black_box(analyze_impact(descriptor, &project)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build_graph, bench_analyze_impact);

criterion_main!(benches);
