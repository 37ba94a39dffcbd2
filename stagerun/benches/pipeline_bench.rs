//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stagerun::events::NoOpLifecycleSink;
use stagerun::pipeline::{PipelineBuilder, PipelineOrchestrator};
use stagerun::stages::NoOpStage;
use std::sync::Arc;

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut builder = PipelineBuilder::new("bench");
    for name in ["ingest", "validate", "transform", "train"] {
        builder = builder.stage(name, || NoOpStage).unwrap();
    }
    let definition = builder.build().unwrap();
    let orchestrator = PipelineOrchestrator::new(Arc::new(NoOpLifecycleSink));

    c.bench_function("four_noop_stages", |b| {
        b.iter(|| {
            let summary = runtime.block_on(orchestrator.run(black_box(&definition)));
            black_box(summary.is_ok())
        })
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
