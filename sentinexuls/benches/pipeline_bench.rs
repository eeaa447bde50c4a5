//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentinexuls::context::{ContextProvider, InMemoryConfigStore};
use sentinexuls::core::record_from;
use sentinexuls::did::DidResolver;
use sentinexuls::pipeline::{standard_graph_with, PipelineExecutor, StandardStages};
use sentinexuls::simulation::BreachSimulator;
use std::sync::Arc;

fn executor() -> PipelineExecutor {
    let store = Arc::new(InMemoryConfigStore::default());
    let provider = ContextProvider::new(store).with_resolver(Arc::new(DidResolver::default()));
    let stages = StandardStages::with_simulator(Arc::new(BreachSimulator::with_seed(7)));
    let graph = standard_graph_with(stages).unwrap();
    PipelineExecutor::new(Arc::new(graph), Arc::new(provider))
}

fn pipeline_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let executor = executor();
    let input = record_from(serde_json::json!({
        "region": "Florida-East",
        "indicators": ["CVE-2025-19304"],
        "target_metadata": {"region": "Florida-East", "substation_ids": ["FL-GRID-204"]}
    }));

    c.bench_function("standard_pipeline", |b| {
        b.iter(|| rt.block_on(executor.run_pipeline(black_box(input.clone()))));
    });

    c.bench_function("standard_graph_build", |b| {
        b.iter(|| standard_graph_with(StandardStages::default()).unwrap());
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
