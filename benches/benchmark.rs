// Featurization and embedding benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use featgraph::prelude::*;
use featgraph_embed::{build_weighted_graph, embed, filter_edges};
use featgraph_features::{process_dirty_tables, process_textual_or_other_tables};
use rand::prelude::*;
use serde_json::json;

const WORDS: [&str; 16] = [
    "graph", "vector", "table", "column", "parser", "engine", "cache", "query", "layout", "cluster", "sample",
    "index", "stream", "codec", "shard", "token",
];

fn generate_table(rows: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let sentence = |rng: &mut StdRng| -> String {
        let n = rng.random_range(4..12);
        (0..n).map(|_| WORDS[rng.random_range(0..WORDS.len())]).collect::<Vec<_>>().join(" ")
    };
    let text = (0..rows).map(|_| json!(sentence(&mut rng))).collect();
    let user = (0..rows).map(|_| json!(format!("user{}", rng.random_range(0..50)))).collect();
    let kinds = ["a", "b", "c"];
    let kind = (0..rows).map(|_| json!(kinds[rng.random_range(0..kinds.len())])).collect();
    let value = (0..rows).map(|_| json!(rng.random_range(-100.0f64..100.0))).collect();
    let flag = (0..rows).map(|_| json!(rng.random_bool(0.3))).collect();

    Table::from_columns(vec![
        Column::new("text", text),
        Column::new("user", user),
        Column::new("kind", kind),
        Column::new("value", value),
        Column::new("flag", flag),
    ])
    .unwrap()
}

fn benchmark_featurize(c: &mut Criterion) {
    let mut group = c.benchmark_group("featurize");
    let config = EncodeConfig::default().with_scaler(ScalerKind::ZScale);

    for size in [100, 1000].iter() {
        let table = generate_table(*size, 7);
        group.bench_with_input(BenchmarkId::new("dirty", size), &table, |b, table| {
            b.iter(|| black_box(process_dirty_tables(table, None, &config).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("textual", size), &table, |b, table| {
            b.iter(|| black_box(process_textual_or_other_tables(table, None, &config).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_umap(c: &mut Criterion) {
    let mut group = c.benchmark_group("umap");
    group.sample_size(10);
    let umap = UmapConfig::default().with_n_epochs(100);

    for size in [100, 500].iter() {
        let table = generate_table(*size, 11);
        let encoded = process_dirty_tables(&table, None, &EncodeConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("fit", size), &encoded.features, |b, features| {
            b.iter(|| black_box(embed(Some(features), None, &umap).unwrap()));
        });

        let (_, model) = embed(Some(&encoded.features), None, &umap).unwrap();
        group.bench_with_input(BenchmarkId::new("transform", size), &encoded.features, |b, features| {
            b.iter(|| black_box(model.transform(features).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_weighted_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_graph");
    let mut rng = StdRng::seed_from_u64(3);

    for size in [100, 1000].iter() {
        let rows: Vec<Vec<f32>> = (0..*size)
            .map(|_| vec![rng.random_range(-10.0f32..10.0), rng.random_range(-10.0f32..10.0)])
            .collect();
        let embedding = Matrix::from_rows(vec!["x".into(), "y".into()], &rows).unwrap();

        group.bench_with_input(BenchmarkId::new("build", size), &embedding, |b, embedding| {
            b.iter(|| black_box(build_weighted_graph(embedding).unwrap()));
        });

        let (_, edges) = build_weighted_graph(&embedding).unwrap();
        group.bench_with_input(BenchmarkId::new("filter", size), &edges, |b, edges| {
            b.iter(|| black_box(filter_edges(edges, 1.5).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_graph_pipeline(c: &mut Criterion) {
    let table = generate_table(200, 5);
    let g = Graph::new().nodes(table, None).unwrap();
    let umap = UmapConfig::default().with_n_epochs(50);

    c.bench_function("graph_umap_200", |b| {
        b.iter(|| black_box(g.umap(Kind::Nodes, None, None, &EncodeConfig::default(), &umap).unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_featurize,
    benchmark_umap,
    benchmark_weighted_graph,
    benchmark_graph_pipeline
);
criterion_main!(benches);
