use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use skymap_layout::config::LayoutConfig;
use skymap_layout::ir::Graph;
use skymap_layout::layout::{compute_positions, pack_circles, scatter_isolated};
use skymap_layout::parser::parse_graph_data;
use std::hint::black_box;

/// `families` trees of growing size plus `loners` isolated people.
fn synthetic_graph(families: usize, loners: usize) -> Graph {
    let mut graph = Graph::new();
    for fam in 0..families {
        let size = 2 + fam % 40;
        for member in 1..size {
            let parent = (member - 1) / 2;
            graph.add_edge(&format!("f{fam}_{parent}"), &format!("f{fam}_{member}"));
        }
    }
    for idx in 0..loners {
        graph.ensure_node(&format!("solo{idx}"));
    }
    graph
}

fn fixture(name: &str) -> &'static str {
    match name {
        "small_family" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/small_family.json"
        )),
        "large_mixed" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/large_mixed.json"
        )),
        _ => panic!("unknown fixture"),
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let config = LayoutConfig::default();
    for name in ["small_family", "large_mixed"] {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let graph = parse_graph_data(black_box(data), &config.input).expect("parse failed");
                black_box(graph.node_count());
            });
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    let config = LayoutConfig::default();
    for name in ["small_family", "large_mixed"] {
        let graph = parse_graph_data(fixture(name), &config.input).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let positions = compute_positions(black_box(graph), &config).expect("layout failed");
                black_box(positions.map.len());
            });
        });
    }
    for (families, loners) in [(50usize, 200usize), (200, 1000)] {
        let name = format!("synthetic_{families}_{loners}");
        let graph = synthetic_graph(families, loners);
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let positions = compute_positions(black_box(graph), &config).expect("layout failed");
                black_box(positions.map.len());
            });
        });
    }
    group.finish();
}

fn bench_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("packing");
    let config = LayoutConfig::default();
    // below and above the compaction limit
    for count in [20usize, 99, 400] {
        let radii: Vec<f64> = (0..count)
            .map(|idx| 200.0 + ((idx * 7919) % 97) as f64 * 25.0)
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &radii, |b, radii| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(config.packing.seed);
                let packed = pack_circles(black_box(radii), &config.packing, &mut rng);
                black_box(packed.outer_radius);
            });
        });
    }
    group.finish();
}

fn bench_scatter(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter");
    let config = LayoutConfig::default();
    for count in [100usize, 10_000] {
        let ids: Vec<String> = (0..count).map(|idx| format!("solo{idx}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &ids, |b, ids| {
            b.iter(|| {
                let mut discrete = StdRng::seed_from_u64(config.scatter.discrete_seed);
                let mut continuous = StdRng::seed_from_u64(config.scatter.continuous_seed);
                let (points, _) = scatter_isolated(
                    black_box(ids),
                    25_000.0,
                    &config.scatter,
                    &mut discrete,
                    &mut continuous,
                )
                .expect("scatter failed");
                black_box(points.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_pipeline, bench_packing, bench_scatter);
criterion_main!(benches);
