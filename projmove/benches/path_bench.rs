use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use projmove::path::{normalize, relative_path, CanonicalPath, PathRelationship, SeparatorStyle};
use std::path::{Path, PathBuf};

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity");

    // Benchmark plain absolute path
    group.bench_function("plain", |b| {
        b.iter(|| CanonicalPath::new(black_box(Path::new("/repo/src/App/App.csproj"))));
    });

    // Benchmark path with . and .. components and mixed case
    group.bench_function("with_dots", |b| {
        b.iter(|| CanonicalPath::new(black_box(Path::new("/Repo/src/./Old/../App/APP.csproj"))));
    });

    // Benchmark relative path resolved against a base
    group.bench_function("with_base", |b| {
        b.iter(|| {
            CanonicalPath::with_base(
                black_box(Path::new("../Lib/Lib.csproj")),
                black_box(Path::new("/repo/src/App")),
            )
        });
    });

    group.finish();
}

fn bench_normalize_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_operations");

    group.bench_function("expand_tilde", |b| {
        b.iter(|| normalize::expand_tilde(black_box(Path::new("~/repo"))));
    });

    group.bench_function("resolve_components", |b| {
        b.iter(|| normalize::resolve_components(black_box(Path::new("/a/b/../c/./d"))));
    });

    group.bench_function("absolutize", |b| {
        b.iter(|| {
            normalize::absolutize(
                black_box(Path::new("..\\Lib\\Lib.csproj")),
                black_box(Path::new("/repo/App")),
            )
        });
    });

    group.finish();
}

fn bench_relationship(c: &mut Criterion) {
    let mut group = c.benchmark_group("relationship");

    let ancestor = Path::new("/repo/src");
    let descendant = Path::new("/repo/src/App/App.csproj");
    let unrelated = Path::new("/repo/tests/App.Tests");

    group.bench_function("ancestor", |b| {
        b.iter(|| PathRelationship::between(black_box(ancestor), black_box(descendant)));
    });

    group.bench_function("unrelated", |b| {
        b.iter(|| PathRelationship::between(black_box(ancestor), black_box(unrelated)));
    });

    group.bench_function("is_within", |b| {
        b.iter(|| PathRelationship::is_within(black_box(descendant), black_box(ancestor)));
    });

    group.finish();
}

fn bench_relative_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("relative_path");

    // Benchmark with different distances between the two paths
    for depth in &[1, 3, 6] {
        let from: PathBuf = (0..*depth).fold(PathBuf::from("/repo"), |p, i| p.join(format!("a{i}")));
        let to: PathBuf = (0..*depth)
            .fold(PathBuf::from("/repo"), |p, i| p.join(format!("b{i}")))
            .join("Lib.csproj");

        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            b.iter(|| {
                SeparatorStyle::Backward.apply(&relative_path(black_box(&from), black_box(&to)))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_identity,
    bench_normalize_operations,
    bench_relationship,
    bench_relative_path
);
criterion_main!(benches);
