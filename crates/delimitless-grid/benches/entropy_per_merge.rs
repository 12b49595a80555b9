use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delimitless_grid::{compression_force_with, entropy_per_merge, TokenGrid};

fn file_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let sample = ["QCD", "QCDHT1000", "TTbar", "ZJets"][i % 4];
            let year = 16 + i % 3;
            if i % 5 == 0 {
                format!("THselection_{sample}_htag0p8_{year}.root")
            } else {
                format!("THselection_{sample}_{year}.root")
            }
        })
        .collect()
}

fn merge_bench(c: &mut Criterion) {
    let grid = TokenGrid::from_strings(&file_names(64)).unwrap();

    c.bench_function("entropy_per_merge", |b| {
        b.iter(|| black_box(entropy_per_merge(&grid).unwrap()));
    });

    let deltas = entropy_per_merge(&grid).unwrap();
    let cells: Vec<_> = grid.tokens().map(|token| token.idx()).collect();
    c.bench_function("compression_force_with", |b| {
        b.iter(|| {
            for at in &cells {
                black_box(compression_force_with(&grid, &deltas, *at, 1.0).unwrap());
            }
        });
    });
}

criterion_group!(benches, merge_bench);
criterion_main!(benches);
