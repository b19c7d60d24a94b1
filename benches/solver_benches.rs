use RustedMathSolver::solver::classifier::classify;
use RustedMathSolver::solver::handler::handle;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const PROBLEMS: [&str; 4] = [
    "d/dx(x^3 + sin(x^2))",
    "integral of x*exp(x) dx",
    "x^3 - 6*x^2 + 11*x - 6 = 0",
    "(x^2 - 1)/(x - 1) + (x + 1)^3",
];

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| {
            for problem in PROBLEMS {
                black_box(classify(black_box(problem)));
            }
        })
    });
}

fn bench_handle(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle");
    for problem in PROBLEMS {
        group.bench_function(problem, |b| b.iter(|| handle(black_box(problem))));
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_handle);
criterion_main!(benches);
