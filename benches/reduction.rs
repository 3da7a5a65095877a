use criterion::{criterion_group, criterion_main, Criterion};
use simon_core::{Gf2Matrix, MeasurementValidator, NullspaceSolver, OracleExecutor, OrthogonalSampler};

fn bench_reduction(c: &mut Criterion) {
    let batch = OrthogonalSampler::seeded(1)
        .execute(16, 0b1011_0010_1110_0101, 256)
        .unwrap();
    let matrix = Gf2Matrix::from_rows(16, batch.vectors().copied()).unwrap();

    c.bench_function("reduce_256x16", |b| {
        b.iter(|| matrix.clone().reduce().unwrap())
    });

    c.bench_function("validate_256x16", |b| {
        b.iter(|| MeasurementValidator::validate(&batch).unwrap())
    });

    let set = MeasurementValidator::validate(&batch).unwrap();
    c.bench_function("solve_16bit", |b| {
        b.iter(|| NullspaceSolver::solve(&set.reduction).unwrap())
    });

    let wide = OrthogonalSampler::seeded(2)
        .execute(64, 0xDEAD_BEEF_0BAD_F00D, 512)
        .unwrap();
    c.bench_function("validate_and_solve_512x64", |b| {
        b.iter(|| {
            let set = MeasurementValidator::validate(&wide).unwrap();
            NullspaceSolver::solve(&set.reduction).unwrap()
        })
    });
}

criterion_group!(benches, bench_reduction);
criterion_main!(benches);
