use criterion::{Criterion, black_box, criterion_group, criterion_main};

use verifactu::nif::{classify, validate};

const FIXTURES: &[&str] = &[
    "12345678Z",
    "12.345.678-Z",
    "X1234567L",
    "Z5555555W",
    "A28015865",
    "B65410011",
    "P1234567D",
    "12345678A",
    "not an id at all",
    "",
];

fn bench_validate(c: &mut Criterion) {
    c.bench_function("validate_mixed_fixtures", |b| {
        b.iter(|| {
            for id in FIXTURES {
                black_box(validate(black_box(id)));
            }
        });
    });

    c.bench_function("classify_mixed_fixtures", |b| {
        b.iter(|| {
            for id in FIXTURES {
                black_box(classify(black_box(id)));
            }
        });
    });
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
