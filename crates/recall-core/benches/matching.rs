use criterion::{black_box, criterion_group, criterion_main, Criterion};

use recall_core::matcher::{grade, strip_accents, to_digraphs};

const ANSWER: &str = "el pingüino comió una piña en el árbol";

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    group.bench_function("exact", |b| {
        b.iter(|| grade(black_box(ANSWER), black_box(ANSWER)))
    });

    group.bench_function("digraphs", |b| {
        let typed = to_digraphs(ANSWER);
        b.iter(|| grade(black_box(&typed), black_box(ANSWER)))
    });

    group.bench_function("accent_equivalent", |b| {
        b.iter(|| {
            grade(
                black_box("el pinguino comio una pina en el arbol"),
                black_box(ANSWER),
            )
        })
    });

    group.bench_function("wrong", |b| {
        b.iter(|| grade(black_box("the penguin ate a pineapple"), black_box(ANSWER)))
    });

    group.finish();
}

fn bench_strip(c: &mut Criterion) {
    let long = ANSWER.repeat(50);
    c.bench_function("strip_accents/long", |b| {
        b.iter(|| strip_accents(black_box(&long)))
    });
}

criterion_group!(benches, bench_grade, bench_strip);
criterion_main!(benches);
