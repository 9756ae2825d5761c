//! Criterion benchmark for keep-set rendering (made by FontLab https://www.fontlab.com/)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fontslim_core::charset::{dedup_chars, CharOrder};

fn sample_site_text() -> String {
    let page = "<article><h1>字体子集化</h1><p>The quick brown fox jumps over the lazy dog. \
                Ünïcödé ümlauts, 漢字とかな, ещё кириллица.</p></article>\n";
    page.repeat(2_000)
}

fn bench_keep_set(c: &mut Criterion) {
    let text = sample_site_text();

    c.bench_function("dedup_chars first-occurrence", |b| {
        b.iter(|| dedup_chars(black_box(&text), CharOrder::FirstOccurrence))
    });

    c.bench_function("dedup_chars legacy last-line", |b| {
        b.iter(|| dedup_chars(black_box(&text), CharOrder::LegacyLastLine))
    });
}

criterion_group!(benches, bench_keep_set);
criterion_main!(benches);
