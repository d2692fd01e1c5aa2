//! Benchmarks for multi-surface layout.
//!
//! Run with: cargo bench -p signvar-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use signvar_layout::{ChainDirection, LayoutInput, encode_lines, layout_lines};
use signvar_style::Style;
use signvar_text::StyledText;
use std::hint::black_box;

fn make_value(len: usize) -> StyledText {
    let mut raw = String::with_capacity(len * 3);
    for i in 0..len {
        match i % 7 {
            0 => raw.push_str("\u{00A7}c"),
            1 => raw.push_str("\u{00A7}l"),
            _ => {}
        }
        raw.push(if i % 5 == 0 { ' ' } else { 'x' });
    }
    StyledText::parse(&raw, Style::default())
}

fn bench_padding(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pad");
    let empty = StyledText::new();
    for surfaces in [1usize, 3, 8, 16] {
        let value = make_value(12);
        group.bench_with_input(BenchmarkId::new("centred", surfaces), &surfaces, |b, &n| {
            b.iter(|| {
                black_box(layout_lines(
                    &LayoutInput {
                        prefix: &empty,
                        value: &value,
                        postfix: &empty,
                        surfaces: n,
                        direction: ChainDirection::None,
                        wraparound: false,
                    },
                    90,
                ))
            })
        });
    }
    group.finish();
}

fn bench_wraparound(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/wraparound");
    let empty = StyledText::new();
    for len in [4usize, 40, 400] {
        let value = make_value(len);
        group.bench_with_input(BenchmarkId::new("fill_8", len), &value, |b, value| {
            b.iter(|| {
                black_box(layout_lines(
                    &LayoutInput {
                        prefix: &empty,
                        value,
                        postfix: &empty,
                        surfaces: 8,
                        direction: ChainDirection::Right,
                        wraparound: true,
                    },
                    90,
                ))
            })
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let empty = StyledText::new();
    let value = make_value(200);
    let lines = layout_lines(
        &LayoutInput {
            prefix: &empty,
            value: &value,
            postfix: &empty,
            surfaces: 8,
            direction: ChainDirection::Right,
            wraparound: false,
        },
        90,
    );
    c.bench_function("layout/encode_8", |b| {
        b.iter(|| black_box(encode_lines(&lines, Style::default())))
    });
}

criterion_group!(benches, bench_padding, bench_wraparound, bench_encode);
criterion_main!(benches);
