//! Benchmarks for layout and full card rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quotecard::layout::wrap_text;
use quotecard::prelude::*;

fn bench_wrap(c: &mut Criterion) {
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    c.bench_function("wrap_text", |b| {
        b.iter(|| {
            wrap_text(black_box(&text), 720.0, |line| {
                line.chars().count() as f32 * 22.0
            })
        })
    });
}

fn bench_render_card(c: &mut Criterion) {
    let Ok(renderer) = QuoteCardRenderer::new() else {
        eprintln!("no system fonts available; skipping render bench");
        return;
    };
    let request = RenderRequest {
        message_text: "A moderately sized message that wraps onto a few lines \
                       when laid out at the default card width."
            .to_string(),
        author_name: "Bob Smith".to_string(),
        avatar_url: None,
        background_color: "red".to_string(),
    };

    c.bench_function("render_card", |b| {
        b.iter(|| renderer.generate(black_box(&request)).unwrap())
    });
}

criterion_group!(benches, bench_wrap, bench_render_card);
criterion_main!(benches);
