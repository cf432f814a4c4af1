//! Benchmarks for the markdown rendering pipeline
//!
//! Run with: cargo bench

use chatdesk::markdown::*;
use chatdesk::RenderConfig;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn create_rust_snippet(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("let value_{i} = compute({i}) * 2; // step {i}\n"))
        .collect()
}

fn create_document(sections: usize) -> String {
    let mut doc = String::new();
    for i in 0..sections {
        doc.push_str(&format!("## Section {}\n\nSome *emphasis* and a [link](https://example.com/{}).\nA second line.\n\n", i, i));
        doc.push_str("| a | b |\n|---|---|\n| 1 | 2 |\n\n");
        doc.push_str("```rust\nfn main() {\n    println!(\"hi\");\n}\n```\n\n");
    }
    doc
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let highlighter = SyntectHighlighter::new();

    let source = format!("```rust\n{}```", create_rust_snippet(20));
    let fenced = CodeBlockInput::Fenced {
        raw: source.clone(),
        text: source,
        lang: Some("rust".to_string()),
    };
    group.bench_function("fenced_block", |b| {
        b.iter(|| normalize(black_box(&fenced), None, &highlighter))
    });

    let structured = CodeBlockInput::Other(serde_json::json!({
        "code": "x = 1",
        "nested": {"depth": [1, 2, 3]},
    }));
    group.bench_function("structured_value", |b| {
        b.iter(|| normalize(black_box(&structured), None, &highlighter))
    });

    group.finish();
}

fn bench_render_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_code");
    let renderer = Renderer::default();

    for lines in [10, 100, 1000] {
        let block = CodeBlockInput::fenced(create_rust_snippet(lines), Some("rust"));

        group.throughput(Throughput::Elements(lines as u64));

        group.bench_function(format!("rust_{}", lines), |b| {
            b.iter(|| renderer.render_code(black_box(&block), None))
        });
    }

    let unknown = CodeBlockInput::fenced(create_rust_snippet(100), Some("no-such-language"));
    group.bench_function("plaintext_100", |b| {
        b.iter(|| renderer.render_code(black_box(&unknown), None))
    });

    group.finish();
}

fn bench_render_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_markdown");

    for sections in [1, 10, 50] {
        let content = MarkdownContent::Text(create_document(sections));

        group.bench_function(format!("sections_{}", sections), |b| {
            let renderer = Renderer::default();
            b.iter(|| renderer.render_markdown(black_box(&content)))
        });
    }

    let plain = Renderer::new(RenderConfig {
        gfm: false,
        breaks: false,
        ..RenderConfig::default()
    });
    let content = MarkdownContent::Text(create_document(10));
    group.bench_function("sections_10_commonmark", |b| {
        b.iter(|| plain.render_markdown(black_box(&content)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize,
    bench_render_code,
    bench_render_markdown,
);

criterion_main!(benches);
