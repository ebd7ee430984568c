use criterion::{criterion_group, criterion_main, Criterion};
use sift_core::tokenizer::tokenize;

fn bench_tokenize(c: &mut Criterion) {
    let page = "Rust is a multi-paradigm, general-purpose programming language. \
        Rust emphasizes performance, type safety, and concurrency. It enforces \
        memory safety, meaning that all references point to valid memory, \
        without a garbage collector. Searching crawled pages for relevant \
        results requires fast tokenization of titles, headings and paragraphs."
        .repeat(64);
    c.bench_function("tokenize_page", |b| b.iter(|| tokenize(&page)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
