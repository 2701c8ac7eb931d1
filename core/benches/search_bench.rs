use blogdex_core::search::{search_posts, SearchIndex};
use blogdex_core::text::normalize;
use blogdex_core::PostSummary;
use criterion::{criterion_group, criterion_main, Criterion};

fn synthetic_corpus(size: usize) -> Vec<PostSummary> {
    let vocab = [
        "rust", "async", "tokio", "react", "frontend", "database", "guvenlik", "kimlik",
        "patterns", "testing", "performance", "deployment",
    ];
    (0..size)
        .map(|i| {
            let words: Vec<&str> = (0..8).map(|j| vocab[(i * 7 + j * 3) % vocab.len()]).collect();
            let mut post = PostSummary {
                id: format!("post-{i}"),
                published_date: "2024-01-01".into(),
                search_text: words.join(" "),
                ..Default::default()
            };
            post.derive_fields();
            post
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let text = include_str!("../../README.md");
    c.bench_function("normalize_readme", |b| b.iter(|| normalize(text)));
}

fn bench_search(c: &mut Criterion) {
    let posts = synthetic_corpus(500);
    let index = SearchIndex::build(&posts);
    c.bench_function("search_indexed_500", |b| {
        b.iter(|| index.search(&posts, "tokio performanc", Some(10)))
    });
    c.bench_function("search_one_shot_500", |b| {
        b.iter(|| search_posts(&posts, "tokio performanc", Some(10)))
    });
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
