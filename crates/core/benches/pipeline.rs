use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use linkpress_core::{
    ArticleEntry, Compiler, Document, DocumentMeta, Extractor, RegionConfig, extract, locate_region, preprocess_html,
};

fn bench_extract(c: &mut Criterion) {
    let article = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let short = std::fs::read_to_string("../../tests/fixtures/short_paragraphs.html").unwrap();
    let links = std::fs::read_to_string("../../tests/fixtures/link_list.html").unwrap();

    let mut group = c.benchmark_group("extract");

    group.bench_with_input(BenchmarkId::new("structured", "article"), &article, |b, html| {
        b.iter(|| extract(black_box("https://lowlevel.example/posts/tiny-allocator"), black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("heuristic", "short_paragraphs"), &short, |b, html| {
        b.iter(|| extract(black_box("https://news.example/storm"), black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("exhausted", "link_list"), &links, |b, html| {
        b.iter(|| extract(black_box("https://news.example/"), black_box(html)))
    });

    group.finish();
}

fn bench_preprocess(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_region(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let doc = Document::parse_with_preprocessing(&html, None).unwrap();
    let config = RegionConfig::default();

    c.bench_function("locate_region", |b| b.iter(|| locate_region(black_box(&doc), black_box(&config))));
}

fn bench_compile(c: &mut Criterion) {
    let html = std::fs::read_to_string("../../tests/fixtures/article.html").unwrap();
    let record = Extractor::new().extract("https://lowlevel.example/posts/tiny-allocator", &html);
    let compiler = Compiler::new(DocumentMeta::today());

    let mut group = c.benchmark_group("compile");
    for count in [1usize, 10, 30] {
        let entries: Vec<ArticleEntry> = (0..count).map(|_| ArticleEntry::from_record(&record)).collect();
        group.bench_with_input(BenchmarkId::new("chapters", count), &entries, |b, entries| {
            b.iter(|| compiler.write_to(black_box(entries), std::io::Cursor::new(Vec::new())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extract, bench_preprocess, bench_region, bench_compile);
criterion_main!(benches);
