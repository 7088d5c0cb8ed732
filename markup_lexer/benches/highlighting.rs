use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use markup_lexer::{LexicalAnalyzer, TextEdit};
use std::sync::Arc;

fn sample_page(sections: usize) -> String {
    let mut page = String::from("<!DOCTYPE html>\n<html><head>\n");
    page.push_str("<style>\nbody { margin: 0; color: #333 }\n.card > h2 { font-size: 1.5em }\n</style>\n");
    page.push_str("<script>\nconst items = [1, 2, 3].map((n) => n * 2);\n</script>\n</head><body>\n");
    for index in 0..sections {
        page.push_str(&format!(
            "<div class=\"card\" style=\"padding: {index}px\" onclick=\"open({index})\">\n\
             <h2>Item ${{item.name}} &amp; more</h2>\n<!-- section {index} -->\n</div>\n"
        ));
    }
    page.push_str("</body></html>\n");
    page
}

fn bench_tokenize(c: &mut Criterion) {
    let page = sample_page(200);
    let mut group = c.benchmark_group("tokenize");
    group.throughput(Throughput::Bytes(page.len() as u64));

    group.bench_function("full_document", |b| {
        let mut analyzer = LexicalAnalyzer::new();
        b.iter(|| analyzer.tokenize_text(black_box(&page)))
    });
    group.finish();
}

fn bench_relex(c: &mut Criterion) {
    let page = sample_page(200);
    let mut analyzer = LexicalAnalyzer::new();
    let Ok(previous) = analyzer.tokenize_text(&page) else {
        return;
    };

    let offset = page.len() / 2;
    let offset = (offset..page.len())
        .find(|&i| page.is_char_boundary(i))
        .unwrap_or(page.len());
    let mut edited = page.clone();
    edited.insert_str(offset, "x");
    let buffer: Arc<str> = Arc::from(edited);
    let edit = TextEdit::insert(offset, 1);

    c.bench_function("relex_single_insert", |b| {
        b.iter(|| analyzer.relex(black_box(&previous), buffer.clone(), &edit))
    });
}

criterion_group!(benches, bench_tokenize, bench_relex);
criterion_main!(benches);
