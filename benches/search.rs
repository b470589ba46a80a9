//! Benchmarks for page binding, site search and highlighting.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use folio::{App, Config, Event, Highlighter, MemoryHost, Page, SearchEngine, Section};

const SITE_HTML: &str = include_str!("../tests/fixtures/site.html");

/// The fixture page with its blog list and wall repeated to a realistic size.
fn large_site() -> String {
    let mut cards = String::new();
    let mut posts = String::new();
    for i in 0..200 {
        cards.push_str(&format!(
            r#"<div class="cartoon-card" data-tags="tag{i} cat"><div class="card-details"><h3>Card {i}</h3><p>Wallpaper number {i} with a sleepy cat.</p></div></div>"#
        ));
        posts.push_str(&format!(
            r#"<div id="post-{n}-content" style="display: none"><h1>Post {n}</h1><p>Notes on drawing, part {n}. The cat sat on the sketchbook again.</p></div>"#,
            n = i + 10
        ));
    }
    SITE_HTML
        .replace(
            r#"<div id="gallery-grid" class="gallery-grid hidden">"#,
            &format!(r#"<div id="gallery-grid" class="gallery-grid hidden">{cards}"#),
        )
        .replace(
            r#"<div id="full-blog-post-view" class="hidden"></div>"#,
            &format!(r#"<div id="full-blog-post-view" class="hidden"></div>{posts}"#),
        )
}

fn bench_bind_page(c: &mut Criterion) {
    let html = large_site();
    let config = Config::default();
    c.bench_function("bind_page", |b| {
        b.iter(|| Page::parse(&html, &config).unwrap());
    });
}

fn bench_search(c: &mut Criterion) {
    let config = Config::default();
    let page = Page::parse(&large_site(), &config).unwrap();
    let engine = SearchEngine::new(&config.search).unwrap();

    c.bench_function("search_common_term", |b| {
        b.iter(|| engine.query(&page, "cat"));
    });
    c.bench_function("search_no_match", |b| {
        b.iter(|| engine.query(&page, "zebra"));
    });
}

fn bench_highlight(c: &mut Criterion) {
    let config = Config::default();
    let mut page = Page::parse(&large_site(), &config).unwrap();
    let wall = page.section_root(Section::Wall).unwrap();
    page.dom.remove_class(wall, "hidden");
    let mut highlighter = Highlighter::new().unwrap();

    c.bench_function("highlight_and_clear_wall", |b| {
        b.iter(|| {
            highlighter.highlight_section(&mut page.dom, wall, "cat");
            highlighter.clear(&mut page.dom);
        });
    });
}

fn bench_wall_filter(c: &mut Criterion) {
    let config = Config::default();
    let page = Page::parse(&large_site(), &config).unwrap();
    let mut app = App::start(page, config, MemoryHost::at("/wall")).unwrap();

    c.bench_function("wall_filter_keystroke", |b| {
        b.iter(|| {
            app.dispatch(Event::Input("tag1".into()));
            app.dispatch(Event::Input(String::new()));
        });
    });
}

criterion_group!(
    benches,
    bench_bind_page,
    bench_search,
    bench_highlight,
    bench_wall_filter,
);
criterion_main!(benches);
