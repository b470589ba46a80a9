//! Site search tests against the full site template.

use folio::search::{self, AdviceTable, KeywordTable};
use folio::{Config, Page, PostId, Route, SearchEngine, SearchOutcome, Section};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{}/{}", FIXTURES_DIR, name)
}

fn fixture_html() -> String {
    std::fs::read_to_string(fixture_path("site.html")).expect("Failed to read fixture")
}

fn setup() -> (Page, SearchEngine) {
    let config = Config::default();
    let page = Page::parse(&fixture_html(), &config).expect("Failed to bind page");
    let engine = SearchEngine::new(&config.search).unwrap();
    (page, engine)
}

fn group_labels(outcome: &SearchOutcome) -> Vec<&str> {
    match outcome {
        SearchOutcome::Results { groups } => groups.iter().map(|g| g.label.as_str()).collect(),
        _ => Vec::new(),
    }
}

#[test]
fn test_groups_follow_scan_order() {
    let (page, engine) = setup();
    let outcome = engine.query(&page, "cat");
    assert_eq!(
        group_labels(&outcome),
        vec!["Home", "Blog List", "Wallpapers", "Blog: The cat who drew"]
    );
    assert_eq!(outcome.results().count(), 6);
}

#[test]
fn test_overlapping_selectors_listed_once() {
    // The home preview paragraph matches both `#home-content p` and
    // `.preview-section p`.
    let (page, engine) = setup();
    let outcome = engine.query(&page, "cat");
    let home: Vec<_> = outcome
        .results()
        .filter(|r| r.section == Section::Home)
        .collect();
    assert_eq!(home.len(), 1);
    assert_eq!(home[0].snippet_html, "A sleepy <strong>cat</strong> on a windowsill.");
}

#[test]
fn test_wall_card_snippet() {
    let (page, engine) = setup();
    let outcome = engine.query(&page, "cat");
    let wall: Vec<_> = outcome
        .results()
        .filter(|r| r.section == Section::Wall)
        .collect();
    assert_eq!(wall.len(), 1);
    assert_eq!(
        wall[0].snippet_html,
        "<em>Sleepy Cat:</em> Sleepy <strong>Cat</strong> Naps in the sun. <strong>cat</strong> kitten cozy"
    );
    assert_eq!(wall[0].route, Route::section(Section::Wall).with_trigger("cat"));
}

#[test]
fn test_post_hits_open_the_post() {
    let (page, engine) = setup();
    let outcome = engine.query(&page, "cat");
    let post_3 = PostId::parse("post-3").unwrap();

    let blog_list: Vec<_> = outcome
        .results()
        .filter(|r| r.section_label == "Blog List")
        .collect();
    assert_eq!(blog_list.len(), 2);
    assert!(blog_list.iter().all(|r| r.post_id.as_ref() == Some(&post_3)));
    assert_eq!(
        blog_list[0].snippet_html,
        "<em>The cat who drew:</em> The <strong>cat</strong> who drew"
    );

    let hidden: Vec<_> = outcome
        .results()
        .filter(|r| r.section_label == "Blog: The cat who drew")
        .collect();
    assert_eq!(hidden.len(), 2);
    assert_eq!(hidden[0].section, Section::Blog);
    assert_eq!(hidden[0].route, Route::post(post_3).with_trigger("cat"));
}

#[test]
fn test_matching_is_case_insensitive_and_literal() {
    let (page, engine) = setup();
    let upper = engine.query(&page, "SLEEPY");
    let lower = engine.query(&page, "sleepy");
    assert_eq!(upper.results().count(), lower.results().count());
    assert!(upper.results().count() > 0);

    // Regex metacharacters are matched literally.
    assert!(matches!(
        engine.query(&page, "c.t"),
        SearchOutcome::NoResults { .. }
    ));
    assert!(matches!(
        engine.query(&page, "(cat"),
        SearchOutcome::NoResults { .. }
    ));
}

#[test]
fn test_short_and_empty_queries() {
    let (page, engine) = setup();
    assert_eq!(engine.query(&page, ""), SearchOutcome::TooShort);
    assert_eq!(engine.query(&page, "a"), SearchOutcome::TooShort);
    assert_eq!(engine.query(&page, "   a   "), SearchOutcome::TooShort);
}

#[test]
fn test_no_results_term_is_trimmed() {
    let (page, engine) = setup();
    assert_eq!(
        engine.query(&page, "  zebra  "),
        SearchOutcome::NoResults {
            term: "zebra".into()
        }
    );
}

#[test]
fn test_distraction_keyword_redirects() {
    let (page, engine) = setup();
    for (query, keyword) in [("YouTube", "youtube"), ("watch netflix tonight", "netflix")] {
        match engine.query(&page, query) {
            SearchOutcome::Redirect { keyword: k, route } => {
                assert_eq!(k, keyword);
                assert_eq!(route, Route::section(Section::Goals).with_trigger(keyword));
            }
            other => panic!("{query}: expected redirect, got {other:?}"),
        }
    }
}

#[test]
fn test_redirect_needs_goals_section() {
    let html = fixture_html().replace(r#"id="goals-content""#, r#"id="goals-removed""#);
    let config = Config::default();
    let page = Page::parse(&html, &config).unwrap();
    let engine = SearchEngine::new(&config.search).unwrap();
    assert!(!matches!(
        engine.query(&page, "instagram"),
        SearchOutcome::Redirect { .. }
    ));
}

#[test]
fn test_custom_keyword_table() {
    let (page, mut engine) = setup();
    engine.set_keywords(KeywordTable::new(["sketch"]));
    assert!(matches!(
        engine.query(&page, "sketch"),
        SearchOutcome::Redirect { .. }
    ));
    assert!(matches!(
        engine.query(&page, "instagram"),
        SearchOutcome::NoResults { .. }
    ));
}

#[test]
fn test_render_and_hide() {
    let (mut page, engine) = setup();
    let outcome = engine.query(&page, "cat");
    let flat = search::render_outcome(&mut page, &outcome);
    assert_eq!(flat.len(), 6);

    let container = page.search().results.unwrap();
    let dom = &page.dom;
    assert!(dom.has_class(container, search::VISIBLE_CLASS));
    let headers = dom.query_all(container, ".search-result-section").unwrap();
    assert_eq!(headers.len(), 4);
    assert_eq!(dom.text_content(headers[0]), "Home");
    let items = dom.query_all(container, ".search-result-item").unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(dom.query_all(items[0], "strong").unwrap().len(), 1);

    search::hide_results(&mut page);
    assert!(!page.dom.has_class(container, search::VISIBLE_CLASS));
    assert_eq!(page.dom.children(container).count(), 0);
}

#[test]
fn test_advice_lookup() {
    let advice = AdviceTable::default();
    assert_eq!(
        advice.lookup("I keep checking my PHONE"),
        "Put the phone in another room for the next hour."
    );
    assert_eq!(advice.lookup("instagram"), "Stay organized. One thing at a time.");
}

#[test]
fn test_outcome_json() {
    let (page, engine) = setup();
    let json = serde_json::to_value(engine.query(&page, "tiktok")).unwrap();
    assert_eq!(json["kind"], "redirect");
    assert_eq!(json["route"]["filter"], "goals");
    assert_eq!(json["route"]["trigger"], "tiktok");

    let json = serde_json::to_value(engine.query(&page, "x")).unwrap();
    assert_eq!(json["kind"], "too_short");
}
