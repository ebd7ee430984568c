use sift_core::persist::{load_index, save_index, IndexPaths};
use sift_core::{Document, Index, SearchError};

fn page(id: &str, title: &str) -> Document {
    Document {
        id: id.into(),
        url: format!("https://example.com/{id}"),
        title: title.into(),
        ..Default::default()
    }
}

#[test]
fn empty_corpus_is_searchable() {
    let index = Index::build([]).unwrap();
    assert!(index.search("anything", None).unwrap().is_empty());
}

#[test]
fn single_term_matches_all_containing_docs() {
    let index = Index::build([page("1", "search engine"), page("2", "search results")]).unwrap();
    let hits = index.search("search", None).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    // equal scores, tie broken by ingestion order
    assert_eq!(ids, vec!["1", "2"]);
}

#[test]
fn unmarked_multi_term_query_intersects() {
    let index = Index::build([page("1", "cat dog"), page("2", "cat")]).unwrap();
    let hits = index.search("cat dog", None).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["1"]);
}

#[test]
fn phrase_requires_consecutive_order() {
    let index = Index::build([page("1", "the quick brown fox")]).unwrap();
    assert_eq!(index.search(r#""quick brown""#, None).unwrap().len(), 1);
    assert!(index.search(r#""brown quick""#, None).unwrap().is_empty());
}

#[test]
fn phrase_does_not_cross_fields() {
    let index = Index::build([Document {
        id: "1".into(),
        title: "quick".into(),
        description: "brown".into(),
        ..Default::default()
    }])
    .unwrap();
    assert!(index.search(r#""quick brown""#, None).unwrap().is_empty());
}

#[test]
fn unknown_term_yields_empty_not_error() {
    let index = Index::build([page("1", "search engine")]).unwrap();
    assert!(index.search("zebra", None).unwrap().is_empty());
    // unknown optional term alongside a known required one is harmless
    let hits = index.search("+search zebra", None).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn title_outweighs_paragraphs() {
    let index = Index::build([
        Document {
            id: "body".into(),
            paragraphs: vec!["rust rust rust".into()],
            ..Default::default()
        },
        Document {
            id: "title".into(),
            title: "rust".into(),
            ..Default::default()
        },
    ])
    .unwrap();
    let hits = index.search("rust", None).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    // one title hit (weight 5.0) beats three body hits (3 × 1.0)
    assert_eq!(ids, vec!["title", "body"]);
}

#[test]
fn rebuild_and_requery_is_deterministic() {
    let docs = || {
        vec![
            page("1", "rust search engine"),
            page("2", "web search results"),
            page("3", "rust web crawler"),
        ]
    };
    let a = Index::build(docs()).unwrap();
    let b = Index::build(docs()).unwrap();
    for raw in ["search", "rust web", r#""rust search""#, "+web rust"] {
        let ha: Vec<(String, String)> = a
            .search(raw, None)
            .unwrap()
            .into_iter()
            .map(|h| (h.id, format!("{:.6}", h.score)))
            .collect();
        let hb: Vec<(String, String)> = b
            .search(raw, None)
            .unwrap()
            .into_iter()
            .map(|h| (h.id, format!("{:.6}", h.score)))
            .collect();
        assert_eq!(ha, hb, "query {raw:?} must rank identically");
    }
}

#[test]
fn result_cards_carry_display_fields() {
    let index = Index::build([Document {
        id: "1".into(),
        url: "https://example.com/a".into(),
        title: "A Page".into(),
        description: "About things.".into(),
        crawled_at: Some("2024-05-01T12:00:00Z".into()),
        ..Default::default()
    }])
    .unwrap();
    let hit = &index.search("page", None).unwrap()[0];
    assert_eq!(hit.url, "https://example.com/a");
    assert_eq!(hit.title, "A Page");
    assert_eq!(hit.description, "About things.");
    assert_eq!(hit.crawled_at.as_deref(), Some("2024-05-01T12:00:00Z"));
    assert!(hit.score > 0.0);
}

#[test]
fn persistence_round_trip_preserves_results() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let index = Index::build([page("1", "search engine"), page("2", "search results")]).unwrap();
    save_index(&paths, &index, "2024-01-01T00:00:00Z").unwrap();

    let (loaded, meta) = load_index(&paths).unwrap();
    assert_eq!(meta.num_docs, 2);
    let before: Vec<String> = index
        .search("search", None)
        .unwrap()
        .into_iter()
        .map(|h| h.id)
        .collect();
    let after: Vec<String> = loaded
        .search("search", None)
        .unwrap()
        .into_iter()
        .map(|h| h.id)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn missing_index_directory_reports_not_built() {
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("never-built"));
    let err = load_index(&paths).unwrap_err();
    assert!(matches!(err, SearchError::IndexNotBuilt { .. }));
}
