use super::{create_test_storage, fox_page};
use crate::{Match, NewPage, PageStatus, StorageError};

fn docs() -> Vec<String> {
    vec!["docs".to_owned()]
}

#[test]
fn test_search_highlights_title() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    let page = storage.search(&docs(), "quick", 1, 10).unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.results.len(), 1);
    let hit = &page.results[0];
    assert_eq!(hit.url, "/fox");
    assert_eq!(
        hit.title,
        vec![Match::plain("The "), Match::highlighted("quick"), Match::plain(" brown fox")]
    );
    assert!(hit.content.iter().all(|m| !m.highlighted));
}

#[test]
fn test_search_last_word_is_prefix() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    let page = storage.search(&docs(), "lazy do", 1, 10).unwrap();
    assert_eq!(page.total, 1);
    assert!(page.results[0].content.contains(&Match::highlighted("dog")));

    // only the last word is a prefix
    assert_eq!(storage.search(&docs(), "la dog", 1, 10).unwrap().total, 0);
}

#[test]
fn test_search_ranks_title_matches_first() {
    let (storage, _temp_dir) = create_test_storage();
    storage
        .add_document(&NewPage::new("docs", "/a", "Gardening").content("a fox ate the carrots"))
        .unwrap();
    storage
        .add_document(&NewPage::new("docs", "/b", "Fox facts").content("all about foxes"))
        .unwrap();

    let page = storage.search(&docs(), "fox", 1, 10).unwrap();
    let urls: Vec<&str> = page.results.iter().map(|h| h.url.as_str()).collect();
    assert_eq!(urls, vec!["/b", "/a"]);
    assert!(page.results[0].rank <= page.results[1].rank);
}

#[test]
fn test_search_pagination() {
    let (storage, _temp_dir) = create_test_storage();
    for i in 0..3 {
        storage
            .add_document(&NewPage::new("docs", format!("/{i}"), format!("Rust page {i}")))
            .unwrap();
    }

    let first = storage.search(&docs(), "rust", 1, 2).unwrap();
    let second = storage.search(&docs(), "rust", 2, 2).unwrap();

    assert_eq!(first.total, 3);
    assert_eq!(first.results.len(), 2);
    assert_eq!(second.total, 3);
    assert_eq!(second.page, 2);
    assert_eq!(second.results.len(), 1);
}

#[test]
fn test_search_filters_source_and_status() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.add_document(&NewPage::new("blog", "/fox", "A fox on the blog")).unwrap();
    storage
        .add_document(&NewPage::new("docs", "/broken", "Fox page").status(PageStatus::Error))
        .unwrap();

    let page = storage.search(&docs(), "fox", 1, 10).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.results[0].url, "/fox");

    let both = vec!["docs".to_owned(), "blog".to_owned()];
    assert_eq!(storage.search(&both, "fox", 1, 10).unwrap().total, 2);
}

#[test]
fn test_search_follows_updates_and_removals() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.add_document(&fox_page().content("slept all day")).unwrap();

    assert_eq!(storage.search(&docs(), "lazy", 1, 10).unwrap().total, 0);
    assert_eq!(storage.search(&docs(), "slept", 1, 10).unwrap().total, 1);

    storage.remove_document("docs", "/fox").unwrap();
    assert_eq!(storage.search(&docs(), "slept", 1, 10).unwrap().total, 0);
}

#[test]
fn test_search_empty_inputs() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    let page = storage.search(&docs(), " ... ", 1, 10).unwrap();
    assert_eq!(page.total, 0);
    assert!(page.results.is_empty());
    assert_eq!(storage.search(&[], "fox", 1, 10).unwrap().total, 0);
}

#[test]
fn test_search_rejects_zero_page_size() {
    let (storage, _temp_dir) = create_test_storage();
    let err = storage.search(&docs(), "fox", 1, 0).unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));
}

#[test]
fn test_search_query_syntax_is_inert() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    let page = storage.search(&docs(), "quick\" OR NEAR(", 1, 10).unwrap();
    assert_eq!(page.total, 0);
    let page = storage.search(&docs(), "\"quick\"", 1, 10).unwrap();
    assert_eq!(page.total, 1);
}
