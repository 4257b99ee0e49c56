use super::{create_test_storage, fox_page};
use crate::{NewPage, PageStatus, StorageError};

#[test]
fn test_add_and_get_document() {
    let (storage, _temp_dir) = create_test_storage();

    let id = storage.add_document(&fox_page()).unwrap();
    let page = storage.get_document("docs", "/fox").unwrap().unwrap();

    assert_eq!(page.id, id);
    assert_eq!(page.title, "The quick brown fox");
    assert_eq!(page.content, "jumped over the lazy dog");
    assert_eq!(page.description, "");
    assert_eq!(page.status, PageStatus::Finished);
    assert!(!page.crawled_at.is_empty());
}

#[test]
fn test_get_missing_document() {
    let (storage, _temp_dir) = create_test_storage();
    assert!(storage.get_document("docs", "/nothing").unwrap().is_none());
}

#[test]
fn test_add_document_replaces_same_url() {
    let (storage, _temp_dir) = create_test_storage();

    let first = storage.add_document(&fox_page()).unwrap();
    let second = storage
        .add_document(&fox_page().content("slept all day").status(PageStatus::Unindexable))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(storage.count_documents().unwrap(), 1);
    let page = storage.get_document("docs", "/fox").unwrap().unwrap();
    assert_eq!(page.content, "slept all day");
    assert_eq!(page.status, PageStatus::Unindexable);
}

#[test]
fn test_same_url_in_other_source_is_separate() {
    let (storage, _temp_dir) = create_test_storage();

    let a = storage.add_document(&fox_page()).unwrap();
    let b = storage.add_document(&NewPage::new("blog", "/fox", "Another fox")).unwrap();

    assert_ne!(a, b);
    assert_eq!(storage.count_documents().unwrap(), 2);
}

#[test]
fn test_add_document_rejects_empty_source() {
    let (storage, _temp_dir) = create_test_storage();
    let err = storage.add_document(&NewPage::new("", "/fox", "fox")).unwrap_err();
    assert!(matches!(err, StorageError::InvalidInput(_)));
}

#[test]
fn test_remove_document() {
    let (storage, _temp_dir) = create_test_storage();

    storage.add_document(&fox_page()).unwrap();
    storage.remove_document("docs", "/fox").unwrap();

    assert_eq!(storage.count_documents().unwrap(), 0);
    let err = storage.remove_document("docs", "/fox").unwrap_err();
    assert!(matches!(err, StorageError::NotFound { entity: "page", .. }));
}
