//! Test utilities and module declarations for storage tests.

use crate::{NewPage, Storage};
use tempfile::TempDir;

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();
    (storage, temp_dir)
}

/// The page every spelling test indexes: eight distinct terms, "fox" and
/// "the" twice each.
pub fn fox_page() -> NewPage {
    NewPage::new("docs", "/fox", "The quick brown fox").content("jumped over the lazy dog")
}

mod document_tests;
mod search_tests;
mod spellfix_tests;

#[test]
#[expect(clippy::unwrap_used, reason = "test code")]
fn in_memory_storage_is_usable() {
    let storage = Storage::in_memory().unwrap();
    storage.add_document(&fox_page()).unwrap();
    assert_eq!(storage.count_documents().unwrap(), 1);
}

#[test]
#[expect(clippy::unwrap_used, reason = "test code")]
fn reopening_keeps_pages() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("reopen.db");
    {
        let storage = Storage::new(&db_path).unwrap();
        storage.add_document(&fox_page()).unwrap();
    }
    let storage = Storage::new(&db_path).unwrap();
    assert_eq!(storage.count_documents().unwrap(), 1);
}

#[test]
#[expect(clippy::unwrap_used, reason = "test code")]
fn every_pooled_connection_has_spellfix() {
    let (storage, _temp_dir) = create_test_storage();
    let first = storage.pool.get().unwrap();
    let second = storage.pool.get().unwrap();
    for conn in [&first, &second] {
        let hash: String =
            conn.query_row("SELECT spellfix1_phonehash('lazy')", [], |row| row.get(0)).unwrap();
        assert_eq!(hash, "LCA");
    }
}
