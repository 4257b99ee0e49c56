use super::{create_test_storage, fox_page};
use crate::{IndexStats, NewPage};

#[test]
fn test_spellfix_sentence() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.create_spellfix_index().unwrap();

    let fixed = storage.spellfix("The quicg browg fog jumpeg ovrr the lazg dog").unwrap();
    assert_eq!(fixed, "the quick brown fox jumped over the lazy dog");
}

#[test]
fn test_spellfix_keeps_unknown_words() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.create_spellfix_index().unwrap();

    assert_eq!(storage.spellfix("Xylophone, quikc!").unwrap(), "xylophone quick");
    assert_eq!(storage.spellfix("  ...  ").unwrap(), "");
}

#[test]
fn test_spellfix_respects_max_distance() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.create_spellfix_index().unwrap();

    let strict = storage.with_max_distance(0);
    assert_eq!(strict.spellfix("quick browg").unwrap(), "quick browg");
}

#[test]
fn test_spellfix_without_index_is_identity() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    assert!(!storage.has_spellfix_index().unwrap());
    assert_eq!(storage.spellfix("The quicg fog").unwrap(), "The quicg fog");
    assert!(storage.suggest("quicg", 5).unwrap().is_empty());
}

#[test]
fn test_index_build_is_incremental() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();

    let first = storage.create_spellfix_index().unwrap();
    assert_eq!(first, IndexStats { inserted: 8, updated: 0, deleted: 0, total: 8 });
    assert!(storage.has_spellfix_index().unwrap());

    let again = storage.create_spellfix_index().unwrap();
    assert_eq!(again, IndexStats { inserted: 0, updated: 0, deleted: 0, total: 8 });

    // "dog" and "the" gain occurrences
    storage.add_document(&NewPage::new("docs", "/dog", "the dog")).unwrap();
    let grown = storage.create_spellfix_index().unwrap();
    assert_eq!(grown, IndexStats { inserted: 0, updated: 2, deleted: 0, total: 8 });

    storage.remove_document("docs", "/fox").unwrap();
    let shrunk = storage.create_spellfix_index().unwrap();
    assert_eq!(shrunk, IndexStats { inserted: 0, updated: 2, deleted: 6, total: 2 });
}

#[test]
fn test_suggest_orders_by_score() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.create_spellfix_index().unwrap();

    let suggestions = storage.suggest("dog", 5).unwrap();
    assert_eq!(suggestions[0].word, "dog");
    assert_eq!(suggestions[0].distance, 0);
    assert_eq!(suggestions[0].rank, 1);
    assert!(suggestions.windows(2).all(|w| w[0].score <= w[1].score));
    assert!(suggestions.len() <= 5);

    assert!(storage.suggest("dog", 0).unwrap().is_empty());
    assert!(storage.suggest("!!", 5).unwrap().is_empty());
}

#[test]
fn test_drop_spellfix_index() {
    let (storage, _temp_dir) = create_test_storage();
    storage.add_document(&fox_page()).unwrap();
    storage.create_spellfix_index().unwrap();

    storage.drop_spellfix_index().unwrap();
    assert!(!storage.has_spellfix_index().unwrap());
    assert_eq!(storage.spellfix("quicg").unwrap(), "quicg");

    // dropping twice is fine, and the index can be rebuilt
    storage.drop_spellfix_index().unwrap();
    assert_eq!(storage.create_spellfix_index().unwrap().inserted, 8);
}
