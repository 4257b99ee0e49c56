//! The `<table>_vocab` shadow table holding the dictionary.

use rusqlite::{Connection, OptionalExtension as _, params};
use spellfix_core::{normalize_word, phonetic_hash};

use crate::error::quote_identifier;
use crate::search::Candidate;

/// A word ready to be stored, with its derived matching keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VocabEntry {
    pub word: String,
    pub rank: i64,
    pub lang_id: i64,
    /// Normalized spelling used for edit distance.
    pub k1: String,
    /// Phonetic hash of `k1`.
    pub k2: String,
}

impl VocabEntry {
    pub fn new(word: String, soundslike: Option<&str>, rank: i64, lang_id: i64) -> Self {
        let k1 = normalize_word(soundslike.unwrap_or(&word));
        let k2 = phonetic_hash(&k1);
        Self { word, rank, lang_id, k1, k2 }
    }
}

/// Location of a vocabulary table.
#[derive(Debug, Clone)]
pub(crate) struct VocabTable {
    schema: String,
    table: String,
}

impl VocabTable {
    /// Vocabulary for the virtual table `vtab` in `schema`.
    pub fn new(schema: &str, vtab: &str) -> Self {
        Self { schema: schema.to_owned(), table: format!("{vtab}_vocab") }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", quote_identifier(&self.schema), quote_identifier(&self.table))
    }

    pub fn create(&self, db: &Connection) -> rusqlite::Result<()> {
        let index = format!("{}_index_langid_k2", self.table);
        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY,
                rank INT,
                langid INT,
                word TEXT,
                k1 TEXT,
                k2 TEXT
             );
             CREATE INDEX IF NOT EXISTS {schema}.{index} ON {bare}(langid, k2);",
            table = self.qualified_name(),
            schema = quote_identifier(&self.schema),
            index = quote_identifier(&index),
            bare = quote_identifier(&self.table),
        ))
    }

    pub fn drop_table(&self, db: &Connection) -> rusqlite::Result<()> {
        db.execute_batch(&format!("DROP TABLE IF EXISTS {}", self.qualified_name()))
    }

    /// Insert a word, returning its rowid.
    pub fn insert(
        &self,
        db: &Connection,
        rowid: Option<i64>,
        entry: &VocabEntry,
    ) -> rusqlite::Result<i64> {
        let sql = format!(
            "INSERT INTO {} (id, rank, langid, word, k1, k2) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.qualified_name()
        );
        db.prepare_cached(&sql)?.execute(params![
            rowid,
            entry.rank,
            entry.lang_id,
            entry.word,
            entry.k1,
            entry.k2
        ])?;
        Ok(db.last_insert_rowid())
    }

    /// Replace the row `old_rowid`, possibly moving it to `new_rowid`.
    pub fn update(
        &self,
        db: &Connection,
        old_rowid: i64,
        new_rowid: i64,
        entry: &VocabEntry,
    ) -> rusqlite::Result<()> {
        let sql = format!(
            "UPDATE {} SET id = ?1, rank = ?2, langid = ?3, word = ?4, k1 = ?5, k2 = ?6 WHERE id = ?7",
            self.qualified_name()
        );
        db.prepare_cached(&sql)?.execute(params![
            new_rowid,
            entry.rank,
            entry.lang_id,
            entry.word,
            entry.k1,
            entry.k2,
            old_rowid
        ])?;
        Ok(())
    }

    pub fn delete(&self, db: &Connection, rowid: i64) -> rusqlite::Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.qualified_name());
        db.prepare_cached(&sql)?.execute([rowid])?;
        Ok(())
    }

    /// Every stored word, or just `rowid` when given.
    pub fn scan(&self, db: &Connection, rowid: Option<i64>) -> rusqlite::Result<Vec<Candidate>> {
        let base = format!(
            "SELECT id, word, rank, langid, k2 FROM {}",
            self.qualified_name()
        );
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<Candidate> {
            let word: Option<String> = row.get(1)?;
            let word = word.unwrap_or_default();
            Ok(Candidate {
                rowid: row.get(0)?,
                matchlen: word.chars().count(),
                word,
                rank: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                lang_id: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
                k2: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                distance: 0,
                score: 0,
            })
        };

        match rowid {
            Some(id) => {
                let mut stmt = db.prepare_cached(&format!("{base} WHERE id = ?1"))?;
                let found = stmt.query_row([id], map_row).optional()?;
                Ok(found.into_iter().collect())
            },
            None => {
                let mut stmt = db.prepare_cached(&format!("{base} ORDER BY id"))?;
                let rows = stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_derives_keys_from_word() {
        let entry = VocabEntry::new("Jumped".to_owned(), None, 3, 0);
        assert_eq!(entry.k1, "jumped");
        assert_eq!(entry.k2, "CAMBAD");
        assert_eq!(entry.rank, 3);
    }

    #[test]
    fn test_entry_prefers_soundslike() {
        let entry = VocabEntry::new("Nguyen".to_owned(), Some("win"), 1, 0);
        assert_eq!(entry.word, "Nguyen");
        assert_eq!(entry.k1, "win");
        assert_eq!(entry.k2, phonetic_hash("win"));
    }

    #[test]
    fn test_create_insert_scan_delete() {
        let db = Connection::open_in_memory().unwrap();
        let vocab = VocabTable::new("main", "words");
        vocab.create(&db).unwrap();

        let id = vocab.insert(&db, None, &VocabEntry::new("hello".to_owned(), None, 1, 0)).unwrap();
        vocab.insert(&db, Some(10), &VocabEntry::new("world".to_owned(), None, 2, 0)).unwrap();

        let all = vocab.scan(&db, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].rowid, 10);
        assert_eq!(all[1].word, "world");

        let one = vocab.scan(&db, Some(id)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].word, "hello");

        vocab.delete(&db, id).unwrap();
        assert!(vocab.scan(&db, Some(id)).unwrap().is_empty());

        vocab.drop_table(&db).unwrap();
        assert!(vocab.scan(&db, None).is_err());
    }
}
