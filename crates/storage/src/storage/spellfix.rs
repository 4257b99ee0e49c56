//! Spelling correction from the corpus vocabulary.
//!
//! `pages_vocab` (fts5vocab) exposes every term in `pages_fts` with its
//! occurrence count; `pages_spellfix` (spellfix1) holds those terms ranked by
//! that count.

use rusqlite::{Connection, OptionalExtension as _, params};
use std::collections::HashMap;

use super::{NON_WORD, Storage, get_conn, log_row_error};
use crate::error::Result;
use crate::types::{IndexStats, Suggestion};

const CREATE_INDEX_SQL: &str = "
CREATE VIRTUAL TABLE IF NOT EXISTS pages_vocab USING fts5vocab(pages_fts, row);
CREATE VIRTUAL TABLE IF NOT EXISTS pages_spellfix USING spellfix1;
";

const DROP_INDEX_SQL: &str = "
DROP TABLE IF EXISTS pages_spellfix;
DROP TABLE IF EXISTS pages_vocab;
";

fn spellfix_table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'pages_spellfix'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Lower-case `raw` and drop everything but word characters.
fn clean_word(raw: &str) -> String {
    NON_WORD.replace_all(&raw.to_lowercase(), "").into_owned()
}

impl Storage {
    /// Whether [`Storage::create_spellfix_index`] has been run.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn has_spellfix_index(&self) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        Ok(spellfix_table_exists(&conn)?)
    }

    /// Build or refresh the spelling index from the current corpus.
    ///
    /// New terms are inserted with their occurrence count as rank, changed
    /// counts are updated and terms no longer in the corpus are removed, all
    /// in one transaction.
    ///
    /// # Errors
    /// Returns error if any statement fails; the index is then left as it was.
    pub fn create_spellfix_index(&self) -> Result<IndexStats> {
        let mut conn = get_conn(&self.pool)?;
        conn.execute_batch(CREATE_INDEX_SQL)?;

        let tx = conn.transaction()?;
        let mut existing: HashMap<String, (i64, i64)> = tx
            .prepare("SELECT id, word, rank FROM pages_spellfix_vocab")?
            .query_map([], |row| {
                Ok((row.get::<_, String>(1)?, (row.get(0)?, row.get::<_, Option<i64>>(2)?.unwrap_or(0))))
            })?
            .filter_map(log_row_error)
            .collect();
        let terms: Vec<(String, i64)> = tx
            .prepare("SELECT term, cnt FROM pages_vocab")?
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(log_row_error)
            .collect();

        let mut stats = IndexStats::default();
        {
            let mut insert = tx.prepare("INSERT INTO pages_spellfix (word, rank) VALUES (?1, ?2)")?;
            let mut update = tx.prepare("UPDATE pages_spellfix SET rank = ?1 WHERE rowid = ?2")?;
            let mut delete = tx.prepare("DELETE FROM pages_spellfix WHERE rowid = ?1")?;

            for (term, count) in &terms {
                match existing.remove(term) {
                    None => {
                        insert.execute(params![term, count])?;
                        stats.inserted += 1;
                    },
                    Some((id, rank)) if rank != *count => {
                        update.execute(params![count, id])?;
                        stats.updated += 1;
                    },
                    Some(_) => {},
                }
            }
            for (id, _) in existing.values() {
                delete.execute([id])?;
                stats.deleted += 1;
            }
        }
        tx.commit()?;

        stats.total = terms.len() as u64;
        tracing::info!(
            inserted = stats.inserted,
            updated = stats.updated,
            deleted = stats.deleted,
            total = stats.total,
            "spellfix index built"
        );
        Ok(stats)
    }

    /// Remove the spelling index to free disk space.
    ///
    /// # Errors
    /// Returns error if the tables cannot be dropped.
    pub fn drop_spellfix_index(&self) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        conn.execute_batch(DROP_INDEX_SQL)?;
        tracing::info!("spellfix index dropped");
        Ok(())
    }

    /// Replace each word of `query` with its best correction.
    ///
    /// Words are lower-cased and stripped to word characters first; words
    /// without a correction within the distance limit are kept as they are.
    /// Without an index the query is returned unchanged.
    ///
    /// # Errors
    /// Returns error if a lookup fails.
    pub fn spellfix(&self, query: &str) -> Result<String> {
        let conn = get_conn(&self.pool)?;
        if !spellfix_table_exists(&conn)? {
            tracing::debug!("no spellfix index, query left unchanged");
            return Ok(query.to_owned());
        }

        let mut stmt = conn.prepare_cached(
            "SELECT word FROM pages_spellfix
              WHERE word MATCH ?1 AND distance <= ?2 AND scope = ?3 AND top = 1",
        )?;
        let mut fixed = Vec::new();
        for raw in query.split_whitespace() {
            let word = clean_word(raw);
            if word.is_empty() {
                continue;
            }
            let best: Option<String> = stmt
                .query_row(params![word, self.max_distance, self.scope], |row| row.get(0))
                .optional()?;
            fixed.push(best.unwrap_or(word));
        }

        let result = fixed.join(" ");
        tracing::debug!(query, result = %result, "spellfix");
        Ok(result)
    }

    /// Up to `limit` candidate corrections for `word`, best first.
    ///
    /// Returns nothing when there is no index.
    ///
    /// # Errors
    /// Returns error if the lookup fails.
    pub fn suggest(&self, word: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let word = clean_word(word);
        if word.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let conn = get_conn(&self.pool)?;
        if !spellfix_table_exists(&conn)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare_cached(
            "SELECT word, distance, score, rank FROM pages_spellfix
              WHERE word MATCH ?1 AND top = ?2 AND scope = ?3
              ORDER BY score",
        )?;
        let suggestions = stmt
            .query_map(params![word, limit as i64, self.scope], |row| {
                Ok(Suggestion {
                    word: row.get(0)?,
                    distance: row.get(1)?,
                    score: row.get(2)?,
                    rank: row.get(3)?,
                })
            })?
            .filter_map(log_row_error)
            .collect();
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("The"), "the");
        assert_eq!(clean_word("dog."), "dog");
        assert_eq!(clean_word("\"quick,\""), "quick");
        assert_eq!(clean_word("--"), "");
    }
}
