//! Candidate search for `word MATCH ?` queries.
//!
//! The pattern's phonetic hash selects a range of the `(langid, k2)` index;
//! every row in that range is scored with `editdist3` and the best `top`
//! survive.

use rusqlite::{Connection, params};
use spellfix_core::{
    EditCostTable, MAX_HASH_LEN, candidate_score, normalize_word, phonetic_hash,
    transliterated_prefix_len,
};

use crate::vocab::VocabTable;

/// Results returned when no `top` constraint is given.
pub const DEFAULT_TOP: usize = 20;
/// Upper bound on `top`.
pub const MAX_TOP: usize = 1000;
/// Hash prefix length compared when no `scope` constraint is given.
pub const DEFAULT_SCOPE: usize = 3;

/// One row produced by the virtual table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub rowid: i64,
    pub word: String,
    pub rank: i64,
    pub lang_id: i64,
    pub k2: String,
    pub distance: i32,
    pub score: i32,
    pub matchlen: usize,
}

/// Parameters of a MATCH query.
#[derive(Debug, Clone)]
pub(crate) struct SearchParams {
    pub pattern: String,
    pub lang_id: i64,
    pub top: usize,
    pub scope: usize,
    pub max_distance: Option<i32>,
}

impl SearchParams {
    pub fn new(pattern: String) -> Self {
        Self {
            pattern,
            lang_id: 0,
            top: DEFAULT_TOP,
            scope: DEFAULT_SCOPE,
            max_distance: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SearchResults {
    pub candidates: Vec<Candidate>,
    /// Number of vocabulary rows scored.
    pub examined: i64,
    /// Scope actually used after adjusting for short hashes.
    pub scope: usize,
}

/// Work out the `k2` range to scan for a pattern hash and requested scope.
fn hash_range(hash: &str, scope: usize) -> (String, String, usize) {
    let mut scope = scope.max(1);
    if hash.len() <= scope {
        scope = if hash.len() > 2 { hash.len() - 1 } else { hash.len() };
    }
    let lower = hash[..scope].to_owned();
    let upper = format!("{lower}Z");
    (lower, upper, scope)
}

pub(crate) fn search(
    db: &Connection,
    vocab: &VocabTable,
    costs: &EditCostTable,
    params: &SearchParams,
) -> rusqlite::Result<SearchResults> {
    let normalized = normalize_word(&params.pattern);
    let (pattern, prefix) = match normalized.strip_suffix('*') {
        Some(p) => (p.to_owned(), true),
        None => (normalized, false),
    };

    let mut hash = phonetic_hash(&pattern);
    hash.truncate(MAX_HASH_LEN);
    let (lower, upper, scope) = hash_range(&hash, params.scope);

    let sql = format!(
        "SELECT id, word, rank, coalesce(k1, word), k2 FROM {}
          WHERE langid = ?1 AND k2 >= ?2 AND k2 < ?3",
        vocab.qualified_name()
    );
    let mut stmt = db.prepare_cached(&sql)?;
    let mut rows = stmt.query(params![params.lang_id, lower, upper])?;

    let mut results = SearchResults { scope, ..SearchResults::default() };
    while let Some(row) = rows.next()? {
        results.examined += 1;
        let Some(word) = row.get::<_, Option<String>>(1)? else { continue };
        let k1: String = row.get::<_, Option<String>>(3)?.unwrap_or_default();
        let rank: i64 = row.get::<_, Option<i64>>(2)?.unwrap_or(0);

        let (distance, matchlen) = if prefix {
            let (distance, matched) = costs.prefix_distance(&pattern, &k1, params.lang_id);
            (distance, transliterated_prefix_len(&word, matched))
        } else {
            (costs.distance(&pattern, &k1, params.lang_id), word.chars().count())
        };
        if params.max_distance.is_some_and(|max| distance > max) {
            continue;
        }

        results.candidates.push(Candidate {
            rowid: row.get(0)?,
            score: candidate_score(distance, rank),
            word,
            rank,
            lang_id: params.lang_id,
            k2: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            distance,
            matchlen,
        });
    }

    results.candidates.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then(a.distance.cmp(&b.distance))
            .then_with(|| a.word.cmp(&b.word))
            .then(a.rowid.cmp(&b.rowid))
    });
    results.candidates.truncate(params.top.clamp(1, MAX_TOP));

    tracing::debug!(
        pattern = %params.pattern,
        hash = %hash,
        scope,
        examined = results.examined,
        matched = results.candidates.len(),
        "spellfix1 search"
    );
    Ok(results)
}
