//! Full-text search over pages (FTS5)

use rusqlite::params_from_iter;
use rusqlite::types::Value;
use uuid::Uuid;

use super::{NON_WORD, Storage, get_conn, log_row_error};
use crate::error::{Result, StorageError};
use crate::types::{Match, PageStatus, SearchHit, SearchPage};

/// Column weights for bm25: url, title, description, content.
const BM25_WEIGHTS: &str = "1.0, 3.0, 0.8, 1.0";

/// Build an FTS5 query from free text.
///
/// Every word is quoted so FTS5 syntax in the input is inert, and the last
/// word is a prefix match so results update while the user is typing.
/// Returns an empty string when the input has no words.
#[must_use]
pub fn build_fts_query(query: &str) -> String {
    let words: Vec<&str> = NON_WORD.split(query).filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return String::new();
    }
    format!("\"{}\"*", words.join("\" \""))
}

/// Split text produced by `highlight()`/`snippet()` at the `start`/`end`
/// markers.
///
/// Text between markers becomes highlighted matches, everything else plain
/// matches. Empty runs are dropped. An unterminated marker ends the output.
#[must_use]
pub fn split_highlights(input: &str, start: &str, end: &str) -> Vec<Match> {
    let mut matches = Vec::with_capacity(3);
    let mut rest = input;
    while !rest.is_empty() {
        let Some(open) = rest.find(start) else {
            matches.push(Match::plain(rest));
            break;
        };
        if open > 0 {
            matches.push(Match::plain(&rest[..open]));
        }
        let inner = &rest[open + start.len()..];
        let Some(close) = inner.find(end) else {
            break;
        };
        matches.push(Match::highlighted(&inner[..close]));
        rest = &inner[close + end.len()..];
    }
    matches
}

impl Storage {
    /// Search finished pages from `sources`.
    ///
    /// `page` is 1-based. Results are ordered by weighted bm25, best first.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a zero page size, or error if the query fails.
    pub fn search(
        &self,
        sources: &[String],
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage> {
        if page_size == 0 {
            return Err(StorageError::InvalidInput("page size must be at least 1".to_owned()));
        }
        let page = page.max(1);
        let empty = SearchPage { results: Vec::new(), total: 0, page, page_size };

        let fts_query = build_fts_query(query);
        if sources.is_empty() || fts_query.is_empty() {
            return Ok(empty);
        }

        let start = Uuid::new_v4().to_string();
        let end = Uuid::new_v4().to_string();
        let offset = i64::from(page - 1) * i64::from(page_size);

        // ?1-?6 are fixed, sources follow
        let mut values = vec![
            Value::Text(start.clone()),
            Value::Text(end.clone()),
            Value::Text(fts_query.clone()),
            Value::Text(PageStatus::Finished.as_str().to_owned()),
            Value::Integer(i64::from(page_size)),
            Value::Integer(offset),
        ];
        let first_source = values.len() + 1;
        values.extend(sources.iter().cloned().map(Value::Text));
        let placeholders = (first_source..first_source + sources.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT bm25(pages_fts, {BM25_WEIGHTS}) AS score,
                    pages.url,
                    highlight(pages_fts, 1, ?1, ?2),
                    snippet(pages_fts, 2, ?1, ?2, '…', 8),
                    snippet(pages_fts, 3, ?1, ?2, '…', 24)
               FROM pages_fts
               JOIN pages ON pages.id = pages_fts.rowid
              WHERE pages_fts MATCH ?3
                AND pages.status = ?4
                AND pages.source IN ({placeholders})
              ORDER BY score
              LIMIT ?5 OFFSET ?6"
        ))?;
        let results: Vec<SearchHit> = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                // highlight() and snippet() yield NULL for NULL columns
                let title: Option<String> = row.get(2)?;
                let description: Option<String> = row.get(3)?;
                let content: Option<String> = row.get(4)?;
                Ok(SearchHit {
                    rank: row.get(0)?,
                    url: row.get(1)?,
                    title: split_highlights(title.as_deref().unwrap_or_default(), &start, &end),
                    description: split_highlights(
                        description.as_deref().unwrap_or_default(),
                        &start,
                        &end,
                    ),
                    content: split_highlights(content.as_deref().unwrap_or_default(), &start, &end),
                })
            })?
            .filter_map(log_row_error)
            .collect();

        let total: i64 = conn.query_row(
            &format!(
                "SELECT count(*)
                   FROM pages_fts
                   JOIN pages ON pages.id = pages_fts.rowid
                  WHERE pages_fts MATCH ?3
                    AND pages.status = ?4
                    AND pages.source IN ({placeholders})"
            ),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        tracing::debug!(query, fts_query = %fts_query, total, returned = results.len(), "search");
        Ok(SearchPage { results, total: total as u64, page, page_size })
    }
}
