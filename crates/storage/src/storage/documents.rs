use chrono::Utc;
use rusqlite::{OptionalExtension as _, params};
use std::str::FromStr as _;

use super::{Storage, get_conn};
use crate::error::{Result, StorageError};
use crate::types::{NewPage, Page, PageStatus};

fn row_to_page(row: &rusqlite::Row<'_>) -> rusqlite::Result<Page> {
    let status: String = row.get(6)?;
    Ok(Page {
        id: row.get(0)?,
        source: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        content: row.get(5)?,
        status: PageStatus::from_str(&status).unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            PageStatus::Error
        }),
        crawled_at: row.get(7)?,
    })
}

impl Storage {
    /// Add a page, replacing any page with the same source and URL.
    ///
    /// Returns the page id, which is kept when an existing page is replaced.
    ///
    /// # Errors
    /// Returns error if source or URL is empty, or the database write fails.
    pub fn add_document(&self, page: &NewPage) -> Result<i64> {
        if page.source.is_empty() {
            return Err(StorageError::InvalidInput("page source must not be empty".to_owned()));
        }
        let conn = get_conn(&self.pool)?;
        let id = conn.query_row(
            "INSERT INTO pages (source, url, title, description, content, status, crawled_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT (source, url) DO UPDATE SET
                 title = excluded.title,
                 description = excluded.description,
                 content = excluded.content,
                 status = excluded.status,
                 crawled_at = excluded.crawled_at
               RETURNING id",
            params![
                page.source,
                page.url,
                page.title,
                page.description,
                page.content,
                page.status.as_str(),
                Utc::now().to_rfc3339(),
            ],
            |row| row.get(0),
        )?;
        tracing::debug!(id, source = %page.source, url = %page.url, "page stored");
        Ok(id)
    }

    /// Fetch a page by source and URL.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn get_document(&self, source: &str, url: &str) -> Result<Option<Page>> {
        let conn = get_conn(&self.pool)?;
        let page = conn
            .query_row(
                "SELECT id, source, url, title, description, content, status, crawled_at
                   FROM pages WHERE source = ?1 AND url = ?2",
                params![source, url],
                row_to_page,
            )
            .optional()?;
        Ok(page)
    }

    /// Remove a page by source and URL.
    ///
    /// # Errors
    /// Returns `NotFound` if there is no such page, or error if the delete fails.
    pub fn remove_document(&self, source: &str, url: &str) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        let removed =
            conn.execute("DELETE FROM pages WHERE source = ?1 AND url = ?2", params![source, url])?;
        if removed == 0 {
            return Err(StorageError::NotFound { entity: "page", id: format!("{source} {url}") });
        }
        Ok(())
    }

    /// Number of stored pages.
    ///
    /// # Errors
    /// Returns error if database query fails.
    pub fn count_documents(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        let count: i64 = conn.query_row("SELECT count(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
