//! Migration v1: pages table

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY,
    source TEXT NOT NULL,
    url TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    content TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'finished',
    crawled_at TEXT NOT NULL,
    UNIQUE (source, url)
);

CREATE INDEX IF NOT EXISTS idx_pages_source_status ON pages(source, status);
";
