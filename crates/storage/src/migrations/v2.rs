//! Migration v2: FTS5 index over pages

pub(super) const SQL: &str = "
DROP TABLE IF EXISTS pages_fts;

CREATE VIRTUAL TABLE pages_fts USING fts5(
    url, title, description, content,
    content='pages',
    content_rowid='id'
);

DROP TRIGGER IF EXISTS pages_ai;
CREATE TRIGGER pages_ai AFTER INSERT ON pages BEGIN
    INSERT INTO pages_fts(rowid, url, title, description, content)
    VALUES (new.id, new.url, new.title, new.description, new.content);
END;

DROP TRIGGER IF EXISTS pages_ad;
CREATE TRIGGER pages_ad AFTER DELETE ON pages BEGIN
    INSERT INTO pages_fts(pages_fts, rowid, url, title, description, content)
    VALUES ('delete', old.id, old.url, old.title, old.description, old.content);
END;

DROP TRIGGER IF EXISTS pages_au;
CREATE TRIGGER pages_au AFTER UPDATE ON pages BEGIN
    INSERT INTO pages_fts(pages_fts, rowid, url, title, description, content)
    VALUES ('delete', old.id, old.url, old.title, old.description, old.content);
    INSERT INTO pages_fts(rowid, url, title, description, content)
    VALUES (new.id, new.url, new.title, new.description, new.content);
END;

INSERT INTO pages_fts(pages_fts) VALUES ('rebuild');
";
