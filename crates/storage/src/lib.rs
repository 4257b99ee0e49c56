//! Storage layer for spellfix
//!
//! `SQLite` page store with an FTS5 index for full-text search and a
//! `spellfix1` index, built from the FTS5 vocabulary, for correcting
//! misspelled queries.

mod error;
mod migrations;
mod storage;
#[cfg(test)]
mod tests;
mod types;

pub use error::{Result, StorageError};
pub use storage::{
    DEFAULT_MAX_DISTANCE, DEFAULT_POOL_SIZE, Storage, build_fts_query, split_highlights,
};
pub use types::{IndexStats, Match, NewPage, Page, PageStatus, SearchHit, SearchPage, Suggestion};
