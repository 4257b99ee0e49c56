//! The `spellfix1` `SQLite` extension
//!
//! Provides a virtual table that suggests corrections for misspelled words:
//!
//! ```sql
//! CREATE VIRTUAL TABLE words USING spellfix1;
//! INSERT INTO words(word, rank) VALUES ('jumped', 10);
//! SELECT word, distance FROM words WHERE word MATCH 'jumpeg' AND top = 3;
//! ```
//!
//! Rust callers use [`register`] on a connection, or [`auto`] to have every
//! new connection pick the extension up. C hosts call the exported
//! `sqlite3_spellfix_init` entry point.

mod costs;
mod entry;
mod error;
mod functions;
mod search;
mod vocab;
mod vtab;

use rusqlite::Connection;

#[cfg(not(feature = "loadable_extension"))]
pub use entry::{auto, cancel};
pub use entry::sqlite3_spellfix_init;
pub use functions::register_functions;
pub use search::{DEFAULT_SCOPE, DEFAULT_TOP, MAX_TOP};
pub use vtab::{SpellfixCursor, SpellfixTable};

/// Name the virtual table module is registered under.
pub const MODULE_NAME: &str = "spellfix1";

/// Register the `spellfix1` module and the helper functions on `db`.
///
/// Registering again replaces the earlier registration.
///
/// # Errors
///
/// Returns an error if `SQLite` rejects the module or a function.
pub fn register(db: &Connection) -> rusqlite::Result<()> {
    db.create_module(MODULE_NAME, rusqlite::vtab::update_module::<SpellfixTable>(), None)?;
    register_functions(db)?;
    tracing::debug!("spellfix1 registered on connection");
    Ok(())
}
