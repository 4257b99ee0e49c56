//! Mapping of spellfix errors onto the error types `SQLite` callbacks expect.

use spellfix_core::SpellfixError;

/// Error raised from a virtual table callback.
pub(crate) fn module_error(err: SpellfixError) -> rusqlite::Error {
    rusqlite::Error::ModuleError(err.to_string())
}

/// Error raised from a scalar function.
pub(crate) fn user_error(err: SpellfixError) -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(Box::new(err))
}

/// Quote an SQL identifier with double quotes.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
