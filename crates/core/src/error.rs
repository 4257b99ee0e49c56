use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by the spellfix algorithms and the extension built on them
#[derive(Error, Debug)]
pub enum SpellfixError {
    #[error("non-ASCII input to editdist()")]
    NonAscii,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown value for {table}.command: \"{command}\"")]
    UnknownCommand { table: String, command: String },

    #[error("NOT NULL constraint failed: {table}.{column}")]
    NotNull { table: String, column: &'static str },

    #[error("edit cost table error: {0}")]
    CostTable(String),
}

pub type Result<T> = StdResult<T, SpellfixError>;
