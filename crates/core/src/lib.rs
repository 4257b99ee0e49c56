//! Core algorithms for spellfix
//!
//! Everything the `spellfix1` virtual table needs to rank candidate words,
//! kept free of any `SQLite` dependency so it can be tested in isolation.

mod editdist;
mod editdist3;
mod env_config;
mod error;
mod phonetic;
mod score;
mod script;
mod translit;

pub use editdist::{edit_distance, edit_distance_with_len};
pub use editdist3::{
    DEFAULT_DEL_COST, DEFAULT_INS_COST, DEFAULT_SUB_COST, EditCostTable, LanguageCosts,
};
pub use env_config::{env_parse_at_least, env_parse_with_default};
pub use error::*;
pub use phonetic::{CharClass, MAX_HASH_LEN, phonetic_hash};
pub use score::candidate_score;
pub use script::{MIXED_SCRIPT, Script, UNKNOWN_SCRIPT, script_code};
pub use translit::{normalize_word, transliterate, transliterated_prefix_len};
