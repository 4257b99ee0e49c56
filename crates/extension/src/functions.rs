//! Scalar SQL functions registered next to the `spellfix1` module.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use spellfix_core::{
    EditCostTable, SpellfixError, edit_distance, phonetic_hash, script_code, transliterate,
};

use crate::costs::load_cost_table;
use crate::error::user_error;

fn text_arg(ctx: &Context<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match ctx.get_raw(idx) {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

fn lock_costs(costs: &Mutex<EditCostTable>) -> rusqlite::Result<MutexGuard<'_, EditCostTable>> {
    costs.lock().map_err(|e: PoisonError<_>| {
        user_error(SpellfixError::CostTable(format!("cost table lock poisoned: {e}")))
    })
}

fn editdist3(
    ctx: &Context<'_>,
    costs: &Mutex<EditCostTable>,
) -> rusqlite::Result<Option<i64>> {
    match ctx.len() {
        1 => {
            let Some(table) = text_arg(ctx, 0)? else {
                *lock_costs(costs)? = EditCostTable::new();
                return Ok(None);
            };
            // SAFETY: the connection is only used for the duration of this call.
            let conn = unsafe { ctx.get_connection()? };
            let loaded = load_cost_table(&conn, &table).map_err(|e| {
                user_error(SpellfixError::CostTable(format!("cannot load {table}: {e}")))
            })?;
            *lock_costs(costs)? = loaded;
            Ok(None)
        },
        2 | 3 => {
            let (Some(a), Some(b)) = (text_arg(ctx, 0)?, text_arg(ctx, 1)?) else {
                return Ok(None);
            };
            let lang_id = if ctx.len() == 3 { ctx.get::<Option<i64>>(2)?.unwrap_or(0) } else { 0 };
            let costs = lock_costs(costs)?;
            let distance = match a.strip_suffix('*') {
                Some(prefix) => costs.prefix_distance(prefix, &b, lang_id).0,
                None => costs.distance(&a, &b, lang_id),
            };
            Ok(Some(i64::from(distance)))
        },
        n => Err(user_error(SpellfixError::InvalidArgument(format!(
            "editdist3() takes 1 to 3 arguments, got {n}"
        )))),
    }
}

/// Register the helper functions on `db`.
///
/// Each call gets its own `editdist3` cost table, which starts with the
/// built-in defaults.
///
/// # Errors
///
/// Returns an error if `SQLite` rejects a function registration.
pub fn register_functions(db: &Connection) -> rusqlite::Result<()> {
    let deterministic = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    db.create_scalar_function("spellfix1_translit", 1, deterministic, |ctx| {
        Ok(text_arg(ctx, 0)?.map(|s| transliterate(&s)))
    })?;
    db.create_scalar_function("spellfix1_phonehash", 1, deterministic, |ctx| {
        Ok(text_arg(ctx, 0)?.map(|s| phonetic_hash(&s)))
    })?;
    db.create_scalar_function("spellfix1_scriptcode", 1, deterministic, |ctx| {
        Ok(text_arg(ctx, 0)?.map(|s| i64::from(script_code(&s))))
    })?;
    db.create_scalar_function("spellfix1_editdist", 2, deterministic, |ctx| {
        let (Some(a), Some(b)) = (text_arg(ctx, 0)?, text_arg(ctx, 1)?) else {
            return Ok(None);
        };
        let distance = edit_distance(&a, &b).map_err(user_error)?;
        Ok(Some(i64::from(distance)))
    })?;

    let costs = Arc::new(Mutex::new(EditCostTable::new()));
    db.create_scalar_function("editdist3", -1, FunctionFlags::SQLITE_UTF8, move |ctx| {
        editdist3(ctx, &costs)
    })?;
    Ok(())
}
