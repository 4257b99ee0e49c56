//! The `spellfix1` virtual table module.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::rc::Rc;

use rusqlite::types::{Null, ValueRef};
use rusqlite::vtab::{
    Context, CreateVTab, IndexConstraintOp, IndexInfo, UpdateVTab, VTab, VTabConnection,
    VTabCursor, VTabKind, Values,
};
use rusqlite::{Connection, ffi};
use spellfix_core::SpellfixError;

use crate::costs::CostConfig;
use crate::error::module_error;
use crate::search::{self, Candidate, MAX_TOP, SearchParams};
use crate::vocab::{VocabEntry, VocabTable};

const SCHEMA: &str = "CREATE TABLE x(word, rank, distance, langid, score, matchlen, \
    phonehash HIDDEN, top HIDDEN, scope HIDDEN, srchcnt HIDDEN, soundslike HIDDEN, \
    command HIDDEN)";

const COL_WORD: c_int = 0;
const COL_RANK: c_int = 1;
const COL_DISTANCE: c_int = 2;
const COL_LANGID: c_int = 3;
const COL_SCORE: c_int = 4;
const COL_MATCHLEN: c_int = 5;
const COL_PHONEHASH: c_int = 6;
const COL_TOP: c_int = 7;
const COL_SCOPE: c_int = 8;
const COL_SRCHCNT: c_int = 9;
const COL_SOUNDSLIKE: c_int = 10;
const COL_COMMAND: c_int = 11;
const COL_ROWID: c_int = -1;

// Bits of idx_num. Filter arguments arrive in this order.
const IDX_MATCH: c_int = 1;
const IDX_LANGID: c_int = 2;
const IDX_TOP: c_int = 4;
const IDX_SCOPE: c_int = 8;
const IDX_DIST_LT: c_int = 16;
const IDX_DIST_LE: c_int = 32;
const IDX_ROWID: c_int = 64;

const EDIT_COST_TABLE: &str = "edit_cost_table";

/// An instance of `CREATE VIRTUAL TABLE ... USING spellfix1`.
#[repr(C)]
pub struct SpellfixTable {
    base: ffi::sqlite3_vtab,
    db: Rc<Connection>,
    vocab: VocabTable,
    name: String,
    costs: Rc<RefCell<CostConfig>>,
}

fn utf8(arg: &[u8]) -> rusqlite::Result<&str> {
    std::str::from_utf8(arg).map_err(rusqlite::Error::Utf8Error)
}

fn dequote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['\'', '"', '`'] {
        if let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote)) {
            return inner;
        }
    }
    value
}

/// Parse the `CREATE VIRTUAL TABLE` arguments after the table name.
fn parse_args(args: &[&[u8]]) -> rusqlite::Result<Option<String>> {
    let mut cost_table = None;
    for arg in args {
        let arg = utf8(arg)?.trim();
        match arg.split_once('=') {
            Some((key, value)) if key.trim() == EDIT_COST_TABLE => {
                cost_table = Some(dequote(value).to_owned());
            },
            _ => {
                return Err(module_error(SpellfixError::InvalidArgument(format!(
                    "bad argument to spellfix1(): {arg}"
                ))));
            },
        }
    }
    Ok(cost_table)
}

/// Text form of a value the way SQLite would cast it, NULL stays `None`.
fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Distance bound narrowed to the range edit distances are computed in.
fn clamp_distance(limit: i64) -> i32 {
    i32::try_from(limit).unwrap_or(if limit < 0 { i32::MIN } else { i32::MAX })
}

fn int_value(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) => Some(i),
        #[allow(clippy::cast_possible_truncation)]
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => std::str::from_utf8(t).ok()?.trim().parse().ok(),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// Argument `idx` of an xFilter or xUpdate call, NULL when absent.
fn arg<'a>(args: &'a Values<'_>, idx: usize) -> ValueRef<'a> {
    args.iter().nth(idx).unwrap_or(ValueRef::Null)
}

/// Value of virtual table column `col` in an xUpdate argument list.
fn column_arg<'a>(args: &'a Values<'_>, col: c_int) -> ValueRef<'a> {
    arg(args, 2 + col as usize)
}

/// Rowid handed to xUpdate; anything but an integer is refused.
fn integer_rowid(value: ValueRef<'_>) -> rusqlite::Result<i64> {
    match value {
        ValueRef::Integer(rowid) => Ok(rowid),
        other => Err(module_error(SpellfixError::InvalidArgument(format!(
            "spellfix1 rowid must be an integer, got {}",
            other.data_type()
        )))),
    }
}

impl SpellfixTable {
    fn open_table(db: &mut VTabConnection, args: &[&[u8]]) -> rusqlite::Result<Self> {
        if args.len() < 3 {
            return Err(module_error(SpellfixError::InvalidArgument(
                "spellfix1 needs a schema and table name".to_owned(),
            )));
        }
        let schema = utf8(args[1])?;
        let name = utf8(args[2])?;
        let cost_table = parse_args(&args[3..])?;

        // SAFETY: the handle outlives every virtual table opened on it.
        let conn = unsafe { Connection::from_handle(db.handle())? };
        Ok(Self {
            base: ffi::sqlite3_vtab::default(),
            db: Rc::new(conn),
            vocab: VocabTable::new(schema, name),
            name: name.to_owned(),
            costs: Rc::new(RefCell::new(CostConfig::new(cost_table))),
        })
    }

    fn entry_from_args(&self, args: &Values<'_>) -> rusqlite::Result<VocabEntry> {
        let Some(word) = text_value(column_arg(args, COL_WORD)) else {
            return Err(module_error(SpellfixError::NotNull {
                table: self.name.clone(),
                column: "word",
            }));
        };
        let soundslike = text_value(column_arg(args, COL_SOUNDSLIKE));
        let rank = int_value(column_arg(args, COL_RANK)).unwrap_or(1);
        let lang_id = int_value(column_arg(args, COL_LANGID)).unwrap_or(0);
        Ok(VocabEntry::new(word, soundslike.as_deref(), rank, lang_id))
    }

    fn run_command(&self, command: &str) -> rusqlite::Result<()> {
        let command = command.trim();
        if command == "reset" {
            self.costs.borrow_mut().reset();
            tracing::debug!(table = %self.name, "spellfix1 reset");
            return Ok(());
        }
        if let Some(value) = command.strip_prefix(EDIT_COST_TABLE).and_then(|v| v.strip_prefix('=')) {
            let value = dequote(value);
            let table = (!value.is_empty() && !value.eq_ignore_ascii_case("null"))
                .then(|| value.to_owned());
            self.costs.borrow_mut().set_table(&self.db, table)?;
            tracing::debug!(table = %self.name, cost_table = value, "spellfix1 cost table changed");
            return Ok(());
        }
        Err(module_error(SpellfixError::UnknownCommand {
            table: self.name.clone(),
            command: command.to_owned(),
        }))
    }
}

unsafe impl<'vtab> VTab<'vtab> for SpellfixTable {
    type Aux = ();
    type Cursor = SpellfixCursor<'vtab>;

    fn connect(
        db: &mut VTabConnection,
        _aux: Option<&()>,
        args: &[&[u8]],
    ) -> rusqlite::Result<(String, Self)> {
        Ok((SCHEMA.to_owned(), Self::open_table(db, args)?))
    }

    fn best_index(&self, info: &mut IndexInfo) -> rusqlite::Result<()> {
        let mut slots: [Option<usize>; 6] = [None; 6];
        let mut plan = 0;
        for (i, constraint) in info.constraints().enumerate() {
            if !constraint.is_usable() {
                continue;
            }
            let (slot, bit) = match (constraint.column(), constraint.operator()) {
                (COL_WORD, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_MATCH) => (0, IDX_MATCH),
                (COL_LANGID, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_EQ) => (1, IDX_LANGID),
                (COL_TOP, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_EQ) => (2, IDX_TOP),
                (COL_SCOPE, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_EQ) => (3, IDX_SCOPE),
                (COL_DISTANCE, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_LT) => (4, IDX_DIST_LT),
                (COL_DISTANCE, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_LE) => (4, IDX_DIST_LE),
                (COL_ROWID, IndexConstraintOp::SQLITE_INDEX_CONSTRAINT_EQ) => (5, IDX_ROWID),
                _ => continue,
            };
            if slots[slot].is_none() {
                slots[slot] = Some(i);
                plan |= bit;
            }
        }

        if plan & IDX_MATCH != 0 {
            plan &= !IDX_ROWID;
            let mut argv = 0;
            for constraint in slots[..5].iter().flatten() {
                argv += 1;
                let mut usage = info.constraint_usage(*constraint);
                usage.set_argv_index(argv);
                usage.set_omit(true);
            }
            let score_order = info.num_of_order_by() == 1
                && info
                    .order_bys()
                    .all(|o| o.column() == COL_SCORE && !o.is_order_by_desc());
            if score_order {
                info.set_order_by_consumed(true);
            }
            info.set_estimated_cost(1e5);
            info.set_estimated_rows(search::DEFAULT_TOP as i64);
        } else if let Some(constraint) = slots[5] {
            plan = IDX_ROWID;
            let mut usage = info.constraint_usage(constraint);
            usage.set_argv_index(1);
            usage.set_omit(true);
            info.set_estimated_cost(5.0);
            info.set_estimated_rows(1);
        } else {
            plan = 0;
            info.set_estimated_cost(1e50);
        }
        info.set_idx_num(plan);
        Ok(())
    }

    fn open(&'vtab mut self) -> rusqlite::Result<SpellfixCursor<'vtab>> {
        Ok(SpellfixCursor {
            base: ffi::sqlite3_vtab_cursor::default(),
            db: Rc::clone(&self.db),
            vocab: self.vocab.clone(),
            costs: Rc::clone(&self.costs),
            rows: Vec::new(),
            pos: 0,
            search: None,
            phantom: PhantomData,
        })
    }
}

impl CreateVTab<'_> for SpellfixTable {
    const KIND: VTabKind = VTabKind::Default;

    fn create(
        db: &mut VTabConnection,
        _aux: Option<&()>,
        args: &[&[u8]],
    ) -> rusqlite::Result<(String, Self)> {
        let table = Self::open_table(db, args)?;
        table.vocab.create(&table.db)?;
        tracing::info!(table = %table.name, "created spellfix1 table");
        Ok((SCHEMA.to_owned(), table))
    }

    fn destroy(&self) -> rusqlite::Result<()> {
        self.vocab.drop_table(&self.db)?;
        tracing::info!(table = %self.name, "dropped spellfix1 table");
        Ok(())
    }
}

impl UpdateVTab<'_> for SpellfixTable {
    fn delete(&mut self, rowid: ValueRef<'_>) -> rusqlite::Result<()> {
        self.vocab.delete(&self.db, integer_rowid(rowid)?)
    }

    fn insert(&mut self, args: &Values<'_>) -> rusqlite::Result<i64> {
        if matches!(column_arg(args, COL_WORD), ValueRef::Null) {
            if let Some(command) = text_value(column_arg(args, COL_COMMAND)) {
                self.run_command(&command)?;
                return Ok(0);
            }
        }
        let entry = self.entry_from_args(args)?;
        let rowid = int_value(arg(args, 1));
        self.vocab.insert(&self.db, rowid, &entry)
    }

    fn update(&mut self, args: &Values<'_>) -> rusqlite::Result<()> {
        let old_rowid = integer_rowid(arg(args, 0))?;
        let new_rowid = integer_rowid(arg(args, 1))?;
        let entry = self.entry_from_args(args)?;
        self.vocab.update(&self.db, old_rowid, new_rowid, &entry)
    }
}

/// Effective parameters of the last MATCH query, reported through the
/// hidden columns.
#[derive(Debug, Clone, Copy)]
struct SearchInfo {
    top: usize,
    scope: usize,
    examined: i64,
}

/// Cursor over materialised results.
#[repr(C)]
pub struct SpellfixCursor<'vtab> {
    base: ffi::sqlite3_vtab_cursor,
    db: Rc<Connection>,
    vocab: VocabTable,
    costs: Rc<RefCell<CostConfig>>,
    rows: Vec<Candidate>,
    pos: usize,
    search: Option<SearchInfo>,
    phantom: PhantomData<&'vtab SpellfixTable>,
}

impl SpellfixCursor<'_> {
    fn match_query(&mut self, plan: c_int, args: &Values<'_>) -> rusqlite::Result<()> {
        let mut next = 0;
        let mut take = |bit: c_int| {
            (plan & bit != 0).then(|| {
                let value = arg(args, next);
                next += 1;
                value
            })
        };

        let Some(pattern) = take(IDX_MATCH).and_then(text_value) else {
            return Ok(());
        };
        let mut params = SearchParams::new(pattern);
        if let Some(lang_id) = take(IDX_LANGID).and_then(int_value) {
            params.lang_id = lang_id;
        }
        if let Some(top) = take(IDX_TOP).and_then(int_value) {
            params.top = usize::try_from(top.clamp(1, MAX_TOP as i64)).unwrap_or(MAX_TOP);
        }
        if let Some(scope) = take(IDX_SCOPE).and_then(int_value) {
            params.scope = usize::try_from(scope.max(1)).unwrap_or(1);
        }
        if let Some(limit) = take(IDX_DIST_LT).and_then(int_value) {
            params.max_distance = Some(clamp_distance(limit.saturating_sub(1)));
        } else if let Some(limit) = take(IDX_DIST_LE).and_then(int_value) {
            params.max_distance = Some(clamp_distance(limit));
        }
        if params.max_distance.is_some_and(|max| max < 0) {
            return Ok(());
        }

        let costs = self.costs.borrow_mut().costs(&self.db)?;
        let results = search::search(&self.db, &self.vocab, &costs, &params)?;
        self.search = Some(SearchInfo {
            top: params.top,
            scope: results.scope,
            examined: results.examined,
        });
        self.rows = results.candidates;
        Ok(())
    }
}

unsafe impl VTabCursor for SpellfixCursor<'_> {
    fn filter(
        &mut self,
        idx_num: c_int,
        _idx_str: Option<&str>,
        args: &Values<'_>,
    ) -> rusqlite::Result<()> {
        self.rows.clear();
        self.pos = 0;
        self.search = None;

        if idx_num & IDX_MATCH != 0 {
            self.match_query(idx_num, args)
        } else if idx_num & IDX_ROWID != 0 {
            if let Some(rowid) = int_value(arg(args, 0)) {
                self.rows = self.vocab.scan(&self.db, Some(rowid))?;
            }
            Ok(())
        } else {
            self.rows = self.vocab.scan(&self.db, None)?;
            Ok(())
        }
    }

    fn next(&mut self) -> rusqlite::Result<()> {
        self.pos += 1;
        Ok(())
    }

    fn eof(&self) -> bool {
        self.pos >= self.rows.len()
    }

    fn column(&self, ctx: &mut Context, col: c_int) -> rusqlite::Result<()> {
        let Some(row) = self.rows.get(self.pos) else {
            return ctx.set_result(&Null);
        };
        match col {
            COL_WORD => ctx.set_result(&row.word),
            COL_RANK => ctx.set_result(&row.rank),
            COL_DISTANCE => ctx.set_result(&row.distance),
            COL_LANGID => ctx.set_result(&row.lang_id),
            COL_SCORE => ctx.set_result(&row.score),
            COL_MATCHLEN => ctx.set_result(&(row.matchlen as i64)),
            COL_PHONEHASH => ctx.set_result(&row.k2),
            COL_TOP => ctx.set_result(&self.search.map(|s| s.top as i64)),
            COL_SCOPE => ctx.set_result(&self.search.map(|s| s.scope as i64)),
            COL_SRCHCNT => ctx.set_result(&self.search.map(|s| s.examined)),
            // soundslike and command are write-only
            _ => ctx.set_result(&Null),
        }
    }

    fn rowid(&self) -> rusqlite::Result<i64> {
        Ok(self.rows.get(self.pos).map_or(0, |row| row.rowid))
    }
}
