//! Loading `editdist3` cost tables from the database.

use std::rc::Rc;

use rusqlite::Connection;
use spellfix_core::EditCostTable;

use crate::error::quote_identifier;

/// Read an `(iLang, cFrom, cTo, iCost)` table into an [`EditCostTable`].
pub(crate) fn load_cost_table(db: &Connection, table: &str) -> rusqlite::Result<EditCostTable> {
    let sql = format!(
        "SELECT iLang, cFrom, cTo, iCost FROM {} ORDER BY iLang",
        quote_identifier(table)
    );
    let mut stmt = db.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut costs = EditCostTable::new();
    let mut loaded = 0_usize;
    while let Some(row) = rows.next()? {
        let lang: Option<i64> = row.get(0)?;
        let from: Option<String> = row.get(1)?;
        let to: Option<String> = row.get(2)?;
        let cost: Option<i64> = row.get(3)?;
        if costs.add_row(
            lang.unwrap_or(0),
            from.as_deref().unwrap_or(""),
            to.as_deref().unwrap_or(""),
            cost.unwrap_or(-1),
        ) {
            loaded += 1;
        }
    }
    tracing::debug!(table, rows = loaded, "loaded edit cost table");
    Ok(costs)
}

/// Cost table configuration of one `spellfix1` table.
///
/// The table is read lazily and cached until the next `reset` command.
#[derive(Debug, Default)]
pub(crate) struct CostConfig {
    table: Option<String>,
    cached: Option<Rc<EditCostTable>>,
}

impl CostConfig {
    pub fn new(table: Option<String>) -> Self {
        Self { table, cached: None }
    }

    pub fn costs(&mut self, db: &Connection) -> rusqlite::Result<Rc<EditCostTable>> {
        if let Some(costs) = &self.cached {
            return Ok(Rc::clone(costs));
        }
        let costs = match &self.table {
            Some(name) => load_cost_table(db, name)?,
            None => EditCostTable::new(),
        };
        let costs = Rc::new(costs);
        self.cached = Some(Rc::clone(&costs));
        Ok(costs)
    }

    /// Switch to another cost table, or back to the defaults with `None`.
    ///
    /// The new table is loaded immediately so a bad name fails the command
    /// that set it.
    pub fn set_table(&mut self, db: &Connection, table: Option<String>) -> rusqlite::Result<()> {
        let costs = match &table {
            Some(name) => load_cost_table(db, name)?,
            None => EditCostTable::new(),
        };
        self.table = table;
        self.cached = Some(Rc::new(costs));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_costs() -> Connection {
        let db = Connection::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE costs (iLang INT, cFrom TEXT, cTo TEXT, iCost INT);
             INSERT INTO costs VALUES (0, 'c', 'k', 5);
             INSERT INTO costs VALUES (0, '?', '?', 80);
             INSERT INTO costs VALUES (0, 'x', 'y', -3);",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_load_cost_table() {
        let db = db_with_costs();
        let costs = load_cost_table(&db, "costs").unwrap();
        assert_eq!(costs.language(0).sub_cost, 80);
        assert_eq!(costs.language(0).rule_count(), 1);
        assert_eq!(costs.distance("cat", "kat", 0), 5);
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let db = Connection::open_in_memory().unwrap();
        assert!(load_cost_table(&db, "nope").is_err());
    }

    #[test]
    fn test_config_caches_until_reset() {
        let db = db_with_costs();
        let mut config = CostConfig::new(Some("costs".to_owned()));
        assert_eq!(config.costs(&db).unwrap().distance("cat", "kat", 0), 5);

        db.execute("UPDATE costs SET iCost = 7 WHERE cFrom = 'c'", []).unwrap();
        assert_eq!(config.costs(&db).unwrap().distance("cat", "kat", 0), 5);

        config.reset();
        assert_eq!(config.costs(&db).unwrap().distance("cat", "kat", 0), 7);

        config.set_table(&db, None).unwrap();
        assert_eq!(config.costs(&db).unwrap().distance("cat", "kat", 0), 150);
        assert!(config.set_table(&db, Some("nope".to_owned())).is_err());
    }
}
