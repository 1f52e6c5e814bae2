mod category;
mod schema;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{params, Connection};

use crate::ledger::{EntryKind, NewEntry};
use crate::money::Amount;

/// The household ledger, backed by a single SQLite connection
pub(crate) struct Database {
    conn: Connection,
}

/// A stored entry as read back from its table
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredEntry {
    pub(crate) id: i64,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) description: Option<String>,
}

impl Database {
    /// Open the database file, creating it and its tables when missing
    pub(crate) fn open(path: &Path) -> Result<Database> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Unable to create directory {}", parent.display()))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Unable to open database {}", path.display()))?;
        info!("Database {}", path.display());
        Database::init(conn)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Database> {
        Database::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Database> {
        conn.execute_batch(schema::SCHEMA).context("Unable to create tables")?;
        Ok(Database { conn })
    }

    /// Insert a completed entry and return its id
    pub(crate) fn insert_entry(&self, entry: &NewEntry) -> Result<i64> {
        let inserted = if entry.kind.has_description() {
            self.conn.execute(
                "INSERT INTO expenses (amount, category, description) VALUES (?1, ?2, ?3)",
                params![entry.amount, entry.category, entry.description],
            )
        } else {
            let sql = format!("INSERT INTO {} (amount, category) VALUES (?1, ?2)", entry.kind.table());
            self.conn.execute(&sql, params![entry.amount, entry.category])
        };
        inserted.with_context(|| format!("Unable to save {} entry", entry.kind))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Sum of amounts per category for one kind of entry
    pub(crate) fn sum_by_category(&self, kind: EntryKind) -> Result<BTreeMap<String, Amount>> {
        let sql = format!("SELECT category, SUM(amount) FROM {} GROUP BY category", kind.table());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, Amount>(1)?)))?;

        let mut sums = BTreeMap::new();
        for row in rows {
            let (category, amount) = row?;
            sums.insert(category, amount);
        }
        Ok(sums)
    }

    /// Distinct non-blank descriptions previously used for expenses in a category
    pub(crate) fn expense_descriptions(&self, category: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT description FROM expenses WHERE category = ?1 AND description <> '' ORDER BY description",
        )?;
        let rows = stmt.query_map(params![category], |row| row.get::<_, String>(0))?;

        let mut descriptions = vec![];
        for description in rows {
            descriptions.push(description?);
        }
        Ok(descriptions)
    }

    /// All entries of one kind, in insertion order
    #[cfg(test)]
    pub(crate) fn entries(&self, kind: EntryKind) -> Result<Vec<StoredEntry>> {
        let description = if kind.has_description() { "description" } else { "NULL" };
        let sql = format!("SELECT id, amount, category, {} FROM {} ORDER BY id", description, kind.table());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredEntry {
                id: row.get(0)?,
                amount: row.get(1)?,
                category: row.get(2)?,
                description: row.get(3)?,
            })
        })?;

        let mut entries = vec![];
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::ledger::{EntryKind, NewEntry};
    use crate::money::Amount;

    fn record(db: &Database, kind: EntryKind, amount: Amount, category: &str, description: &str) {
        db.ensure_category(category).unwrap();
        db.insert_entry(&NewEntry::new(kind, amount, category, description)).unwrap();
    }

    #[test]
    fn test_insert_and_sum() {
        let db = Database::open_in_memory().unwrap();
        record(&db, EntryKind::Expense, Amount::from_units(200), "Groceries", "weekly");
        record(&db, EntryKind::Expense, Amount::from_cents(1050), "Groceries", "");
        record(&db, EntryKind::Expense, Amount::from_units(40), "Transport", "bus");
        record(&db, EntryKind::PlannedExpense, Amount::from_units(300), "Groceries", "ignored");

        let sums = db.sum_by_category(EntryKind::Expense).unwrap();
        assert_eq!(sums.len(), 2);
        assert_eq!(sums["Groceries"], Amount::from_cents(21_050));
        assert_eq!(sums["Transport"], Amount::from_units(40));

        let planned = db.entries(EntryKind::PlannedExpense).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].description, None);

        assert!(db.sum_by_category(EntryKind::Income).unwrap().is_empty());
    }

    #[test]
    fn test_unregistered_category_is_refused() {
        let db = Database::open_in_memory().unwrap();
        for kind in [EntryKind::Income, EntryKind::Expense, EntryKind::PlannedIncome, EntryKind::PlannedExpense] {
            let entry = NewEntry::new(kind, Amount::from_units(10), "Nowhere", "");
            assert!(db.insert_entry(&entry).is_err());
            assert!(db.entries(kind).unwrap().is_empty());
        }

        db.ensure_category("Nowhere").unwrap();
        db.insert_entry(&NewEntry::new(EntryKind::Income, Amount::from_units(10), "Nowhere", "")).unwrap();
        assert_eq!(db.entries(EntryKind::Income).unwrap().len(), 1);
    }

    #[test]
    fn test_expense_descriptions() {
        let db = Database::open_in_memory().unwrap();
        for description in ["weekly", "market", "weekly", ""] {
            record(&db, EntryKind::Expense, Amount::from_units(1), "Groceries", description);
        }
        record(&db, EntryKind::Expense, Amount::from_units(1), "Transport", "bus");

        assert_eq!(db.expense_descriptions("Groceries").unwrap(), vec!["market", "weekly"]);
        assert!(db.expense_descriptions("Rent").unwrap().is_empty());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("budget.db");
        {
            let db = Database::open(&path).unwrap();
            record(&db, EntryKind::Income, Amount::from_units(1000), "Salary", "");
        }

        let db = Database::open(&path).unwrap();
        let income = db.entries(EntryKind::Income).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].amount, Amount::from_units(1000));
        assert_eq!(db.categories().unwrap(), vec!["Salary"]);
        assert!(db.insert_entry(&NewEntry::new(EntryKind::Income, Amount::from_units(1), "Bonus", "")).is_err());
    }
}
