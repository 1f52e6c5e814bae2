use anyhow::{Context, Result};
use log::debug;
use rusqlite::params;

use crate::db::Database;

impl Database {
    /// Make sure a category exists before an entry refers to it. Names are matched exactly,
    /// the unique index makes the check and the insert a single statement.
    pub(crate) fn ensure_category(&self, name: &str) -> Result<()> {
        let inserted = self.conn
            .execute("INSERT OR IGNORE INTO categories (name) VALUES (?1)", params![name])
            .with_context(|| format!("Unable to register category '{name}'"))?;
        if inserted > 0 {
            debug!("New category '{}'", name);
        }
        Ok(())
    }

    /// All registered category names, sorted
    pub(crate) fn categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = vec![];
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }
}
