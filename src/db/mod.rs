mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    /// Validates the raw form, then inserts in one statement. A validation
    /// failure leaves the table and both indexes untouched. The row and its
    /// index entries commit together, so a reader never sees one without
    /// the other.
    pub(crate) fn add_expense(&self, form: &ExpenseForm) -> Result<Expense> {
        let new = form.validate()?;
        let month_key = MonthKey::from_date(new.date);
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO expenses (amount, description, category, date, month_key, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.amount.to_string(),
                new.description,
                new.category.as_str(),
                new.date.format("%Y-%m-%d").to_string(),
                month_key.to_string(),
                created_at,
            ],
        )?;

        // AUTOINCREMENT: ids keep increasing and are never reused, even
        // after a delete.
        Ok(Expense {
            id: Some(self.conn.last_insert_rowid()),
            amount: new.amount,
            description: new.description,
            category: new.category,
            date: new.date,
            month_key,
            created_at,
        })
    }

    pub(crate) fn expenses_for_month(&self, key: MonthKey) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, description, category, date, month_key, created_at
             FROM expenses WHERE month_key = ?1
             ORDER BY date DESC, id ASC",
        )?;
        let rows = stmt.query_map(params![key.to_string()], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn expenses_for_category(&self, category: Category) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, description, category, date, month_key, created_at
             FROM expenses WHERE category = ?1
             ORDER BY date DESC, id ASC",
        )?;
        let rows = stmt.query_map(params![category.as_str()], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Returns whether a row was actually removed. Deleting an id that does
    /// not exist is a no-op, not an error.
    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    pub(crate) fn expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }
}

fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(1)?;
    let category_str: String = row.get(3)?;
    let date_str: String = row.get(4)?;
    let key_str: String = row.get(5)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        description: row.get(2)?,
        category: Category::parse(&category_str).unwrap_or(Category::Other),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
        // The stored key is authoritative; it is never rederived from date.
        month_key: MonthKey::parse(&key_str).unwrap_or(MonthKey::new(1970, 0)),
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests;
