//! Expense operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, CategoryTotal, ExpenseFilter, ExpenseRecord, NewExpense};

/// Hard cap on list queries
const MAX_LIST_LIMIT: i64 = 1000;

/// Default page size when no limit is given
const DEFAULT_LIST_LIMIT: i64 = 100;

impl Database {
    /// Insert a new expense, returning its id
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (description, date, amount, category, image_path, content_hash)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                expense.description,
                expense.date,
                expense.amount,
                expense.category.as_str(),
                expense.image_path,
                expense.content_hash,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, date, amount, category, image_path, content_hash, created_at
             FROM expenses WHERE id = ?",
        )?;

        let expense = stmt
            .query_row(params![id], |row| Self::row_to_expense(row))
            .optional()?;

        Ok(expense)
    }

    /// Get expense by content hash (for deduplication)
    pub fn get_expense_by_hash(&self, content_hash: &str) -> Result<Option<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, date, amount, category, image_path, content_hash, created_at
             FROM expenses WHERE content_hash = ?",
        )?;

        let expense = stmt
            .query_row(params![content_hash], |row| Self::row_to_expense(row))
            .optional()?;

        Ok(expense)
    }

    /// List expenses, newest first
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;

        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);

        let expenses = match filter.category {
            Some(category) => {
                let mut stmt = conn.prepare(
                    "SELECT id, description, date, amount, category, image_path, content_hash, created_at
                     FROM expenses WHERE category = ?
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                )?;
                let rows = stmt
                    .query_map(params![category.as_str(), limit, offset], |row| {
                        Self::row_to_expense(row)
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, description, date, amount, category, image_path, content_hash, created_at
                     FROM expenses
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
                )?;
                let rows = stmt
                    .query_map(params![limit, offset], |row| Self::row_to_expense(row))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(expenses)
    }

    /// Total number of expenses
    pub fn count_expenses(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Spending totals grouped by category, largest first
    pub fn category_totals(&self) -> Result<Vec<CategoryTotal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount), COUNT(*)
             FROM expenses GROUP BY category ORDER BY SUM(amount) DESC",
        )?;

        let totals = stmt
            .query_map([], |row| {
                let category_str: String = row.get(0)?;
                Ok(CategoryTotal {
                    category: category_str.parse().unwrap_or_default(),
                    total_amount: row.get(1)?,
                    expense_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Helper to convert a row to ExpenseRecord
    fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<ExpenseRecord> {
        let category_str: String = row.get(4)?;
        let created_at_str: String = row.get(7)?;

        Ok(ExpenseRecord {
            id: row.get(0)?,
            description: row.get(1)?,
            date: row.get(2)?,
            amount: row.get(3)?,
            category: category_str.parse().unwrap_or_default(),
            image_path: row.get(5)?,
            content_hash: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
