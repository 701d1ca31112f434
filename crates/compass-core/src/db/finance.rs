//! Transaction and budget operations

use chrono::{Duration, NaiveDateTime};
use rusqlite::params;

use super::filter::WhereBuilder;
use super::{format_datetime, now, parse_datetime, Database};
use crate::analytics::budget::EXPENSE_WINDOW_DAYS;
use crate::analytics::ExpenseItem;
use crate::error::Result;
use crate::models::{Budget, NewBudget, NewTransaction, Transaction};

/// Filters for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub skip: i64,
    /// Defaults to 100 when zero
    pub limit: i64,
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    Ok(Transaction {
        id: row.get(0)?,
        date: parse_datetime(&date_str),
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
    })
}

impl Database {
    /// Record a transaction, dated now unless the input carries a date
    pub fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        let conn = self.conn()?;
        let date = tx.date.unwrap_or_else(now);

        conn.execute(
            "INSERT INTO transactions (date, amount, category, description) VALUES (?, ?, ?, ?)",
            params![format_datetime(&date), tx.amount, tx.category, tx.description],
        )?;

        Ok(Transaction {
            id: conn.last_insert_rowid(),
            date,
            amount: tx.amount,
            category: tx.category.clone(),
            description: tx.description.clone(),
        })
    }

    /// List transactions, newest first
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("date >= ?", filter.start.as_ref().map(format_datetime))
            .push("date <= ?", filter.end.as_ref().map(format_datetime))
            .push("category = ?", filter.category.clone());

        let limit = if filter.limit > 0 { filter.limit } else { 100 };
        builder.bind(limit).bind(filter.skip.max(0));

        let sql = format!(
            "SELECT id, date, amount, category, description FROM transactions {} \
             ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(builder.params().as_slice(), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Spending over the `EXPENSE_WINDOW_DAYS` before `end` as positive
    /// expense lines; income is left out
    pub fn recent_expenses(&self, end: NaiveDateTime) -> Result<Vec<ExpenseItem>> {
        let start = end - Duration::days(EXPENSE_WINDOW_DAYS);
        Ok(self
            .transactions_between(start, end)?
            .into_iter()
            .filter(|tx| tx.amount < 0.0)
            .map(|tx| ExpenseItem {
                category: tx.category,
                amount: -tx.amount,
            })
            .collect())
    }

    /// All transactions dated within `[start, end]`, oldest first
    pub fn transactions_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, amount, category, description FROM transactions \
             WHERE date >= ? AND date <= ? ORDER BY date",
        )?;

        let transactions = stmt
            .query_map(
                params![format_datetime(&start), format_datetime(&end)],
                row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    pub fn create_budget(&self, budget: &NewBudget) -> Result<Budget> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (category, amount, period) VALUES (?, ?, ?)",
            params![budget.category, budget.amount, budget.period],
        )?;

        Ok(Budget {
            id: conn.last_insert_rowid(),
            category: budget.category.clone(),
            amount: budget.amount,
            period: budget.period.clone(),
        })
    }

    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, category, amount, period FROM budgets ORDER BY category")?;

        let budgets = stmt
            .query_map([], |row| {
                Ok(Budget {
                    id: row.get(0)?,
                    category: row.get(1)?,
                    amount: row.get(2)?,
                    period: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }
}
