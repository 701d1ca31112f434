//! Investment holdings

use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{AssetClass, Investment, InvestmentUpdate, NewInvestment};

const INVESTMENT_COLUMNS: &str =
    "id, symbol, name, asset_class, quantity, purchase_price, purchase_date, account, notes";

fn row_to_investment(row: &rusqlite::Row) -> rusqlite::Result<Investment> {
    let asset_class: String = row.get(3)?;
    let purchase_date: String = row.get(6)?;
    Ok(Investment {
        id: row.get(0)?,
        symbol: row.get(1)?,
        name: row.get(2)?,
        asset_class: asset_class.parse().unwrap_or(AssetClass::Stock),
        quantity: row.get(4)?,
        purchase_price: row.get(5)?,
        purchase_date: parse_datetime(&purchase_date),
        account: row.get(7)?,
        notes: row.get(8)?,
    })
}

impl Database {
    pub fn create_investment(&self, investment: &NewInvestment) -> Result<Investment> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO investments (symbol, name, asset_class, quantity, purchase_price, purchase_date, account, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                investment.symbol,
                investment.name,
                investment.asset_class.as_str(),
                investment.quantity,
                investment.purchase_price,
                format_datetime(&investment.purchase_date),
                investment.account,
                investment.notes,
            ],
        )?;

        Ok(Investment {
            id: conn.last_insert_rowid(),
            symbol: investment.symbol.clone(),
            name: investment.name.clone(),
            asset_class: investment.asset_class,
            quantity: investment.quantity,
            purchase_price: investment.purchase_price,
            purchase_date: investment.purchase_date,
            account: investment.account.clone(),
            notes: investment.notes.clone(),
        })
    }

    pub fn list_investments(
        &self,
        asset_class: Option<AssetClass>,
        account: Option<&str>,
    ) -> Result<Vec<Investment>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("asset_class = ?", asset_class.map(|c| c.as_str()))
            .push("account = ?", account.map(str::to_string));

        let sql = format!(
            "SELECT {} FROM investments {} ORDER BY symbol, id",
            INVESTMENT_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let investments = stmt
            .query_map(builder.params().as_slice(), row_to_investment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(investments)
    }

    pub fn get_investment(&self, id: i64) -> Result<Option<Investment>> {
        let conn = self.conn()?;
        let investment = conn
            .query_row(
                &format!("SELECT {} FROM investments WHERE id = ?", INVESTMENT_COLUMNS),
                params![id],
                row_to_investment,
            )
            .optional()?;
        Ok(investment)
    }

    /// Apply a partial update; returns None when the holding does not exist
    pub fn update_investment(
        &self,
        id: i64,
        update: &InvestmentUpdate,
    ) -> Result<Option<Investment>> {
        let Some(mut inv) = self.get_investment(id)? else {
            return Ok(None);
        };

        if let Some(symbol) = &update.symbol {
            inv.symbol = symbol.clone();
        }
        if let Some(name) = &update.name {
            inv.name = name.clone();
        }
        if let Some(asset_class) = update.asset_class {
            inv.asset_class = asset_class;
        }
        if let Some(quantity) = update.quantity {
            inv.quantity = quantity;
        }
        if let Some(price) = update.purchase_price {
            inv.purchase_price = price;
        }
        if let Some(date) = update.purchase_date {
            inv.purchase_date = date;
        }
        if update.account.is_some() {
            inv.account = update.account.clone();
        }
        if update.notes.is_some() {
            inv.notes = update.notes.clone();
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE investments SET
                symbol = ?, name = ?, asset_class = ?, quantity = ?, purchase_price = ?,
                purchase_date = ?, account = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                inv.symbol,
                inv.name,
                inv.asset_class.as_str(),
                inv.quantity,
                inv.purchase_price,
                format_datetime(&inv.purchase_date),
                inv.account,
                inv.notes,
                inv.id,
            ],
        )?;

        Ok(Some(inv))
    }

    pub fn delete_investment(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM investments WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}
