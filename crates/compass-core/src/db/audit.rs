//! Audit log of API access

use rusqlite::params;
use serde::Serialize;

use super::filter::WhereBuilder;
use super::Database;
use crate::error::Result;

/// Audit log entry
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub user_email: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

/// Filters for reading the audit log
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
}

impl Database {
    /// Record an API access
    pub fn log_audit(
        &self,
        user_email: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO audit_log (user_email, action, entity_type, entity_id, details)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![user_email, action, entity_type, entity_id, details],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Most recent audit entries first
    pub fn list_audit_log(&self, filter: &AuditFilter, limit: i64) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("action = ?", filter.action.clone())
            .push("entity_type = ?", filter.entity_type.clone())
            .push("entity_id = ?", filter.entity_id)
            .bind(limit);

        let sql = format!(
            "SELECT id, timestamp, user_email, action, entity_type, entity_id, details \
             FROM audit_log {} ORDER BY timestamp DESC, id DESC LIMIT ?",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(builder.params().as_slice(), |row| {
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    user_email: row.get(2)?,
                    action: row.get(3)?,
                    entity_type: row.get(4)?,
                    entity_id: row.get(5)?,
                    details: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
