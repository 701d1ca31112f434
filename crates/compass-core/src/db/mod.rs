//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `finance` - Transactions and budgets
//! - `health` - Sleep, exercise, and health preferences
//! - `tasks` - Task CRUD and completion tracking
//! - `portfolio` - Investment holdings
//! - `memory` - Reminders, contacts, and gift ideas
//! - `email` - Emails, drafts, templates, and phone calls
//! - `life_balance` - Life areas, goals, rewards, me-time, activity log
//! - `learning` - Study sessions
//! - `audit` - API access audit log

use chrono::{NaiveDateTime, Timelike, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::{Error, Result};

mod audit;
mod email;
mod filter;
mod finance;
mod health;
mod learning;
mod life_balance;
mod memory;
mod portfolio;
mod tasks;

pub use audit::{AuditEntry, AuditFilter};
pub use email::EmailFilter;
pub use finance::TransactionFilter;
pub use life_balance::GoalFilter;
pub use memory::{GiftIdeaFilter, ReminderFilter};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "COMPASS_DB_KEY";

/// Storage format for every timestamp column
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this invalidates every existing encrypted database
    const APP_SALT: &[u8; 16] = b"compass-salt-v01";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Parse a stored datetime string ("YYYY-MM-DD HH:MM:SS")
pub(crate) fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .unwrap_or_else(|_| now())
}

pub(crate) fn parse_opt_datetime(s: Option<String>) -> Option<NaiveDateTime> {
    s.map(|s| parse_datetime(&s))
}

/// Format a datetime for storage
pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Current UTC time, truncated to whole seconds like the stored form
pub(crate) fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Encode a list column as JSON text
pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decode a JSON list column, treating corrupt or missing text as empty
pub(crate) fn from_json_text<T: serde::de::DeserializeOwned + Default>(s: Option<String>) -> T {
    s.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `COMPASS_DB_KEY` environment variable to be set.
    /// The database will be encrypted using SQLCipher with a key derived
    /// from the passphrase via Argon2.
    ///
    /// Use `new_unencrypted()` for development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        let encryption_key = std::env::var(DB_KEY_ENV).ok();
        match encryption_key {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for unencrypted databases (not recommended for production).",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    ///
    /// WARNING: This creates an unencrypted database. Only use for development
    /// or testing.
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);

        let pool = if let Some(pass) = passphrase {
            let key = derive_key(pass)?;
            let key_pragma = format!("PRAGMA key = 'x\"{}\"';", key);

            let manager = manager.with_init(move |conn| {
                conn.execute_batch(&key_pragma)?;
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                Ok(())
            });

            Pool::builder().max_size(10).build(manager)?
        } else {
            let manager = manager.with_init(|conn| {
                conn.execute_batch("PRAGMA foreign_keys = ON;")?;
                Ok(())
            });
            Pool::builder().max_size(10).build(manager)?
        };

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because SQLCipher
    /// has issues with in-memory databases in the connection pool.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "compass_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().to_string();

        let _ = std::fs::remove_file(&path);

        Self::new_unencrypted(&path)
    }

    /// Check if the database is encrypted
    pub fn is_encrypted(&self) -> Result<bool> {
        let conn = self.conn()?;
        // SQLCipher sets cipher_version if encryption is active
        let result: rusqlite::Result<String> =
            conn.query_row("PRAGMA cipher_version;", [], |row| row.get(0));
        Ok(result.is_ok() && std::env::var(DB_KEY_ENV).is_ok())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Row counts per table, for `compass status`
    pub fn table_counts(&self) -> Result<Vec<(&'static str, i64)>> {
        const TABLES: &[&str] = &[
            "transactions",
            "budgets",
            "sleep_records",
            "exercise_records",
            "tasks",
            "investments",
            "reminders",
            "contacts",
            "gift_ideas",
            "emails",
            "email_drafts",
            "email_templates",
            "phone_calls",
            "life_areas",
            "goals",
            "rewards",
            "me_time_activities",
            "activities",
            "study_sessions",
        ];

        let conn = self.conn()?;
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            let count: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            counts.push((*table, count));
        }
        Ok(counts)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA cache_size = 2000;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Finance
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                date DATETIME NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                period TEXT NOT NULL
            );

            -- Health
            CREATE TABLE IF NOT EXISTS sleep_records (
                id INTEGER PRIMARY KEY,
                date DATETIME NOT NULL,
                duration_hours REAL NOT NULL,
                quality INTEGER NOT NULL,
                notes TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_sleep_records_date ON sleep_records(date);

            CREATE TABLE IF NOT EXISTS exercise_records (
                id INTEGER PRIMARY KEY,
                date DATETIME NOT NULL,
                activity_type TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                intensity INTEGER NOT NULL,
                calories_burned INTEGER,
                notes TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_exercise_records_date ON exercise_records(date);

            -- Single row, id pinned to 1
            CREATE TABLE IF NOT EXISTS health_preferences (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                sleep_goal_hours REAL NOT NULL,
                exercise_goal_minutes INTEGER NOT NULL,
                daily_calorie_goal INTEGER,
                daily_water_goal REAL,
                favorite_activities TEXT NOT NULL DEFAULT '[]'
            );

            -- Tasks
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                due_date DATETIME,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                estimated_duration_minutes INTEGER,
                priority TEXT NOT NULL DEFAULT 'medium',
                status TEXT NOT NULL DEFAULT 'not_started',
                category TEXT,
                delegatable INTEGER NOT NULL DEFAULT 0,
                completion_date DATETIME
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
            CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);

            -- Portfolio
            CREATE TABLE IF NOT EXISTS investments (
                id INTEGER PRIMARY KEY,
                symbol TEXT NOT NULL,
                name TEXT NOT NULL,
                asset_class TEXT NOT NULL,
                quantity REAL NOT NULL,
                purchase_price REAL NOT NULL,
                purchase_date DATETIME NOT NULL,
                account TEXT,
                notes TEXT
            );

            -- Memory assistant
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                relationship TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                birthday TEXT,
                address TEXT,
                notes TEXT,
                gift_preferences TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                due_date DATETIME NOT NULL,
                priority TEXT NOT NULL DEFAULT 'medium',
                type TEXT NOT NULL,
                recurrence TEXT,
                related_contact_id INTEGER REFERENCES contacts(id) ON DELETE SET NULL,
                created_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reminders_due_date ON reminders(due_date);

            CREATE TABLE IF NOT EXISTS gift_ideas (
                id INTEGER PRIMARY KEY,
                contact_id INTEGER NOT NULL REFERENCES contacts(id) ON DELETE CASCADE,
                idea TEXT NOT NULL,
                estimated_price REAL,
                occasion TEXT,
                notes TEXT,
                url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_gift_ideas_contact ON gift_ideas(contact_id);

            -- Email and calls
            CREATE TABLE IF NOT EXISTS emails (
                id INTEGER PRIMARY KEY,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                sender TEXT,
                recipients TEXT NOT NULL DEFAULT '[]',
                cc TEXT NOT NULL DEFAULT '[]',
                bcc TEXT NOT NULL DEFAULT '[]',
                date DATETIME NOT NULL,
                has_attachments INTEGER NOT NULL DEFAULT 0,
                is_read INTEGER NOT NULL DEFAULT 0,
                starred INTEGER NOT NULL DEFAULT 0,
                priority TEXT NOT NULL DEFAULT 'medium',
                category TEXT NOT NULL DEFAULT 'other',
                labels TEXT NOT NULL DEFAULT '[]'
            );

            CREATE INDEX IF NOT EXISTS idx_emails_date ON emails(date);

            CREATE TABLE IF NOT EXISTS email_drafts (
                id INTEGER PRIMARY KEY,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                recipients TEXT NOT NULL DEFAULT '[]',
                cc TEXT NOT NULL DEFAULT '[]',
                bcc TEXT NOT NULL DEFAULT '[]',
                in_reply_to INTEGER REFERENCES emails(id) ON DELETE SET NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                sent INTEGER NOT NULL DEFAULT 0,
                sent_at DATETIME
            );

            CREATE TABLE IF NOT EXISTS email_templates (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                category TEXT,
                variables TEXT NOT NULL DEFAULT '[]',
                created_at DATETIME NOT NULL
            );

            CREATE TABLE IF NOT EXISTS phone_calls (
                id INTEGER PRIMARY KEY,
                contact_name TEXT,
                phone_number TEXT NOT NULL,
                call_type TEXT NOT NULL,
                duration_seconds INTEGER NOT NULL DEFAULT 0,
                date DATETIME NOT NULL,
                notes TEXT,
                transcription TEXT
            );

            -- Life balance
            CREATE TABLE IF NOT EXISTS life_areas (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL UNIQUE,
                importance INTEGER NOT NULL,
                satisfaction INTEGER NOT NULL,
                target_hours_per_week REAL,
                notes TEXT
            );

            CREATE TABLE IF NOT EXISTS rewards (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                type TEXT NOT NULL,
                cost REAL,
                location TEXT,
                duration_minutes INTEGER,
                notes TEXT
            );

            CREATE TABLE IF NOT EXISTS goals (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                life_area TEXT NOT NULL,
                due_date DATETIME,
                priority TEXT NOT NULL DEFAULT 'medium',
                status TEXT NOT NULL DEFAULT 'not_started',
                progress_percent INTEGER NOT NULL DEFAULT 0,
                expected_time_investment REAL,
                reward_id INTEGER REFERENCES rewards(id) ON DELETE SET NULL,
                created_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_goals_status ON goals(status);

            CREATE TABLE IF NOT EXISTS me_time_activities (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                duration_minutes INTEGER NOT NULL,
                preferred_days TEXT NOT NULL DEFAULT '[]',
                preferred_time_ranges TEXT NOT NULL DEFAULT '[]',
                activity_type TEXT,
                location TEXT,
                priority INTEGER NOT NULL DEFAULT 5
            );

            -- Time log feeding the balance analyzer
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY,
                activity_type TEXT NOT NULL,
                duration REAL NOT NULL,
                occurred_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activities_occurred ON activities(occurred_at);

            -- Learning
            CREATE TABLE IF NOT EXISTS study_sessions (
                id INTEGER PRIMARY KEY,
                topic TEXT,
                session_type TEXT NOT NULL,
                duration REAL NOT NULL,
                performance REAL,
                studied_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_study_sessions_studied ON study_sessions(studied_at);

            -- Audit log (tracks API access)
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                user_email TEXT NOT NULL,
                action TEXT NOT NULL,
                entity_type TEXT,
                entity_id INTEGER,
                details TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_log_timestamp ON audit_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_log_action ON audit_log(action);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
