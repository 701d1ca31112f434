//! Status command implementation

use std::path::Path;

use anyhow::Result;
use compass_core::ai::{AIClient, CompletionBackend};
use compass_core::db::DB_KEY_ENV;

use super::open_db;

pub async fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!();
    println!("📊 Compass Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = std::fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    let has_key = std::env::var(DB_KEY_ENV).is_ok();
    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if has_key {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ❌ Encryption: REQUIRED but {} not set", DB_KEY_ENV);
    }

    if db_path.exists() {
        match open_db(db_path, no_encrypt) {
            Ok(db) => {
                if let Ok(counts) = db.table_counts() {
                    println!();
                    for (table, count) in counts {
                        println!("   {:<20} {}", table, count);
                    }
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
                if !no_encrypt && !has_key {
                    println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
                } else if has_key {
                    println!("      (Check if {} is correct)", DB_KEY_ENV);
                }
            }
        }
    }

    println!();
    match AIClient::from_env() {
        Some(client) => {
            let status = if client.health_check().await {
                "✅ available"
            } else {
                "❌ not responding"
            };
            println!(
                "   Completion service: {} ({} at {})",
                status,
                client.model(),
                client.host()
            );
        }
        None => {
            println!("   Completion service: not configured (advisors use fallbacks)");
        }
    }

    println!();
    Ok(())
}
