//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use compass_server::{ServerConfig, API_KEYS_ENV, CORS_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Compass web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env(!no_auth);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if config.api_keys.is_empty() {
        println!("   ❌ Authentication required but {} is empty", API_KEYS_ENV);
        println!("      Every API request will be rejected until keys are set");
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            config.api_keys.len(),
            API_KEYS_ENV
        );
    }
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            CORS_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    // Idempotent
    db.ensure_default_life_areas()
        .context("Failed to seed life areas")?;

    let static_dir_str = match static_dir {
        Some(dir) => Some(
            dir.to_str()
                .context("Static directory path must be valid UTF-8")?,
        ),
        None => None,
    };
    compass_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
