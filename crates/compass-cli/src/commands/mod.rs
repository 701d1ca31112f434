//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database setup (init) and shared utilities (open_db)
//! - `finance` - Spending analysis, budget recommendation, cash-flow projection
//! - `life` - Wheel of life, burnout risk, review schedule, today's agenda
//! - `serve` - Web server command
//! - `status` - Record counts and service health

pub mod core;
pub mod finance;
pub mod life;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use finance::*;
pub use life::*;
pub use serve::*;
pub use status::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
