//! Life-balance, learning, and agenda commands

use anyhow::Result;
use chrono::{Duration, Utc};
use compass_core::analytics::birthdays::upcoming_birthdays;
use compass_core::analytics::review_schedule;
use compass_core::analytics::wheel::{area_burnout_risk, wheel_of_life, GOAL_OVERLOAD_WINDOW_DAYS};
use compass_core::db::Database;

pub fn cmd_wheel(db: &Database) -> Result<()> {
    let areas = db.ensure_default_life_areas()?;
    let wheel = wheel_of_life(&areas);

    println!();
    println!(
        "🎡 Wheel of Life: {:.1}/{}",
        wheel.overall_score, wheel.max_score
    );
    println!("   ─────────────────────────────");
    for area in &wheel.areas {
        let marker = if area.gap >= 3 { "⚠️ " } else { "   " };
        println!(
            "{}{:<18} importance {:>2}  satisfaction {:>2}  gap {}",
            marker, area.name, area.importance, area.satisfaction, area.gap
        );
    }

    Ok(())
}

pub fn cmd_burnout(db: &Database) -> Result<()> {
    let areas = db.list_life_areas()?;
    let since = Utc::now().naive_utc() - Duration::days(GOAL_OVERLOAD_WINDOW_DAYS);
    let recent_goals = db.count_goals_created_since(since)?;
    let risk = area_burnout_risk(&areas, recent_goals);

    println!();
    println!(
        "🔥 Burnout risk: {} ({}/{})",
        risk.risk_level.as_str(),
        risk.risk_score,
        risk.max_score
    );
    println!("   ─────────────────────────────");
    for factor in &risk.factors {
        println!("   • {}", factor);
    }
    if !risk.recommendations.is_empty() {
        println!();
        for recommendation in &risk.recommendations {
            println!("   → {}", recommendation);
        }
    }

    Ok(())
}

pub fn cmd_review_schedule(concepts: u32) -> Result<()> {
    let schedule = review_schedule(concepts, Utc::now().naive_utc());

    println!();
    println!("🧠 Review schedule for {} concepts", concepts);
    println!("   ─────────────────────────────");
    for session in &schedule {
        println!(
            "   {}  +{:>2}d  {:>3} min  {:?}",
            session.review_date.format("%Y-%m-%d"),
            session.interval_days,
            session.estimated_duration,
            session.review_type
        );
    }

    Ok(())
}

pub fn cmd_today(db: &Database) -> Result<()> {
    let now = Utc::now().naive_utc();
    let tasks = db.tasks_for_today(now)?;
    let reminders = db.upcoming_reminders(now, 1)?;
    let contacts = db.list_contacts(None, None)?;
    let birthdays = upcoming_birthdays(&contacts, 0, now.date());

    println!();
    println!("📅 Today - {}", now.format("%A %Y-%m-%d"));
    println!("   ─────────────────────────────");

    if tasks.is_empty() {
        println!("   No open tasks due today.");
    } else {
        for task in &tasks {
            let due = task
                .due_date
                .map(|d| d.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            println!(
                "   [{:<6}] {} {}",
                task.priority.as_str(),
                due,
                super::truncate(&task.title, 60)
            );
        }
    }

    if !reminders.is_empty() {
        println!();
        for reminder in &reminders {
            println!(
                "   🔔 {} {}",
                reminder.due_date.format("%H:%M"),
                super::truncate(&reminder.title, 60)
            );
        }
    }

    for contact in &birthdays {
        println!("   🎂 {}'s birthday", contact.name);
    }

    Ok(())
}
