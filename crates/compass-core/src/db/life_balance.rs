//! Life areas, goals, rewards, me-time activities, and the activity log

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{
    format_datetime, from_json_text, now, parse_datetime, parse_opt_datetime, to_json_text,
    Database,
};
use crate::analytics::goals::status_for_progress;
use crate::analytics::wheel::DEFAULT_WHEEL;
use crate::error::{Error, Result};
use crate::models::{
    Activity, Goal, GoalPriority, GoalStatus, GoalUpdate, LifeArea, LifeAreaType, MeTime,
    NewActivity, NewGoal, NewLifeArea, NewMeTime, NewReward, Reward, RewardType,
};

/// Filters for listing goals
#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    pub status: Option<GoalStatus>,
    pub life_area: Option<LifeAreaType>,
    pub priority: Option<GoalPriority>,
}

const GOAL_COLUMNS: &str = "id, title, description, life_area, due_date, priority, status, \
    progress_percent, expected_time_investment, reward_id, created_at";

fn check_rating(field: &str, value: i32) -> Result<()> {
    if !(1..=10).contains(&value) {
        return Err(Error::Validation(format!(
            "{} must be between 1 and 10",
            field
        )));
    }
    Ok(())
}

fn row_to_area(row: &rusqlite::Row) -> rusqlite::Result<LifeArea> {
    let area_type: String = row.get(1)?;
    Ok(LifeArea {
        id: row.get(0)?,
        area_type: area_type.parse().unwrap_or(LifeAreaType::Work),
        importance: row.get(2)?,
        satisfaction: row.get(3)?,
        target_hours_per_week: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let life_area: String = row.get(3)?;
    let priority: String = row.get(5)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(10)?;
    Ok(Goal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        life_area: life_area.parse().unwrap_or(LifeAreaType::Work),
        due_date: parse_opt_datetime(row.get(4)?),
        priority: priority.parse().unwrap_or_default(),
        status: status.parse().unwrap_or_default(),
        progress_percent: row.get(7)?,
        expected_time_investment: row.get(8)?,
        reward_id: row.get(9)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_reward(row: &rusqlite::Row) -> rusqlite::Result<Reward> {
    let reward_type: String = row.get(3)?;
    Ok(Reward {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        reward_type: reward_type.parse().unwrap_or(RewardType::Custom),
        cost: row.get(4)?,
        location: row.get(5)?,
        duration_minutes: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn row_to_me_time(row: &rusqlite::Row) -> rusqlite::Result<MeTime> {
    Ok(MeTime {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
        preferred_days: from_json_text(row.get(4)?),
        preferred_time_ranges: from_json_text(row.get(5)?),
        activity_type: row.get(6)?,
        location: row.get(7)?,
        priority: row.get(8)?,
    })
}

impl Database {
    /// Create a life area; ratings must be 1-10 and each type may exist once
    pub fn create_life_area(&self, area: &NewLifeArea) -> Result<LifeArea> {
        check_rating("Importance", area.importance)?;
        check_rating("Satisfaction", area.satisfaction)?;

        if self.get_life_area_by_type(area.area_type)?.is_some() {
            return Err(Error::Validation(format!(
                "Life area '{}' already exists",
                area.area_type
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO life_areas (type, importance, satisfaction, target_hours_per_week, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                area.area_type.as_str(),
                area.importance,
                area.satisfaction,
                area.target_hours_per_week,
                area.notes,
            ],
        )?;

        Ok(LifeArea {
            id: conn.last_insert_rowid(),
            area_type: area.area_type,
            importance: area.importance,
            satisfaction: area.satisfaction,
            target_hours_per_week: area.target_hours_per_week,
            notes: area.notes.clone(),
        })
    }

    pub fn list_life_areas(&self) -> Result<Vec<LifeArea>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, type, importance, satisfaction, target_hours_per_week, notes \
             FROM life_areas ORDER BY id",
        )?;

        let areas = stmt
            .query_map([], row_to_area)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(areas)
    }

    pub fn get_life_area_by_type(&self, area_type: LifeAreaType) -> Result<Option<LifeArea>> {
        let conn = self.conn()?;
        let area = conn
            .query_row(
                "SELECT id, type, importance, satisfaction, target_hours_per_week, notes \
                 FROM life_areas WHERE type = ?",
                params![area_type.as_str()],
                row_to_area,
            )
            .optional()?;
        Ok(area)
    }

    /// Update ratings, target, and notes of an area (its type is fixed)
    pub fn update_life_area(&self, id: i64, area: &NewLifeArea) -> Result<LifeArea> {
        check_rating("Importance", area.importance)?;
        check_rating("Satisfaction", area.satisfaction)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE life_areas SET importance = ?, satisfaction = ?, target_hours_per_week = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                area.importance,
                area.satisfaction,
                area.target_hours_per_week,
                area.notes,
                id
            ],
        )?;
        if updated == 0 {
            return Err(Error::NotFound("Life area not found".to_string()));
        }

        conn.query_row(
            "SELECT id, type, importance, satisfaction, target_hours_per_week, notes \
             FROM life_areas WHERE id = ?",
            params![id],
            row_to_area,
        )
        .map_err(Error::from)
    }

    /// Seed the default wheel when no areas exist; returns the stored areas
    pub fn ensure_default_life_areas(&self) -> Result<Vec<LifeArea>> {
        let existing = self.list_life_areas()?;
        if !existing.is_empty() {
            return Ok(existing);
        }

        for (area_type, importance, satisfaction) in DEFAULT_WHEEL {
            self.create_life_area(&NewLifeArea {
                area_type: *area_type,
                importance: *importance,
                satisfaction: *satisfaction,
                target_hours_per_week: None,
                notes: None,
            })?;
        }
        self.list_life_areas()
    }

    fn check_goal_links(&self, life_area: LifeAreaType, reward_id: Option<i64>) -> Result<()> {
        if self.get_life_area_by_type(life_area)?.is_none() {
            return Err(Error::Validation(format!(
                "Life area '{}' does not exist",
                life_area
            )));
        }
        if let Some(reward_id) = reward_id {
            if self.get_reward(reward_id)?.is_none() {
                return Err(Error::NotFound("Reward not found".to_string()));
            }
        }
        Ok(())
    }

    /// Create a goal; its life area and optional reward must exist
    pub fn create_goal(&self, goal: &NewGoal) -> Result<Goal> {
        self.check_goal_links(goal.life_area, goal.reward_id)?;

        let conn = self.conn()?;
        let created = now();
        conn.execute(
            r#"
            INSERT INTO goals (title, description, life_area, due_date, priority, status,
                               progress_percent, expected_time_investment, reward_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
            params![
                goal.title,
                goal.description,
                goal.life_area.as_str(),
                goal.due_date.as_ref().map(format_datetime),
                goal.priority.as_str(),
                GoalStatus::NotStarted.as_str(),
                goal.expected_time_investment,
                goal.reward_id,
                format_datetime(&created),
            ],
        )?;

        Ok(Goal {
            id: conn.last_insert_rowid(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            life_area: goal.life_area,
            due_date: goal.due_date,
            priority: goal.priority,
            status: GoalStatus::NotStarted,
            progress_percent: 0,
            expected_time_investment: goal.expected_time_investment,
            reward_id: goal.reward_id,
            created_at: created,
        })
    }

    /// List goals, newest first
    pub fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<Goal>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("status = ?", filter.status.map(|s| s.as_str()))
            .push("life_area = ?", filter.life_area.map(|a| a.as_str()))
            .push("priority = ?", filter.priority.map(|p| p.as_str()));

        let sql = format!(
            "SELECT {} FROM goals {} ORDER BY created_at DESC, id DESC",
            GOAL_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let goals = stmt
            .query_map(builder.params().as_slice(), row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!("SELECT {} FROM goals WHERE id = ?", GOAL_COLUMNS),
                params![id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// Number of goals created at or after `since`
    pub fn count_goals_created_since(&self, since: NaiveDateTime) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM goals WHERE created_at >= ?",
            params![format_datetime(&since)],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Apply a partial update; re-validates changed links and progress range
    pub fn update_goal(&self, id: i64, update: &GoalUpdate) -> Result<Goal> {
        let mut goal = self
            .get_goal(id)?
            .ok_or_else(|| Error::NotFound("Goal not found".to_string()))?;

        if let Some(life_area) = update.life_area {
            self.check_goal_links(life_area, None)?;
            goal.life_area = life_area;
        }
        if let Some(reward_id) = update.reward_id {
            if self.get_reward(reward_id)?.is_none() {
                return Err(Error::NotFound("Reward not found".to_string()));
            }
            goal.reward_id = Some(reward_id);
        }
        if let Some(progress) = update.progress_percent {
            if !(0..=100).contains(&progress) {
                return Err(Error::Validation(
                    "Progress must be between 0 and 100".to_string(),
                ));
            }
            goal.progress_percent = progress;
        }
        if let Some(title) = &update.title {
            goal.title = title.clone();
        }
        if update.description.is_some() {
            goal.description = update.description.clone();
        }
        if update.due_date.is_some() {
            goal.due_date = update.due_date;
        }
        if let Some(priority) = update.priority {
            goal.priority = priority;
        }
        if let Some(status) = update.status {
            goal.status = status;
        }
        if update.expected_time_investment.is_some() {
            goal.expected_time_investment = update.expected_time_investment;
        }

        self.save_goal(&goal)?;
        Ok(goal)
    }

    /// Set progress and derive the status from it
    pub fn update_goal_progress(&self, id: i64, progress: i32) -> Result<Goal> {
        let mut goal = self
            .get_goal(id)?
            .ok_or_else(|| Error::NotFound("Goal not found".to_string()))?;

        goal.status = status_for_progress(goal.status, progress)
            .map_err(|e| Error::Validation(e.to_string()))?;
        goal.progress_percent = progress;

        self.save_goal(&goal)?;
        Ok(goal)
    }

    fn save_goal(&self, goal: &Goal) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE goals SET title = ?, description = ?, life_area = ?, due_date = ?, priority = ?,
                             status = ?, progress_percent = ?, expected_time_investment = ?, reward_id = ?
            WHERE id = ?
            "#,
            params![
                goal.title,
                goal.description,
                goal.life_area.as_str(),
                goal.due_date.as_ref().map(format_datetime),
                goal.priority.as_str(),
                goal.status.as_str(),
                goal.progress_percent,
                goal.expected_time_investment,
                goal.reward_id,
                goal.id,
            ],
        )?;
        Ok(())
    }

    pub fn create_reward(&self, reward: &NewReward) -> Result<Reward> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO rewards (name, description, type, cost, location, duration_minutes, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                reward.name,
                reward.description,
                reward.reward_type.as_str(),
                reward.cost,
                reward.location,
                reward.duration_minutes,
                reward.notes,
            ],
        )?;

        Ok(Reward {
            id: conn.last_insert_rowid(),
            name: reward.name.clone(),
            description: reward.description.clone(),
            reward_type: reward.reward_type,
            cost: reward.cost,
            location: reward.location.clone(),
            duration_minutes: reward.duration_minutes,
            notes: reward.notes.clone(),
        })
    }

    pub fn list_rewards(&self, reward_type: Option<RewardType>) -> Result<Vec<Reward>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder.push("type = ?", reward_type.map(|t| t.as_str()));

        let sql = format!(
            "SELECT id, name, description, type, cost, location, duration_minutes, notes \
             FROM rewards {} ORDER BY name, id",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rewards = stmt
            .query_map(builder.params().as_slice(), row_to_reward)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rewards)
    }

    pub fn get_reward(&self, id: i64) -> Result<Option<Reward>> {
        let conn = self.conn()?;
        let reward = conn
            .query_row(
                "SELECT id, name, description, type, cost, location, duration_minutes, notes \
                 FROM rewards WHERE id = ?",
                params![id],
                row_to_reward,
            )
            .optional()?;
        Ok(reward)
    }

    /// Create a me-time activity; priority must be 1-10 and days 0-6
    pub fn create_me_time(&self, activity: &NewMeTime) -> Result<MeTime> {
        check_rating("Priority", activity.priority)?;
        if activity.preferred_days.iter().any(|d| *d > 6) {
            return Err(Error::Validation(
                "Preferred days must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO me_time_activities (title, description, duration_minutes, preferred_days,
                                            preferred_time_ranges, activity_type, location, priority)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                activity.title,
                activity.description,
                activity.duration_minutes,
                to_json_text(&activity.preferred_days)?,
                to_json_text(&activity.preferred_time_ranges)?,
                activity.activity_type,
                activity.location,
                activity.priority,
            ],
        )?;

        Ok(MeTime {
            id: conn.last_insert_rowid(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            duration_minutes: activity.duration_minutes,
            preferred_days: activity.preferred_days.clone(),
            preferred_time_ranges: activity.preferred_time_ranges.clone(),
            activity_type: activity.activity_type.clone(),
            location: activity.location.clone(),
            priority: activity.priority,
        })
    }

    /// Me-time activities, highest priority first
    pub fn list_me_time(&self) -> Result<Vec<MeTime>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, duration_minutes, preferred_days, preferred_time_ranges, \
                    activity_type, location, priority \
             FROM me_time_activities ORDER BY priority DESC, id",
        )?;

        let activities = stmt
            .query_map([], row_to_me_time)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    pub fn create_activity(&self, activity: &NewActivity) -> Result<Activity> {
        if activity.duration < 0.0 {
            return Err(Error::Validation(
                "Duration must not be negative".to_string(),
            ));
        }

        let conn = self.conn()?;
        let occurred_at = activity.occurred_at.unwrap_or_else(now);
        conn.execute(
            "INSERT INTO activities (activity_type, duration, occurred_at) VALUES (?, ?, ?)",
            params![
                activity.activity_type,
                activity.duration,
                format_datetime(&occurred_at)
            ],
        )?;

        Ok(Activity {
            id: conn.last_insert_rowid(),
            activity_type: activity.activity_type.clone(),
            duration: activity.duration,
            occurred_at,
        })
    }

    /// Logged activities, optionally only those at or after `since`
    pub fn list_activities(&self, since: Option<NaiveDateTime>) -> Result<Vec<Activity>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder.push("occurred_at >= ?", since.as_ref().map(format_datetime));

        let sql = format!(
            "SELECT id, activity_type, duration, occurred_at FROM activities {} \
             ORDER BY occurred_at DESC, id DESC",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let activities = stmt
            .query_map(builder.params().as_slice(), |row| {
                let occurred_at: String = row.get(3)?;
                Ok(Activity {
                    id: row.get(0)?,
                    activity_type: row.get(1)?,
                    duration: row.get(2)?,
                    occurred_at: parse_datetime(&occurred_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }
}
