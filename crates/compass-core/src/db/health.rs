//! Sleep, exercise, and health preference operations

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{format_datetime, from_json_text, now, parse_datetime, to_json_text, Database};
use crate::error::{Error, Result};
use crate::models::{
    ExerciseRecord, HealthPreferences, HealthPreferencesUpdate, NewExerciseRecord,
    NewSleepRecord, SleepRecord,
};

fn check_scale(field: &str, value: i32) -> Result<()> {
    if !(1..=10).contains(&value) {
        return Err(Error::Validation(format!(
            "{} must be between 1 and 10",
            field
        )));
    }
    Ok(())
}

impl Database {
    pub fn create_sleep_record(&self, record: &NewSleepRecord) -> Result<SleepRecord> {
        check_scale("Quality", record.quality)?;

        let conn = self.conn()?;
        let date = record.date.unwrap_or_else(now);
        conn.execute(
            "INSERT INTO sleep_records (date, duration_hours, quality, notes) VALUES (?, ?, ?, ?)",
            params![
                format_datetime(&date),
                record.duration_hours,
                record.quality,
                record.notes
            ],
        )?;

        Ok(SleepRecord {
            id: conn.last_insert_rowid(),
            date,
            duration_hours: record.duration_hours,
            quality: record.quality,
            notes: record.notes.clone(),
        })
    }

    /// Sleep records in an optional date window, newest first
    pub fn list_sleep_records(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<SleepRecord>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("date >= ?", start.as_ref().map(format_datetime))
            .push("date <= ?", end.as_ref().map(format_datetime));

        let sql = format!(
            "SELECT id, date, duration_hours, quality, notes FROM sleep_records {} \
             ORDER BY date DESC",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(builder.params().as_slice(), |row| {
                let date_str: String = row.get(1)?;
                Ok(SleepRecord {
                    id: row.get(0)?,
                    date: parse_datetime(&date_str),
                    duration_hours: row.get(2)?,
                    quality: row.get(3)?,
                    notes: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn create_exercise_record(&self, record: &NewExerciseRecord) -> Result<ExerciseRecord> {
        check_scale("Intensity", record.intensity)?;

        let conn = self.conn()?;
        let date = record.date.unwrap_or_else(now);
        conn.execute(
            r#"
            INSERT INTO exercise_records (date, activity_type, duration_minutes, intensity, calories_burned, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                format_datetime(&date),
                record.activity_type,
                record.duration_minutes,
                record.intensity,
                record.calories_burned,
                record.notes
            ],
        )?;

        Ok(ExerciseRecord {
            id: conn.last_insert_rowid(),
            date,
            activity_type: record.activity_type.clone(),
            duration_minutes: record.duration_minutes,
            intensity: record.intensity,
            calories_burned: record.calories_burned,
            notes: record.notes.clone(),
        })
    }

    /// Exercise records in an optional date window, newest first
    pub fn list_exercise_records(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        activity_type: Option<&str>,
    ) -> Result<Vec<ExerciseRecord>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("date >= ?", start.as_ref().map(format_datetime))
            .push("date <= ?", end.as_ref().map(format_datetime))
            .push("activity_type = ?", activity_type.map(str::to_string));

        let sql = format!(
            "SELECT id, date, activity_type, duration_minutes, intensity, calories_burned, notes \
             FROM exercise_records {} ORDER BY date DESC",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(builder.params().as_slice(), |row| {
                let date_str: String = row.get(1)?;
                Ok(ExerciseRecord {
                    id: row.get(0)?,
                    date: parse_datetime(&date_str),
                    activity_type: row.get(2)?,
                    duration_minutes: row.get(3)?,
                    intensity: row.get(4)?,
                    calories_burned: row.get(5)?,
                    notes: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Health preferences, stored with defaults on first access
    pub fn get_health_preferences(&self) -> Result<HealthPreferences> {
        let conn = self.conn()?;
        let stored = conn
            .query_row(
                r#"
                SELECT sleep_goal_hours, exercise_goal_minutes, daily_calorie_goal,
                       daily_water_goal, favorite_activities
                FROM health_preferences WHERE id = 1
                "#,
                [],
                |row| {
                    Ok(HealthPreferences {
                        sleep_goal_hours: row.get(0)?,
                        exercise_goal_minutes: row.get(1)?,
                        daily_calorie_goal: row.get(2)?,
                        daily_water_goal: row.get(3)?,
                        favorite_activities: from_json_text(row.get(4)?),
                    })
                },
            )
            .optional()?;

        match stored {
            Some(prefs) => Ok(prefs),
            None => {
                let defaults = HealthPreferences::default();
                self.save_health_preferences(&defaults)?;
                Ok(defaults)
            }
        }
    }

    /// Apply a partial update and return the stored preferences
    pub fn update_health_preferences(
        &self,
        update: &HealthPreferencesUpdate,
    ) -> Result<HealthPreferences> {
        let mut prefs = self.get_health_preferences()?;

        if let Some(hours) = update.sleep_goal_hours {
            prefs.sleep_goal_hours = hours;
        }
        if let Some(minutes) = update.exercise_goal_minutes {
            prefs.exercise_goal_minutes = minutes;
        }
        if update.daily_calorie_goal.is_some() {
            prefs.daily_calorie_goal = update.daily_calorie_goal;
        }
        if update.daily_water_goal.is_some() {
            prefs.daily_water_goal = update.daily_water_goal;
        }
        if let Some(activities) = &update.favorite_activities {
            prefs.favorite_activities = activities.clone();
        }

        self.save_health_preferences(&prefs)?;
        Ok(prefs)
    }

    fn save_health_preferences(&self, prefs: &HealthPreferences) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO health_preferences
                (id, sleep_goal_hours, exercise_goal_minutes, daily_calorie_goal, daily_water_goal, favorite_activities)
            VALUES (1, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                sleep_goal_hours = excluded.sleep_goal_hours,
                exercise_goal_minutes = excluded.exercise_goal_minutes,
                daily_calorie_goal = excluded.daily_calorie_goal,
                daily_water_goal = excluded.daily_water_goal,
                favorite_activities = excluded.favorite_activities
            "#,
            params![
                prefs.sleep_goal_hours,
                prefs.exercise_goal_minutes,
                prefs.daily_calorie_goal,
                prefs.daily_water_goal,
                to_json_text(&prefs.favorite_activities)?
            ],
        )?;
        Ok(())
    }
}
