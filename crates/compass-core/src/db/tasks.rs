//! Task operations

use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{format_datetime, now, parse_datetime, parse_opt_datetime, Database};
use crate::error::Result;
use crate::models::{NewTask, Priority, Task, TaskStatus, TaskUpdate};

const TASK_COLUMNS: &str = "id, title, description, due_date, created_at, updated_at, \
    estimated_duration_minutes, priority, status, category, delegatable, completion_date";

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    let priority: String = row.get(7)?;
    let status: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: parse_opt_datetime(row.get(3)?),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
        estimated_duration_minutes: row.get(6)?,
        priority: priority.parse().unwrap_or_default(),
        status: status.parse().unwrap_or_default(),
        category: row.get(9)?,
        delegatable: row.get(10)?,
        completion_date: parse_opt_datetime(row.get(11)?),
    })
}

/// Completion timestamp after moving from `from` to `to`
///
/// Set on entry to completed, cleared on exit, untouched otherwise.
pub(crate) fn next_completion_date(
    from: TaskStatus,
    to: TaskStatus,
    current: Option<NaiveDateTime>,
    at: NaiveDateTime,
) -> Option<NaiveDateTime> {
    match (from == TaskStatus::Completed, to == TaskStatus::Completed) {
        (false, true) => Some(at),
        (true, false) => None,
        _ => current,
    }
}

impl Database {
    pub fn create_task(&self, task: &NewTask) -> Result<Task> {
        let conn = self.conn()?;
        let created = now();

        conn.execute(
            r#"
            INSERT INTO tasks (title, description, due_date, created_at, updated_at,
                               estimated_duration_minutes, priority, status, category, delegatable)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                task.title,
                task.description,
                task.due_date.as_ref().map(format_datetime),
                format_datetime(&created),
                format_datetime(&created),
                task.estimated_duration_minutes,
                task.priority.as_str(),
                TaskStatus::NotStarted.as_str(),
                task.category,
                task.delegatable,
            ],
        )?;

        Ok(Task {
            id: conn.last_insert_rowid(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            created_at: created,
            updated_at: created,
            estimated_duration_minutes: task.estimated_duration_minutes,
            priority: task.priority,
            status: TaskStatus::NotStarted,
            category: task.category.clone(),
            delegatable: task.delegatable,
            completion_date: None,
        })
    }

    /// List tasks, earliest due first (undated last)
    pub fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        priority: Option<Priority>,
        category: Option<&str>,
    ) -> Result<Vec<Task>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("status = ?", status.map(|s| s.as_str()))
            .push("priority = ?", priority.map(|p| p.as_str()))
            .push("category = ?", category.map(str::to_string));

        let sql = format!(
            "SELECT {} FROM tasks {} ORDER BY due_date IS NULL, due_date, id",
            TASK_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(builder.params().as_slice(), row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                &format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Apply a partial update; returns None when the task does not exist
    pub fn update_task(&self, id: i64, update: &TaskUpdate) -> Result<Option<Task>> {
        let Some(mut task) = self.get_task(id)? else {
            return Ok(None);
        };

        let at = now();
        if let Some(title) = &update.title {
            task.title = title.clone();
        }
        if update.description.is_some() {
            task.description = update.description.clone();
        }
        if update.due_date.is_some() {
            task.due_date = update.due_date;
        }
        if update.estimated_duration_minutes.is_some() {
            task.estimated_duration_minutes = update.estimated_duration_minutes;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if update.category.is_some() {
            task.category = update.category.clone();
        }
        if let Some(delegatable) = update.delegatable {
            task.delegatable = delegatable;
        }
        if let Some(status) = update.status {
            task.completion_date =
                next_completion_date(task.status, status, task.completion_date, at);
            task.status = status;
        }
        task.updated_at = at;

        self.save_task(&task)?;
        Ok(Some(task))
    }

    /// Mark a task completed; returns None when the task does not exist
    pub fn complete_task(&self, id: i64) -> Result<Option<Task>> {
        self.update_task(
            id,
            &TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
    }

    /// Delete a task; returns false when nothing was deleted
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM tasks WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    /// Open tasks due before tomorrow (or undated), most urgent first
    pub fn tasks_for_today(&self, today: NaiveDateTime) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let tomorrow = today.date().and_hms_opt(0, 0, 0).unwrap_or(today) + Duration::days(1);

        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE status NOT IN ('completed', 'canceled') \
               AND (due_date IS NULL OR due_date < ?) \
             ORDER BY due_date IS NULL, due_date, id",
            TASK_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut tasks = stmt
            .query_map(params![format_datetime(&tomorrow)], row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Stable sort keeps due-date order within a priority
        tasks.sort_by_key(|t| std::cmp::Reverse(t.priority.rank()));
        Ok(tasks)
    }

    /// Tasks created or completed at or after `since`
    pub fn tasks_touched_since(&self, since: NaiveDateTime) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM tasks WHERE created_at >= ?1 OR completion_date >= ?1",
            TASK_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![format_datetime(&since)], row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn save_task(&self, task: &Task) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE tasks SET
                title = ?, description = ?, due_date = ?, updated_at = ?,
                estimated_duration_minutes = ?, priority = ?, status = ?, category = ?,
                delegatable = ?, completion_date = ?
            WHERE id = ?
            "#,
            params![
                task.title,
                task.description,
                task.due_date.as_ref().map(format_datetime),
                format_datetime(&task.updated_at),
                task.estimated_duration_minutes,
                task.priority.as_str(),
                task.status.as_str(),
                task.category,
                task.delegatable,
                task.completion_date.as_ref().map(format_datetime),
                task.id,
            ],
        )?;
        Ok(())
    }
}
