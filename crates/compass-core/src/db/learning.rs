//! Study session operations

use chrono::NaiveDateTime;
use rusqlite::params;

use super::filter::WhereBuilder;
use super::{format_datetime, now, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewStudySession, StudySession};

impl Database {
    /// Record a study session; performance, when given, must be within 0-1
    pub fn create_study_session(&self, session: &NewStudySession) -> Result<StudySession> {
        if let Some(performance) = session.performance {
            if !(0.0..=1.0).contains(&performance) {
                return Err(Error::Validation(
                    "Performance must be between 0 and 1".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        let studied_at = session.studied_at.unwrap_or_else(now);
        conn.execute(
            r#"
            INSERT INTO study_sessions (topic, session_type, duration, performance, studied_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                session.topic,
                session.session_type,
                session.duration,
                session.performance,
                format_datetime(&studied_at),
            ],
        )?;

        Ok(StudySession {
            id: conn.last_insert_rowid(),
            topic: session.topic.clone(),
            session_type: session.session_type.clone(),
            duration: session.duration,
            performance: session.performance,
            studied_at,
        })
    }

    /// Study sessions in chronological order, optionally filtered by topic
    pub fn list_study_sessions(
        &self,
        topic: Option<&str>,
        since: Option<NaiveDateTime>,
    ) -> Result<Vec<StudySession>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("topic = ?", topic.map(str::to_string))
            .push("studied_at >= ?", since.as_ref().map(format_datetime));

        let sql = format!(
            "SELECT id, topic, session_type, duration, performance, studied_at \
             FROM study_sessions {} ORDER BY studied_at, id",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(builder.params().as_slice(), |row| {
                let studied_at: String = row.get(5)?;
                Ok(StudySession {
                    id: row.get(0)?,
                    topic: row.get(1)?,
                    session_type: row.get(2)?,
                    duration: row.get(3)?,
                    performance: row.get(4)?,
                    studied_at: parse_datetime(&studied_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sessions)
    }
}
