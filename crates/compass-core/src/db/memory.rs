//! Reminders, contacts, and gift ideas

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{format_datetime, from_json_text, now, parse_datetime, to_json_text, Database};
use crate::analytics::MAX_DAYS_AHEAD;
use crate::error::{Error, Result};
use crate::models::{
    Contact, GiftIdea, NewContact, NewGiftIdea, NewReminder, Priority, Relationship, Reminder,
    ReminderType,
};

/// Filters for listing reminders
#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub priority: Option<Priority>,
    pub reminder_type: Option<ReminderType>,
    pub due_before: Option<NaiveDateTime>,
    pub due_after: Option<NaiveDateTime>,
}

/// Filters for listing gift ideas
#[derive(Debug, Clone, Default)]
pub struct GiftIdeaFilter {
    pub contact_id: Option<i64>,
    pub occasion: Option<String>,
    pub max_price: Option<f64>,
}

const REMINDER_COLUMNS: &str = "id, title, description, due_date, priority, type, recurrence, \
    related_contact_id, created_at";

const CONTACT_COLUMNS: &str =
    "id, name, relationship, email, phone, birthday, address, notes, gift_preferences";

fn row_to_reminder(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
    let due_date: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let reminder_type: String = row.get(5)?;
    let created_at: String = row.get(8)?;
    Ok(Reminder {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: parse_datetime(&due_date),
        priority: priority.parse().unwrap_or_default(),
        reminder_type: reminder_type.parse().unwrap_or(ReminderType::Custom),
        recurrence: row.get(6)?,
        related_contact_id: row.get(7)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
    let relationship: String = row.get(2)?;
    let birthday: Option<String> = row.get(5)?;
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        relationship: relationship.parse().unwrap_or(Relationship::Other),
        email: row.get(3)?,
        phone: row.get(4)?,
        birthday: birthday.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        address: row.get(6)?,
        notes: row.get(7)?,
        gift_preferences: from_json_text(row.get(8)?),
    })
}

fn row_to_gift_idea(row: &rusqlite::Row) -> rusqlite::Result<GiftIdea> {
    Ok(GiftIdea {
        id: row.get(0)?,
        contact_id: row.get(1)?,
        idea: row.get(2)?,
        estimated_price: row.get(3)?,
        occasion: row.get(4)?,
        notes: row.get(5)?,
        url: row.get(6)?,
    })
}

impl Database {
    pub fn create_reminder(&self, reminder: &NewReminder) -> Result<Reminder> {
        let conn = self.conn()?;
        let created = now();

        conn.execute(
            r#"
            INSERT INTO reminders (title, description, due_date, priority, type, recurrence, related_contact_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                reminder.title,
                reminder.description,
                format_datetime(&reminder.due_date),
                reminder.priority.as_str(),
                reminder.reminder_type.as_str(),
                reminder.recurrence,
                reminder.related_contact_id,
                format_datetime(&created),
            ],
        )?;

        Ok(Reminder {
            id: conn.last_insert_rowid(),
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            due_date: reminder.due_date,
            priority: reminder.priority,
            reminder_type: reminder.reminder_type,
            recurrence: reminder.recurrence.clone(),
            related_contact_id: reminder.related_contact_id,
            created_at: created,
        })
    }

    /// List reminders, soonest due first
    pub fn list_reminders(&self, filter: &ReminderFilter) -> Result<Vec<Reminder>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("priority = ?", filter.priority.map(|p| p.as_str()))
            .push("type = ?", filter.reminder_type.map(|t| t.as_str()))
            .push("due_date <= ?", filter.due_before.as_ref().map(format_datetime))
            .push("due_date >= ?", filter.due_after.as_ref().map(format_datetime));

        let sql = format!(
            "SELECT {} FROM reminders {} ORDER BY due_date, id",
            REMINDER_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let reminders = stmt
            .query_map(builder.params().as_slice(), row_to_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reminders)
    }

    pub fn get_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        let conn = self.conn()?;
        let reminder = conn
            .query_row(
                &format!("SELECT {} FROM reminders WHERE id = ?", REMINDER_COLUMNS),
                params![id],
                row_to_reminder,
            )
            .optional()?;
        Ok(reminder)
    }

    /// Reminders due between `from` and `from + days`
    pub fn upcoming_reminders(&self, from: NaiveDateTime, days: i64) -> Result<Vec<Reminder>> {
        if !(0..=MAX_DAYS_AHEAD).contains(&days) {
            return Err(Error::Validation(format!(
                "days must be between 0 and {}",
                MAX_DAYS_AHEAD
            )));
        }
        let until = TimeDelta::try_days(days)
            .and_then(|window| from.checked_add_signed(window))
            .ok_or_else(|| {
                Error::Validation("Reminder window runs past the calendar".to_string())
            })?;

        self.list_reminders(&ReminderFilter {
            due_after: Some(from),
            due_before: Some(until),
            ..Default::default()
        })
    }

    pub fn create_contact(&self, contact: &NewContact) -> Result<Contact> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO contacts (name, relationship, email, phone, birthday, address, notes, gift_preferences)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                contact.name,
                contact.relationship.as_str(),
                contact.email,
                contact.phone,
                contact.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
                contact.address,
                contact.notes,
                to_json_text(&contact.gift_preferences)?,
            ],
        )?;

        Ok(Contact {
            id: conn.last_insert_rowid(),
            name: contact.name.clone(),
            relationship: contact.relationship,
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            birthday: contact.birthday,
            address: contact.address.clone(),
            notes: contact.notes.clone(),
            gift_preferences: contact.gift_preferences.clone(),
        })
    }

    /// List contacts by name, optionally filtered by relationship and a
    /// case-insensitive name fragment
    pub fn list_contacts(
        &self,
        relationship: Option<Relationship>,
        search: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("relationship = ?", relationship.map(|r| r.as_str()))
            .push(
                "LOWER(name) LIKE ?",
                search.map(|s| format!("%{}%", s.to_lowercase())),
            );

        let sql = format!(
            "SELECT {} FROM contacts {} ORDER BY name, id",
            CONTACT_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let contacts = stmt
            .query_map(builder.params().as_slice(), row_to_contact)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    pub fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        let conn = self.conn()?;
        let contact = conn
            .query_row(
                &format!("SELECT {} FROM contacts WHERE id = ?", CONTACT_COLUMNS),
                params![id],
                row_to_contact,
            )
            .optional()?;
        Ok(contact)
    }

    /// Record a gift idea; the contact must exist
    pub fn create_gift_idea(&self, gift: &NewGiftIdea) -> Result<GiftIdea> {
        if self.get_contact(gift.contact_id)?.is_none() {
            return Err(Error::NotFound("Contact not found".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO gift_ideas (contact_id, idea, estimated_price, occasion, notes, url)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                gift.contact_id,
                gift.idea,
                gift.estimated_price,
                gift.occasion,
                gift.notes,
                gift.url,
            ],
        )?;

        Ok(GiftIdea {
            id: conn.last_insert_rowid(),
            contact_id: gift.contact_id,
            idea: gift.idea.clone(),
            estimated_price: gift.estimated_price,
            occasion: gift.occasion.clone(),
            notes: gift.notes.clone(),
            url: gift.url.clone(),
        })
    }

    pub fn list_gift_ideas(&self, filter: &GiftIdeaFilter) -> Result<Vec<GiftIdea>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("contact_id = ?", filter.contact_id)
            .push("occasion = ?", filter.occasion.clone())
            .push("estimated_price <= ?", filter.max_price);

        let sql = format!(
            "SELECT id, contact_id, idea, estimated_price, occasion, notes, url \
             FROM gift_ideas {} ORDER BY id",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let ideas = stmt
            .query_map(builder.params().as_slice(), row_to_gift_idea)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ideas)
    }
}
