//! Emails, drafts, templates, and phone calls

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::filter::WhereBuilder;
use super::{
    format_datetime, from_json_text, now, parse_datetime, parse_opt_datetime, to_json_text,
    Database,
};
use crate::error::{Error, Result};
use crate::models::{
    CallType, Email, EmailCategory, EmailDraft, EmailTemplate, NewEmail, NewEmailDraft,
    NewEmailTemplate, NewPhoneCall, PhoneCall, Priority,
};

/// Sender recorded on emails produced by sending a draft
pub const LOCAL_SENDER: &str = "user@example.com";

/// Filters for listing emails
#[derive(Debug, Clone, Default)]
pub struct EmailFilter {
    pub is_read: Option<bool>,
    pub starred: Option<bool>,
    pub category: Option<EmailCategory>,
    pub label: Option<String>,
    pub since: Option<NaiveDateTime>,
}

const EMAIL_COLUMNS: &str = "id, subject, body, sender, recipients, cc, bcc, date, \
    has_attachments, is_read, starred, priority, category, labels";

const DRAFT_COLUMNS: &str = "id, subject, body, recipients, cc, bcc, in_reply_to, created_at, \
    updated_at, sent, sent_at";

fn row_to_email(row: &rusqlite::Row) -> rusqlite::Result<Email> {
    let date: String = row.get(7)?;
    let priority: String = row.get(11)?;
    let category: String = row.get(12)?;
    Ok(Email {
        id: row.get(0)?,
        subject: row.get(1)?,
        body: row.get(2)?,
        sender: row.get(3)?,
        recipients: from_json_text(row.get(4)?),
        cc: from_json_text(row.get(5)?),
        bcc: from_json_text(row.get(6)?),
        date: parse_datetime(&date),
        has_attachments: row.get(8)?,
        is_read: row.get(9)?,
        starred: row.get(10)?,
        priority: priority.parse().unwrap_or_default(),
        category: category.parse().unwrap_or_default(),
        labels: from_json_text(row.get(13)?),
    })
}

fn row_to_draft(row: &rusqlite::Row) -> rusqlite::Result<EmailDraft> {
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(EmailDraft {
        id: row.get(0)?,
        subject: row.get(1)?,
        body: row.get(2)?,
        recipients: from_json_text(row.get(3)?),
        cc: from_json_text(row.get(4)?),
        bcc: from_json_text(row.get(5)?),
        in_reply_to: row.get(6)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
        sent: row.get(9)?,
        sent_at: parse_opt_datetime(row.get(10)?),
    })
}

fn row_to_template(row: &rusqlite::Row) -> rusqlite::Result<EmailTemplate> {
    let created_at: String = row.get(6)?;
    Ok(EmailTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        category: row.get(4)?,
        variables: from_json_text(row.get(5)?),
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_call(row: &rusqlite::Row) -> rusqlite::Result<PhoneCall> {
    let call_type: String = row.get(3)?;
    let date: String = row.get(5)?;
    Ok(PhoneCall {
        id: row.get(0)?,
        contact_name: row.get(1)?,
        phone_number: row.get(2)?,
        call_type: call_type.parse().unwrap_or(CallType::Incoming),
        duration_seconds: row.get(4)?,
        date: parse_datetime(&date),
        notes: row.get(6)?,
        transcription: row.get(7)?,
    })
}

impl Database {
    pub fn create_email(&self, email: &NewEmail) -> Result<Email> {
        self.insert_email(email, now())
    }

    fn insert_email(&self, email: &NewEmail, date: NaiveDateTime) -> Result<Email> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO emails (subject, body, sender, recipients, cc, bcc, date,
                                has_attachments, is_read, starred, priority, category, labels)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                email.subject,
                email.body,
                email.sender,
                to_json_text(&email.recipients)?,
                to_json_text(&email.cc)?,
                to_json_text(&email.bcc)?,
                format_datetime(&date),
                email.has_attachments,
                email.is_read,
                email.starred,
                email.priority.as_str(),
                email.category.as_str(),
                to_json_text(&email.labels)?,
            ],
        )?;

        Ok(Email {
            id: conn.last_insert_rowid(),
            subject: email.subject.clone(),
            body: email.body.clone(),
            sender: email.sender.clone(),
            recipients: email.recipients.clone(),
            cc: email.cc.clone(),
            bcc: email.bcc.clone(),
            date,
            has_attachments: email.has_attachments,
            is_read: email.is_read,
            starred: email.starred,
            priority: email.priority,
            category: email.category,
            labels: email.labels.clone(),
        })
    }

    /// List emails, newest first
    pub fn list_emails(&self, filter: &EmailFilter) -> Result<Vec<Email>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder
            .push("is_read = ?", filter.is_read)
            .push("starred = ?", filter.starred)
            .push("category = ?", filter.category.map(|c| c.as_str()))
            .push("date >= ?", filter.since.as_ref().map(format_datetime));
        // Labels are a JSON array; match the quoted element
        builder.push(
            "labels LIKE ?",
            filter
                .label
                .as_ref()
                .map(|l| format!("%{}%", serde_json::Value::String(l.clone()))),
        );

        let sql = format!(
            "SELECT {} FROM emails {} ORDER BY date DESC, id DESC",
            EMAIL_COLUMNS,
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let emails = stmt
            .query_map(builder.params().as_slice(), row_to_email)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(emails)
    }

    pub fn get_email(&self, id: i64) -> Result<Option<Email>> {
        let conn = self.conn()?;
        let email = conn
            .query_row(
                &format!("SELECT {} FROM emails WHERE id = ?", EMAIL_COLUMNS),
                params![id],
                row_to_email,
            )
            .optional()?;
        Ok(email)
    }

    pub fn mark_email_read(&self, id: i64) -> Result<Option<Email>> {
        let conn = self.conn()?;
        conn.execute("UPDATE emails SET is_read = 1 WHERE id = ?", params![id])?;
        drop(conn);
        self.get_email(id)
    }

    pub fn toggle_email_star(&self, id: i64) -> Result<Option<Email>> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE emails SET starred = NOT starred WHERE id = ?",
            params![id],
        )?;
        drop(conn);
        self.get_email(id)
    }

    pub fn create_draft(&self, draft: &NewEmailDraft) -> Result<EmailDraft> {
        let conn = self.conn()?;
        let created = now();

        conn.execute(
            r#"
            INSERT INTO email_drafts (subject, body, recipients, cc, bcc, in_reply_to, created_at, updated_at, sent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
            params![
                draft.subject,
                draft.body,
                to_json_text(&draft.recipients)?,
                to_json_text(&draft.cc)?,
                to_json_text(&draft.bcc)?,
                draft.in_reply_to,
                format_datetime(&created),
                format_datetime(&created),
            ],
        )?;

        Ok(EmailDraft {
            id: conn.last_insert_rowid(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            recipients: draft.recipients.clone(),
            cc: draft.cc.clone(),
            bcc: draft.bcc.clone(),
            in_reply_to: draft.in_reply_to,
            created_at: created,
            updated_at: created,
            sent: false,
            sent_at: None,
        })
    }

    /// Unsent drafts, most recently edited first
    pub fn list_drafts(&self) -> Result<Vec<EmailDraft>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM email_drafts WHERE sent = 0 ORDER BY updated_at DESC, id DESC",
            DRAFT_COLUMNS
        ))?;

        let drafts = stmt
            .query_map([], row_to_draft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(drafts)
    }

    fn get_unsent_draft(&self, id: i64) -> Result<EmailDraft> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM email_drafts WHERE id = ? AND sent = 0",
                DRAFT_COLUMNS
            ),
            params![id],
            row_to_draft,
        )
        .optional()?
        .ok_or_else(|| Error::NotFound("Draft not found or already sent".to_string()))
    }

    /// Replace the content of an unsent draft
    pub fn update_draft(&self, id: i64, draft: &NewEmailDraft) -> Result<EmailDraft> {
        let existing = self.get_unsent_draft(id)?;
        let updated = now();

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE email_drafts SET subject = ?, body = ?, recipients = ?, cc = ?, bcc = ?,
                                    in_reply_to = ?, updated_at = ?
            WHERE id = ?
            "#,
            params![
                draft.subject,
                draft.body,
                to_json_text(&draft.recipients)?,
                to_json_text(&draft.cc)?,
                to_json_text(&draft.bcc)?,
                draft.in_reply_to,
                format_datetime(&updated),
                id,
            ],
        )?;

        Ok(EmailDraft {
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            recipients: draft.recipients.clone(),
            cc: draft.cc.clone(),
            bcc: draft.bcc.clone(),
            in_reply_to: draft.in_reply_to,
            updated_at: updated,
            ..existing
        })
    }

    /// Mark an unsent draft as sent and store it as a read personal email
    pub fn send_draft(&self, id: i64) -> Result<Email> {
        let draft = self.get_unsent_draft(id)?;
        let sent_at = now();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE email_drafts SET sent = 1, sent_at = ? WHERE id = ?",
            params![format_datetime(&sent_at), id],
        )?;
        drop(conn);

        let email = NewEmail {
            subject: draft.subject,
            body: draft.body,
            sender: Some(LOCAL_SENDER.to_string()),
            recipients: draft.recipients,
            cc: draft.cc,
            bcc: draft.bcc,
            has_attachments: false,
            is_read: true,
            starred: false,
            priority: Priority::Medium,
            category: EmailCategory::Personal,
            labels: Vec::new(),
        };
        self.insert_email(&email, sent_at)
    }

    pub fn create_template(&self, template: &NewEmailTemplate) -> Result<EmailTemplate> {
        let conn = self.conn()?;
        let created = now();
        conn.execute(
            r#"
            INSERT INTO email_templates (name, subject, body, category, variables, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                template.name,
                template.subject,
                template.body,
                template.category,
                to_json_text(&template.variables)?,
                format_datetime(&created),
            ],
        )?;

        Ok(EmailTemplate {
            id: conn.last_insert_rowid(),
            name: template.name.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            category: template.category.clone(),
            variables: template.variables.clone(),
            created_at: created,
        })
    }

    pub fn list_templates(&self, category: Option<&str>) -> Result<Vec<EmailTemplate>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder.push("category = ?", category.map(str::to_string));

        let sql = format!(
            "SELECT id, name, subject, body, category, variables, created_at \
             FROM email_templates {} ORDER BY name, id",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let templates = stmt
            .query_map(builder.params().as_slice(), row_to_template)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    pub fn get_template(&self, id: i64) -> Result<Option<EmailTemplate>> {
        let conn = self.conn()?;
        let template = conn
            .query_row(
                "SELECT id, name, subject, body, category, variables, created_at \
                 FROM email_templates WHERE id = ?",
                params![id],
                row_to_template,
            )
            .optional()?;
        Ok(template)
    }

    pub fn create_phone_call(&self, call: &NewPhoneCall) -> Result<PhoneCall> {
        let conn = self.conn()?;
        let date = call.date.unwrap_or_else(now);
        conn.execute(
            r#"
            INSERT INTO phone_calls (contact_name, phone_number, call_type, duration_seconds, date, notes, transcription)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                call.contact_name,
                call.phone_number,
                call.call_type.as_str(),
                call.duration_seconds,
                format_datetime(&date),
                call.notes,
                call.transcription,
            ],
        )?;

        Ok(PhoneCall {
            id: conn.last_insert_rowid(),
            contact_name: call.contact_name.clone(),
            phone_number: call.phone_number.clone(),
            call_type: call.call_type,
            duration_seconds: call.duration_seconds,
            date,
            notes: call.notes.clone(),
            transcription: call.transcription.clone(),
        })
    }

    /// Phone calls, newest first
    pub fn list_phone_calls(&self, call_type: Option<CallType>) -> Result<Vec<PhoneCall>> {
        let conn = self.conn()?;

        let mut builder = WhereBuilder::new();
        builder.push("call_type = ?", call_type.map(|c| c.as_str()));

        let sql = format!(
            "SELECT id, contact_name, phone_number, call_type, duration_seconds, date, notes, transcription \
             FROM phone_calls {} ORDER BY date DESC, id DESC",
            builder.clause()
        );

        let mut stmt = conn.prepare(&sql)?;
        let calls = stmt
            .query_map(builder.params().as_slice(), row_to_call)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(calls)
    }
}
