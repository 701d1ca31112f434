//! Keyword triage, mailbox statistics, and template rendering

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use serde::Serialize;

use super::Period;
use crate::error::Result;
use crate::models::{Email, EmailCategory, Priority};

const CATEGORY_KEYWORDS: &[(EmailCategory, &[&str])] = &[
    (EmailCategory::Finance, &["invoice", "payment"]),
    (EmailCategory::Work, &["meeting", "project"]),
    (EmailCategory::Promotions, &["sale", "discount"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    Medium,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailTriage {
    pub suggested_category: EmailCategory,
    pub urgency: Urgency,
    pub suggested_priority: Priority,
}

/// Suggest a category and priority from keywords in the body
///
/// Falls back to the email's own category and priority when nothing matches.
pub fn triage_email(email: &Email) -> EmailTriage {
    let body = email.body.to_lowercase();

    let suggested_category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| body.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(email.category);

    let (urgency, suggested_priority) = if body.contains("urgent") || body.contains("asap") {
        (Urgency::High, Priority::Urgent)
    } else if body.contains("please") && (body.contains("review") || body.contains("respond")) {
        (Urgency::Medium, Priority::High)
    } else {
        (Urgency::Normal, email.priority)
    };

    EmailTriage {
        suggested_category,
        urgency,
        suggested_priority,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailStatistics {
    pub period: Period,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total_emails: usize,
    pub unread_emails: usize,
    pub starred_emails: usize,
    pub categories: BTreeMap<String, usize>,
}

/// Counts over emails dated within the period ending at `now`
pub fn email_statistics(emails: &[Email], period: Period, now: NaiveDateTime) -> EmailStatistics {
    let (start, end) = period.window_ending(now);
    let in_window: Vec<&Email> = emails.iter().filter(|e| e.date >= start).collect();

    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for email in &in_window {
        *categories
            .entry(email.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    EmailStatistics {
        period,
        start_date: start,
        end_date: end,
        total_emails: in_window.len(),
        unread_emails: in_window.iter().filter(|e| !e.is_read).count(),
        starred_emails: in_window.iter().filter(|e| e.starred).count(),
        categories,
    }
}

/// Replace `{name}` placeholders that have a value; others are left as written
pub fn render_template(text: &str, variables: &HashMap<String, String>) -> Result<String> {
    let placeholder = Regex::new(r"\{(\w+)\}")?;
    let rendered = placeholder.replace_all(text, |caps: &Captures| {
        variables
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(rendered.into_owned())
}

/// "Re: " prefix unless the subject already has one
pub fn reply_subject(subject: &str) -> String {
    if subject.starts_with("Re: ") {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn email(body: &str, days_ago: i64) -> Email {
        Email {
            id: 0,
            subject: "Hello".to_string(),
            body: body.to_string(),
            sender: Some("a@example.com".to_string()),
            recipients: vec![],
            cc: vec![],
            bcc: vec![],
            date: now() - Duration::days(days_ago),
            has_attachments: false,
            is_read: false,
            starred: false,
            priority: Priority::Low,
            category: EmailCategory::Social,
            labels: vec![],
        }
    }

    #[test]
    fn test_triage_keywords() {
        let triage = triage_email(&email("Your INVOICE is attached, pay ASAP", 0));
        assert_eq!(triage.suggested_category, EmailCategory::Finance);
        assert_eq!(triage.urgency, Urgency::High);
        assert_eq!(triage.suggested_priority, Priority::Urgent);

        let triage = triage_email(&email("Please review the project plan", 0));
        assert_eq!(triage.suggested_category, EmailCategory::Work);
        assert_eq!(triage.urgency, Urgency::Medium);
        assert_eq!(triage.suggested_priority, Priority::High);
    }

    #[test]
    fn test_triage_falls_back_to_email_fields() {
        let triage = triage_email(&email("See you on saturday", 0));
        assert_eq!(triage.suggested_category, EmailCategory::Social);
        assert_eq!(triage.urgency, Urgency::Normal);
        assert_eq!(triage.suggested_priority, Priority::Low);
    }

    #[test]
    fn test_statistics_window() {
        let mut starred = email("a", 3);
        starred.starred = true;
        starred.is_read = true;
        let emails = vec![starred, email("b", 10), email("c", 40)];

        let week = email_statistics(&emails, Period::Week, now());
        assert_eq!(week.total_emails, 1);
        assert_eq!(week.unread_emails, 0);
        assert_eq!(week.starred_emails, 1);

        let month = email_statistics(&emails, Period::Month, now());
        assert_eq!(month.total_emails, 2);
        assert_eq!(month.categories["social"], 2);
    }

    #[test]
    fn test_render_template() {
        let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
        let rendered = render_template("Hi {name}, re {topic}", &vars).unwrap();
        assert_eq!(rendered, "Hi Ada, re {topic}");
    }

    #[test]
    fn test_reply_subject() {
        assert_eq!(reply_subject("Lunch"), "Re: Lunch");
        assert_eq!(reply_subject("Re: Lunch"), "Re: Lunch");
    }
}
