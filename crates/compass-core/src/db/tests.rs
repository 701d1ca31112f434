//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            due_date: None,
            estimated_duration_minutes: None,
            priority: Priority::Medium,
            category: None,
            delegatable: false,
        }
    }

    fn new_email(subject: &str) -> NewEmail {
        NewEmail {
            subject: subject.to_string(),
            body: "Body".to_string(),
            sender: Some("a@example.com".to_string()),
            recipients: vec!["me@example.com".to_string()],
            cc: Vec::new(),
            bcc: Vec::new(),
            has_attachments: false,
            is_read: false,
            starred: false,
            priority: Priority::Medium,
            category: EmailCategory::Work,
            labels: Vec::new(),
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let counts = db.table_counts().unwrap();
        assert!(counts.iter().all(|(_, count)| *count == 0));
        assert!(!db.is_encrypted().unwrap());
    }

    #[test]
    fn test_datetime_storage_roundtrip() {
        let dt = at(2024, 2, 29, 23);
        assert_eq!(parse_datetime(&format_datetime(&dt)), dt);
        assert_eq!(parse_datetime("2024-02-29T23:00:00.000"), dt);
    }

    #[test]
    fn test_transactions_filter_and_order() {
        let db = Database::in_memory().unwrap();
        for (day, amount, category) in [
            (1, -20.0, "food"),
            (5, -50.0, "rent"),
            (9, 1000.0, "salary"),
        ] {
            db.create_transaction(&NewTransaction {
                amount,
                category: category.to_string(),
                description: None,
                date: Some(at(2024, 3, day, 12)),
            })
            .unwrap();
        }

        let all = db.list_transactions(&TransactionFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].category, "salary");

        let food = db
            .list_transactions(&TransactionFilter {
                category: Some("food".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(food.len(), 1);

        let paged = db
            .list_transactions(&TransactionFilter {
                skip: 1,
                limit: 1,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paged[0].category, "rent");

        let window = db
            .transactions_between(at(2024, 3, 2, 0), at(2024, 3, 31, 0))
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].category, "rent");
    }

    #[test]
    fn test_recent_expenses_are_positive_and_windowed() {
        let db = Database::in_memory().unwrap();
        for (month, day, amount, category) in [
            (1, 10, -80.0, "travel"),
            (3, 1, -20.0, "food"),
            (3, 5, 1000.0, "salary"),
            (3, 9, -50.0, "rent"),
        ] {
            db.create_transaction(&NewTransaction {
                amount,
                category: category.to_string(),
                description: None,
                date: Some(at(2024, month, day, 12)),
            })
            .unwrap();
        }

        let expenses = db.recent_expenses(at(2024, 3, 15, 0)).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "food");
        assert_eq!(expenses[0].amount, 20.0);
        assert_eq!(expenses[1].amount, 50.0);
    }

    #[test]
    fn test_budgets() {
        let db = Database::in_memory().unwrap();
        db.create_budget(&NewBudget {
            category: "rent".to_string(),
            amount: 1200.0,
            period: "monthly".to_string(),
        })
        .unwrap();
        let budgets = db.list_budgets().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 1200.0);
    }

    #[test]
    fn test_sleep_quality_validated() {
        let db = Database::in_memory().unwrap();
        let result = db.create_sleep_record(&NewSleepRecord {
            date: None,
            duration_hours: 7.0,
            quality: 11,
            notes: None,
        });
        assert!(matches!(result, Err(Error::Validation(_))));

        db.create_sleep_record(&NewSleepRecord {
            date: Some(at(2024, 1, 2, 7)),
            duration_hours: 7.5,
            quality: 8,
            notes: None,
        })
        .unwrap();
        let records = db.list_sleep_records(Some(at(2024, 1, 1, 0)), None).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_exercise_filter_by_type() {
        let db = Database::in_memory().unwrap();
        for kind in ["running", "yoga", "running"] {
            db.create_exercise_record(&NewExerciseRecord {
                date: None,
                activity_type: kind.to_string(),
                duration_minutes: 30,
                intensity: 5,
                calories_burned: None,
                notes: None,
            })
            .unwrap();
        }
        let runs = db.list_exercise_records(None, None, Some("running")).unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_health_preferences_default_and_update() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.get_health_preferences().unwrap(), HealthPreferences::default());

        let prefs = db
            .update_health_preferences(&HealthPreferencesUpdate {
                sleep_goal_hours: Some(7.0),
                favorite_activities: Some(vec!["Swimming".to_string()]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(prefs.sleep_goal_hours, 7.0);
        assert_eq!(prefs.exercise_goal_minutes, 150);

        let stored = db.get_health_preferences().unwrap();
        assert_eq!(stored.favorite_activities, vec!["Swimming".to_string()]);
    }

    #[test]
    fn test_task_completion_date_follows_status() {
        let db = Database::in_memory().unwrap();
        let task = db.create_task(&new_task("File taxes")).unwrap();
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert!(task.completion_date.is_none());

        let done = db.complete_task(task.id).unwrap().unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completion_date.is_some());

        let reopened = db
            .update_task(
                task.id,
                &TaskUpdate {
                    status: Some(TaskStatus::InProgress),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(reopened.completion_date.is_none());

        assert!(db.update_task(999, &TaskUpdate::default()).unwrap().is_none());
        assert!(db.delete_task(task.id).unwrap());
        assert!(!db.delete_task(task.id).unwrap());
    }

    #[test]
    fn test_tasks_for_today_orders_by_priority() {
        let db = Database::in_memory().unwrap();
        let today = at(2024, 5, 10, 9);

        let mut low = new_task("Water plants");
        low.priority = Priority::Low;
        low.due_date = Some(at(2024, 5, 10, 8));
        db.create_task(&low).unwrap();

        let mut urgent = new_task("Pay rent");
        urgent.priority = Priority::Urgent;
        urgent.due_date = Some(at(2024, 5, 10, 17));
        db.create_task(&urgent).unwrap();

        let mut later = new_task("Plan trip");
        later.due_date = Some(at(2024, 5, 12, 9));
        db.create_task(&later).unwrap();

        let finished = db.create_task(&new_task("Done already")).unwrap();
        db.complete_task(finished.id).unwrap();

        let tasks = db.tasks_for_today(today).unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Pay rent", "Water plants"]);
    }

    #[test]
    fn test_investment_update_and_delete() {
        let db = Database::in_memory().unwrap();
        let inv = db
            .create_investment(&NewInvestment {
                symbol: "VTI".to_string(),
                name: "Total Market".to_string(),
                asset_class: AssetClass::Etf,
                quantity: 10.0,
                purchase_price: 200.0,
                purchase_date: at(2023, 1, 3, 0),
                account: Some("ira".to_string()),
                notes: None,
            })
            .unwrap();

        let updated = db
            .update_investment(
                inv.id,
                &InvestmentUpdate {
                    quantity: Some(12.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.quantity, 12.0);
        assert_eq!(updated.symbol, "VTI");

        assert_eq!(db.list_investments(Some(AssetClass::Etf), None).unwrap().len(), 1);
        assert!(db.list_investments(Some(AssetClass::Bond), None).unwrap().is_empty());
        assert!(db.delete_investment(inv.id).unwrap());
        assert!(db.get_investment(inv.id).unwrap().is_none());
    }

    #[test]
    fn test_contacts_and_gift_ideas() {
        let db = Database::in_memory().unwrap();
        let contact = db
            .create_contact(&NewContact {
                name: "Ada Lovelace".to_string(),
                relationship: Relationship::Friend,
                email: None,
                phone: None,
                birthday: NaiveDate::from_ymd_opt(1990, 12, 10),
                address: None,
                notes: None,
                gift_preferences: vec!["books".to_string()],
            })
            .unwrap();

        let found = db.list_contacts(None, Some("LOVE")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].birthday, NaiveDate::from_ymd_opt(1990, 12, 10));
        assert_eq!(found[0].gift_preferences, vec!["books".to_string()]);

        let missing = db.create_gift_idea(&NewGiftIdea {
            contact_id: 999,
            idea: "Pen".to_string(),
            estimated_price: None,
            occasion: None,
            notes: None,
            url: None,
        });
        assert!(matches!(missing, Err(Error::NotFound(_))));

        for (idea, price) in [("Book", 20.0), ("Telescope", 300.0)] {
            db.create_gift_idea(&NewGiftIdea {
                contact_id: contact.id,
                idea: idea.to_string(),
                estimated_price: Some(price),
                occasion: Some("birthday".to_string()),
                notes: None,
                url: None,
            })
            .unwrap();
        }
        let cheap = db
            .list_gift_ideas(&GiftIdeaFilter {
                max_price: Some(50.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].idea, "Book");
    }

    #[test]
    fn test_upcoming_reminders_window() {
        let db = Database::in_memory().unwrap();
        let from = at(2024, 6, 1, 0);
        for (title, offset) in [("Soon", 2), ("Later", 10), ("Past", -1)] {
            db.create_reminder(&NewReminder {
                title: title.to_string(),
                description: None,
                due_date: from + Duration::days(offset),
                priority: Priority::High,
                reminder_type: ReminderType::Event,
                recurrence: None,
                related_contact_id: None,
            })
            .unwrap();
        }

        let upcoming = db.upcoming_reminders(from, 7).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Soon");
    }

    #[test]
    fn test_upcoming_reminders_rejects_huge_window() {
        let db = Database::in_memory().unwrap();
        let from = at(2024, 6, 1, 0);

        assert!(db.upcoming_reminders(from, crate::analytics::MAX_DAYS_AHEAD).is_ok());
        assert!(matches!(
            db.upcoming_reminders(from, 1_000_000_000_000),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.upcoming_reminders(from, -1),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_email_flags_and_labels() {
        let db = Database::in_memory().unwrap();
        let mut labelled = new_email("Invoice");
        labelled.labels = vec!["bills".to_string()];
        let email = db.create_email(&labelled).unwrap();
        db.create_email(&new_email("Hello")).unwrap();

        let read = db.mark_email_read(email.id).unwrap().unwrap();
        assert!(read.is_read);
        let starred = db.toggle_email_star(email.id).unwrap().unwrap();
        assert!(starred.starred);
        let unstarred = db.toggle_email_star(email.id).unwrap().unwrap();
        assert!(!unstarred.starred);

        let bills = db
            .list_emails(&EmailFilter {
                label: Some("bills".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(bills.len(), 1);

        let unread = db
            .list_emails(&EmailFilter {
                is_read: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unread[0].subject, "Hello");

        assert!(db.mark_email_read(999).unwrap().is_none());
    }

    #[test]
    fn test_send_draft_once() {
        let db = Database::in_memory().unwrap();
        let draft = db
            .create_draft(&NewEmailDraft {
                subject: "Re: Lunch".to_string(),
                body: "Sounds good".to_string(),
                recipients: vec!["friend@example.com".to_string()],
                cc: Vec::new(),
                bcc: Vec::new(),
                in_reply_to: None,
            })
            .unwrap();

        let email = db.send_draft(draft.id).unwrap();
        assert_eq!(email.sender.as_deref(), Some(email::LOCAL_SENDER));
        assert!(email.is_read);
        assert_eq!(email.category, EmailCategory::Personal);

        assert!(db.list_drafts().unwrap().is_empty());
        assert!(matches!(db.send_draft(draft.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_templates_and_calls() {
        let db = Database::in_memory().unwrap();
        db.create_template(&NewEmailTemplate {
            name: "Thanks".to_string(),
            subject: "Thank you {name}".to_string(),
            body: "Hi {name}".to_string(),
            category: Some("personal".to_string()),
            variables: vec!["name".to_string()],
        })
        .unwrap();
        let templates = db.list_templates(Some("personal")).unwrap();
        assert_eq!(templates[0].variables, vec!["name".to_string()]);

        db.create_phone_call(&NewPhoneCall {
            contact_name: Some("Mom".to_string()),
            phone_number: "555-0100".to_string(),
            call_type: CallType::Missed,
            duration_seconds: 0,
            date: None,
            notes: None,
            transcription: None,
        })
        .unwrap();
        assert_eq!(db.list_phone_calls(Some(CallType::Missed)).unwrap().len(), 1);
        assert!(db.list_phone_calls(Some(CallType::Incoming)).unwrap().is_empty());
    }

    #[test]
    fn test_life_areas_unique_and_seeded() {
        let db = Database::in_memory().unwrap();
        let areas = db.ensure_default_life_areas().unwrap();
        assert_eq!(areas.len(), 8);

        let duplicate = db.create_life_area(&NewLifeArea {
            area_type: LifeAreaType::Work,
            importance: 5,
            satisfaction: 5,
            target_hours_per_week: None,
            notes: None,
        });
        assert!(matches!(duplicate, Err(Error::Validation(_))));

        let bad_rating = db.update_life_area(
            areas[0].id,
            &NewLifeArea {
                area_type: LifeAreaType::Work,
                importance: 0,
                satisfaction: 5,
                target_hours_per_week: None,
                notes: None,
            },
        );
        assert!(matches!(bad_rating, Err(Error::Validation(_))));

        // Seeding again is a no-op
        assert_eq!(db.ensure_default_life_areas().unwrap().len(), 8);
    }

    #[test]
    fn test_goal_requires_area_and_tracks_progress() {
        let db = Database::in_memory().unwrap();
        let goal = NewGoal {
            title: "Run a 10k".to_string(),
            description: None,
            life_area: LifeAreaType::Health,
            due_date: None,
            priority: GoalPriority::High,
            expected_time_investment: None,
            reward_id: None,
        };
        assert!(matches!(db.create_goal(&goal), Err(Error::Validation(_))));

        db.ensure_default_life_areas().unwrap();
        let created = db.create_goal(&goal).unwrap();
        assert_eq!(created.status, GoalStatus::NotStarted);

        let halfway = db.update_goal_progress(created.id, 50).unwrap();
        assert_eq!(halfway.status, GoalStatus::InProgress);
        let done = db.update_goal_progress(created.id, 100).unwrap();
        assert_eq!(done.status, GoalStatus::Completed);
        assert!(db.update_goal_progress(created.id, 101).is_err());

        let since = created.created_at - Duration::days(1);
        assert_eq!(db.count_goals_created_since(since).unwrap(), 1);

        let completed = db
            .list_goals(&GoalFilter {
                status: Some(GoalStatus::Completed),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn test_goal_reward_must_exist() {
        let db = Database::in_memory().unwrap();
        db.ensure_default_life_areas().unwrap();
        let goal = NewGoal {
            title: "Read 12 books".to_string(),
            description: None,
            life_area: LifeAreaType::PersonalGrowth,
            due_date: None,
            priority: GoalPriority::Medium,
            expected_time_investment: Some(40.0),
            reward_id: Some(42),
        };
        assert!(matches!(db.create_goal(&goal), Err(Error::NotFound(_))));

        let reward = db
            .create_reward(&NewReward {
                name: "Spa day".to_string(),
                description: None,
                reward_type: RewardType::Experience,
                cost: Some(120.0),
                location: None,
                duration_minutes: None,
                notes: None,
            })
            .unwrap();
        let linked = db
            .create_goal(&NewGoal {
                reward_id: Some(reward.id),
                ..goal
            })
            .unwrap();
        assert_eq!(linked.reward_id, Some(reward.id));
    }

    #[test]
    fn test_me_time_validation_and_order() {
        let db = Database::in_memory().unwrap();
        let bad_day = db.create_me_time(&NewMeTime {
            title: "Walk".to_string(),
            description: None,
            duration_minutes: 30,
            preferred_days: vec![7],
            preferred_time_ranges: Vec::new(),
            activity_type: None,
            location: None,
            priority: 5,
        });
        assert!(matches!(bad_day, Err(Error::Validation(_))));

        for (title, priority) in [("Read", 3), ("Bath", 9)] {
            db.create_me_time(&NewMeTime {
                title: title.to_string(),
                description: None,
                duration_minutes: 45,
                preferred_days: vec![0, 2],
                preferred_time_ranges: vec![TimeRange {
                    start: "20:00".to_string(),
                    end: "21:00".to_string(),
                }],
                activity_type: None,
                location: None,
                priority,
            })
            .unwrap();
        }
        let activities = db.list_me_time().unwrap();
        assert_eq!(activities[0].title, "Bath");
        assert_eq!(activities[0].preferred_time_ranges[0].start, "20:00");
    }

    #[test]
    fn test_activity_log() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .create_activity(&NewActivity {
                activity_type: "meetings".to_string(),
                duration: -1.0,
                occurred_at: None,
            })
            .is_err());

        db.create_activity(&NewActivity {
            activity_type: "meetings".to_string(),
            duration: 2.0,
            occurred_at: Some(at(2024, 1, 1, 9)),
        })
        .unwrap();
        db.create_activity(&NewActivity {
            activity_type: "exercise".to_string(),
            duration: 1.0,
            occurred_at: Some(at(2024, 2, 1, 9)),
        })
        .unwrap();

        let recent = db.list_activities(Some(at(2024, 1, 15, 0))).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].activity_type, "exercise");
    }

    #[test]
    fn test_study_sessions_chronological() {
        let db = Database::in_memory().unwrap();
        let out_of_range = db.create_study_session(&NewStudySession {
            topic: None,
            session_type: "notes".to_string(),
            duration: 30.0,
            performance: Some(1.5),
            studied_at: None,
        });
        assert!(matches!(out_of_range, Err(Error::Validation(_))));

        for (day, topic) in [(3, "rust"), (1, "rust"), (2, "sql")] {
            db.create_study_session(&NewStudySession {
                topic: Some(topic.to_string()),
                session_type: "hands_on".to_string(),
                duration: 60.0,
                performance: Some(0.8),
                studied_at: Some(at(2024, 4, day, 10)),
            })
            .unwrap();
        }

        let rust = db.list_study_sessions(Some("rust"), None).unwrap();
        assert_eq!(rust.len(), 2);
        assert!(rust[0].studied_at < rust[1].studied_at);
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("me@example.com", "list", Some("tasks"), None, None)
            .unwrap();
        db.log_audit("me@example.com", "create", Some("tasks"), Some(1), None)
            .unwrap();

        let entries = db.list_audit_log(&AuditFilter::default(), 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "create");
        assert_eq!(entries[0].entity_id, Some(1));

        let creates = db
            .list_audit_log(
                &AuditFilter {
                    action: Some("create".to_string()),
                    ..Default::default()
                },
                10,
            )
            .unwrap();
        assert_eq!(creates.len(), 1);
        assert_eq!(db.list_audit_log(&AuditFilter::default(), 1).unwrap().len(), 1);
    }
}
