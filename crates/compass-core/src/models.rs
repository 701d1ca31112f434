//! Domain models for Compass
//!
//! Flat records grouped by module (finance, health, tasks, portfolio, memory,
//! email, life balance, learning). Enumerations serialize as snake_case and
//! round-trip through `as_str` / `FromStr` for storage in SQLite.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Declares a text-backed enum with `as_str`, `FromStr`, `Display`, and `ALL`.
///
/// The text of each variant must match its snake_case serde name.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(format!("Unknown {}: {}", $label, s)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ============================================================================
// Shared
// ============================================================================

text_enum! {
    /// Priority shared by tasks, reminders, and emails
    pub enum Priority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Priority {
    /// Numeric rank for sorting (higher = more urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

// ============================================================================
// Finance
// ============================================================================

/// A money movement; negative amounts are spending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to now
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    /// Free-form period label ("monthly", "weekly", ...)
    pub period: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    pub period: String,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: i64,
    pub date: NaiveDateTime,
    pub duration_hours: f64,
    /// 1-10 scale
    pub quality: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSleepRecord {
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    pub duration_hours: f64,
    pub quality: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: i64,
    pub date: NaiveDateTime,
    pub activity_type: String,
    pub duration_minutes: i32,
    /// 1-10 scale
    pub intensity: i32,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExerciseRecord {
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    pub activity_type: String,
    pub duration_minutes: i32,
    pub intensity: i32,
    #[serde(default)]
    pub calories_burned: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Health goals; a single row, created with defaults on first access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPreferences {
    pub sleep_goal_hours: f64,
    /// Weekly goal
    pub exercise_goal_minutes: i32,
    pub daily_calorie_goal: Option<i32>,
    /// Liters
    pub daily_water_goal: Option<f64>,
    pub favorite_activities: Vec<String>,
}

impl Default for HealthPreferences {
    fn default() -> Self {
        Self {
            sleep_goal_hours: 8.0,
            exercise_goal_minutes: 150,
            daily_calorie_goal: Some(2000),
            daily_water_goal: Some(2.5),
            favorite_activities: vec![
                "Walking".to_string(),
                "Running".to_string(),
                "Yoga".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthPreferencesUpdate {
    pub sleep_goal_hours: Option<f64>,
    pub exercise_goal_minutes: Option<i32>,
    pub daily_calorie_goal: Option<i32>,
    pub daily_water_goal: Option<f64>,
    pub favorite_activities: Option<Vec<String>>,
}

// ============================================================================
// Tasks
// ============================================================================

text_enum! {
    pub enum TaskStatus ("task status") {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Delegated => "delegated",
        Completed => "completed",
        Canceled => "canceled",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl TaskStatus {
    /// Completed and canceled tasks are closed
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Completed | Self::Canceled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub estimated_duration_minutes: Option<i32>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub category: Option<String>,
    pub delegatable: bool,
    /// Set only while the task is completed
    pub completion_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub estimated_duration_minutes: Option<i32>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub delegatable: bool,
}

/// Partial task update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub estimated_duration_minutes: Option<i32>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub delegatable: Option<bool>,
    pub status: Option<TaskStatus>,
}

// ============================================================================
// Portfolio
// ============================================================================

text_enum! {
    pub enum AssetClass ("asset class") {
        Stock => "stock",
        Bond => "bond",
        Etf => "etf",
        MutualFund => "mutual_fund",
        Cryptocurrency => "cryptocurrency",
        Cash => "cash",
        RealEstate => "real_estate",
        Commodity => "commodity",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDateTime,
    pub account: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInvestment {
    pub symbol: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub quantity: f64,
    pub purchase_price: f64,
    pub purchase_date: NaiveDateTime,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvestmentUpdate {
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub asset_class: Option<AssetClass>,
    pub quantity: Option<f64>,
    pub purchase_price: Option<f64>,
    pub purchase_date: Option<NaiveDateTime>,
    pub account: Option<String>,
    pub notes: Option<String>,
}

// ============================================================================
// Memory assistant
// ============================================================================

text_enum! {
    pub enum ReminderType ("reminder type") {
        Task => "task",
        Event => "event",
        Birthday => "birthday",
        Holiday => "holiday",
        Routine => "routine",
        Custom => "custom",
    }
}

text_enum! {
    pub enum Relationship ("relationship") {
        Family => "family",
        Friend => "friend",
        Colleague => "colleague",
        Acquaintance => "acquaintance",
        Client => "client",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub recurrence: Option<String>,
    pub related_contact_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    #[serde(default)]
    pub priority: Priority,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub related_contact_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub relationship: Relationship,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub gift_preferences: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub relationship: Relationship,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub gift_preferences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftIdea {
    pub id: i64,
    pub contact_id: i64,
    pub idea: String,
    pub estimated_price: Option<f64>,
    pub occasion: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGiftIdea {
    pub contact_id: i64,
    pub idea: String,
    #[serde(default)]
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================================================
// Email and calls
// ============================================================================

text_enum! {
    pub enum EmailCategory ("email category") {
        Personal => "personal",
        Work => "work",
        Finance => "finance",
        Shopping => "shopping",
        Travel => "travel",
        Social => "social",
        Promotions => "promotions",
        Updates => "updates",
        Forums => "forums",
        Other => "other",
    }
}

impl Default for EmailCategory {
    fn default() -> Self {
        Self::Other
    }
}

text_enum! {
    pub enum CallType ("call type") {
        Incoming => "incoming",
        Outgoing => "outgoing",
        Missed => "missed",
        Voicemail => "voicemail",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub sender: Option<String>,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub date: NaiveDateTime,
    pub has_attachments: bool,
    pub is_read: bool,
    pub starred: bool,
    pub priority: Priority,
    pub category: EmailCategory,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmail {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub sender: Option<String>,
    pub recipients: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub has_attachments: bool,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: EmailCategory,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDraft {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub in_reply_to: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub sent: bool,
    pub sent_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmailDraft {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub in_reply_to: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub category: Option<String>,
    pub variables: Vec<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmailTemplate {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub variables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneCall {
    pub id: i64,
    pub contact_name: Option<String>,
    pub phone_number: String,
    pub call_type: CallType,
    pub duration_seconds: i32,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    pub transcription: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPhoneCall {
    #[serde(default)]
    pub contact_name: Option<String>,
    pub phone_number: String,
    pub call_type: CallType,
    #[serde(default)]
    pub duration_seconds: i32,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub transcription: Option<String>,
}

// ============================================================================
// Life balance
// ============================================================================

text_enum! {
    /// Life areas rated on the wheel of life
    ///
    /// The first seven are the time-allocation domains scored by the balance
    /// analyzer; `Finance` only appears on the wheel.
    pub enum LifeAreaType ("life area") {
        Work => "work",
        Health => "health",
        Relationships => "relationships",
        PersonalGrowth => "personal_growth",
        Recreation => "recreation",
        Spirituality => "spirituality",
        Community => "community",
        Finance => "finance",
    }
}

impl LifeAreaType {
    /// Title-cased label ("personal_growth" -> "Personal Growth")
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

text_enum! {
    pub enum GoalStatus ("goal status") {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Completed => "completed",
        Deferred => "deferred",
        Abandoned => "abandoned",
    }
}

impl Default for GoalStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

text_enum! {
    pub enum GoalPriority ("goal priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl Default for GoalPriority {
    fn default() -> Self {
        Self::Medium
    }
}

text_enum! {
    pub enum RewardType ("reward type") {
        Activity => "activity",
        Purchase => "purchase",
        Experience => "experience",
        Achievement => "achievement",
        Custom => "custom",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeArea {
    pub id: i64,
    #[serde(rename = "type")]
    pub area_type: LifeAreaType,
    /// 1-10 scale
    pub importance: i32,
    /// 1-10 scale
    pub satisfaction: i32,
    pub target_hours_per_week: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLifeArea {
    #[serde(rename = "type")]
    pub area_type: LifeAreaType,
    pub importance: i32,
    pub satisfaction: i32,
    #[serde(default)]
    pub target_hours_per_week: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub life_area: LifeAreaType,
    pub due_date: Option<NaiveDateTime>,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    /// 0-100
    pub progress_percent: i32,
    /// Hours
    pub expected_time_investment: Option<f64>,
    pub reward_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub life_area: LifeAreaType,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: GoalPriority,
    #[serde(default)]
    pub expected_time_investment: Option<f64>,
    #[serde(default)]
    pub reward_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub life_area: Option<LifeAreaType>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<GoalPriority>,
    pub status: Option<GoalStatus>,
    pub progress_percent: Option<i32>,
    pub expected_time_investment: Option<f64>,
    pub reward_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    pub cost: Option<f64>,
    pub location: Option<String>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReward {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub reward_type: RewardType,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A preferred window for a me-time activity ("HH:MM")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// A recurring personal recovery activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeTime {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    /// 0-6, Monday first; empty means any day
    pub preferred_days: Vec<u32>,
    pub preferred_time_ranges: Vec<TimeRange>,
    pub activity_type: Option<String>,
    pub location: Option<String>,
    /// 1-10 scale
    pub priority: i32,
}

fn default_me_time_priority() -> i32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMeTime {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i32,
    #[serde(default)]
    pub preferred_days: Vec<u32>,
    #[serde(default)]
    pub preferred_time_ranges: Vec<TimeRange>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_me_time_priority")]
    pub priority: i32,
}

/// Time spent on something, classified into a life domain by its type tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    /// Tag such as "meetings", "exercise", "family_time"
    pub activity_type: String,
    /// Hours
    pub duration: f64,
    pub occurred_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub activity_type: String,
    pub duration: f64,
    #[serde(default)]
    pub occurred_at: Option<NaiveDateTime>,
}

// ============================================================================
// Learning
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub topic: Option<String>,
    /// Free text describing the format ("watching videos", "hands_on lab")
    pub session_type: String,
    /// Minutes
    pub duration: f64,
    /// 0-1; treated as 0.5 for style scoring when absent
    pub performance: Option<f64>,
    pub studied_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudySession {
    #[serde(default)]
    pub topic: Option<String>,
    pub session_type: String,
    pub duration: f64,
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub studied_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_text_roundtrip() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), *status);
        }
        for class in AssetClass::ALL {
            let json = serde_json::to_value(class).unwrap();
            assert_eq!(json, class.as_str());
        }
        assert!("sideways".parse::<Priority>().is_err());
    }

    #[test]
    fn test_life_area_display_name() {
        assert_eq!(LifeAreaType::PersonalGrowth.display_name(), "Personal Growth");
        assert_eq!(LifeAreaType::Work.display_name(), "Work");
    }

    #[test]
    fn test_priority_rank_orders_urgent_first() {
        let mut priorities = vec![Priority::Low, Priority::Urgent, Priority::Medium];
        priorities.sort_by_key(|p| std::cmp::Reverse(p.rank()));
        assert_eq!(priorities[0], Priority::Urgent);
        assert_eq!(priorities[2], Priority::Low);
    }

    #[test]
    fn test_new_task_defaults() {
        let task: NewTask = serde_json::from_str(r#"{"title": "Write report"}"#).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.delegatable);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_life_area_serializes_type_field() {
        let area = LifeArea {
            id: 1,
            area_type: LifeAreaType::Health,
            importance: 9,
            satisfaction: 5,
            target_hours_per_week: None,
            notes: None,
        };
        let json = serde_json::to_value(&area).unwrap();
        assert_eq!(json["type"], "health");
    }
}
