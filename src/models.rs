use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Steps,
    Distance,
}

impl GoalType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "steps" => Some(Self::Steps),
            "distance" => Some(Self::Distance),
            _ => None,
        }
    }
}

/// A user's daily target: `value` steps or meters depending on `goal_type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub goal_type: GoalType,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub goal_type: GoalType,
    pub goal_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn goal(&self) -> Goal {
        Goal {
            goal_type: self.goal_type,
            value: self.goal_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Walk {
    pub id: Uuid,
    pub user_id: Uuid,
    pub steps: u64,
    /// Meters.
    pub distance: f64,
    /// Minutes.
    pub duration: u64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The persisted document behind the activity store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub users: BTreeMap<Uuid, User>,
    pub walks: BTreeMap<Uuid, Walk>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub goal_type: GoalType,
    pub goal_value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub goal_type: Option<GoalType>,
    pub goal_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWalk {
    pub user_id: Uuid,
    pub steps: u64,
    pub distance: f64,
    pub duration: u64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WalkPatch {
    pub steps: Option<u64>,
    pub distance: Option<f64>,
    pub duration: Option<u64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub streak: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: String,
    pub steps: u64,
    pub distance: f64,
    pub duration: u64,
    pub goal_met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotals {
    pub total_steps: u64,
    pub total_distance: f64,
    pub total_duration: u64,
    pub days_active: u8,
    pub days_goal_met: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub start_date: String,
    pub end_date: String,
    pub daily_data: [DayBucket; 7],
    pub weekly_totals: WeeklyTotals,
    pub unmatched_walks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub day: DayBucket,
    pub walk_count: usize,
    pub goal_type: GoalType,
    pub goal_value: f64,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCalendar {
    pub month: String,
    pub days: Vec<DayBucket>,
    pub days_active: u32,
    pub days_goal_met: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub period: String,
    pub start_date: String,
    pub end_date: String,
    pub walk_count: usize,
    pub total_steps: u64,
    pub total_distance: f64,
    pub total_duration: u64,
    pub average_steps: f64,
    pub average_distance: f64,
    pub average_duration: f64,
}
