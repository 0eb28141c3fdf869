use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hour of day (0-23) to the task ids assigned to it.
pub type Hours = BTreeMap<u8, Vec<String>>;

/// Date key (`YYYY-MM-DD`) to a day's slots.
pub type DayMap = BTreeMap<String, DayData>;

pub const SCHEMA_VERSION: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    #[default]
    Duration,
    Count,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskTarget {
    #[serde(default)]
    pub mode: TargetMode,
    pub value: f64,
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

fn default_frequency() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<TaskTarget>,
}

impl Task {
    pub fn mode(&self) -> TargetMode {
        self.targets.as_ref().map(|t| t.mode).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DayData {
    #[serde(default)]
    pub hours: Hours,
}

impl DayData {
    pub fn tasks_at(&self, hour: u8) -> &[String] {
        self.hours.get(&hour).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default = "no_objective")]
    pub objective_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub is_frog: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

pub fn no_objective() -> String {
    "none".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub reasons: BTreeMap<i8, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DayRating {
    #[serde(default)]
    pub scores: BTreeMap<String, i64>,
    #[serde(default)]
    pub comment: String,
}

impl DayRating {
    pub fn total(&self) -> i64 {
        self.scores.values().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: i64,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: String,
    pub shop_item_id: String,
    pub item_name: String,
    pub cost: i64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RolloverSettings {
    pub enabled: bool,
    pub max_days: u32,
}

impl Default for RolloverSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_days: 7,
        }
    }
}

/// The whole persisted state. Always replaced wholesale, never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppData {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub objectives: Vec<Objective>,
    pub category_order: Vec<String>,
    pub rating_items: Vec<RatingItem>,
    pub shop_items: Vec<ShopItem>,
    pub redemptions: Vec<Redemption>,
    pub schedule: DayMap,
    pub recurring_schedule: Hours,
    pub records: DayMap,
    pub ratings: BTreeMap<String, DayRating>,
    pub todos: Vec<Todo>,
    pub rollover_settings: RolloverSettings,
}

impl AppData {
    /// Fresh-install state with the starter tasks, rating items and shop.
    pub fn with_defaults() -> Self {
        let tasks = default_tasks();
        let mut category_order: Vec<String> = Vec::new();
        for task in &tasks {
            if !category_order.contains(&task.category) {
                category_order.push(task.category.clone());
            }
        }

        Self {
            version: SCHEMA_VERSION,
            tasks,
            category_order,
            rating_items: default_rating_items(),
            shop_items: default_shop_items(),
            ..Self::default()
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

pub fn default_tasks() -> Vec<Task> {
    [
        ("t1", "Sleep", "#94a3b8", "Life"),
        ("t2", "Work", "#3b82f6", "Work"),
        ("t3", "Exercise", "#10b981", "Health"),
        ("t4", "Reading", "#8b5cf6", "Growth"),
        ("t5", "Meals", "#f59e0b", "Life"),
    ]
    .into_iter()
    .map(|(id, name, color, category)| Task {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        category: category.to_string(),
        targets: None,
    })
    .collect()
}

pub fn default_rating_items() -> Vec<RatingItem> {
    let item = |id: &str, name: &str, labels: [&str; 5]| RatingItem {
        id: id.to_string(),
        name: name.to_string(),
        reasons: (-2..=2)
            .zip(labels)
            .map(|(score, label)| (score, label.to_string()))
            .collect(),
    };

    vec![
        item(
            "r1",
            "Energy",
            ["Exhausted", "A bit anxious", "Ordinary", "Fulfilled", "Full of energy"],
        ),
        item(
            "r2",
            "Focus",
            ["Slacked off", "Often distracted", "Business as usual", "Deeply engaged", "In the flow"],
        ),
    ]
}

pub fn default_shop_items() -> Vec<ShopItem> {
    [
        ("s1", "Bubble tea", 10, "🧋"),
        ("s2", "One hour of gaming", 15, "🎮"),
        ("s3", "Cheat meal", 30, "🍔"),
        ("s4", "Movie night", 50, "🎬"),
        ("s5", "Lazy day", 100, "🛌"),
    ]
    .into_iter()
    .map(|(id, name, cost, icon)| ShopItem {
        id: id.to_string(),
        name: name.to_string(),
        cost,
        icon: icon.to_string(),
    })
    .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourTasksRequest {
    pub task_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub shop_item_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub targets: Option<TaskTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct RatingItemRequest {
    pub name: String,
    #[serde(default)]
    pub reasons: BTreeMap<i8, String>,
}

#[derive(Debug, Deserialize)]
pub struct ShopItemRequest {
    pub name: String,
    pub cost: i64,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRequest {
    pub title: String,
    #[serde(default = "no_objective")]
    pub objective_id: String,
    #[serde(default)]
    pub is_frog: bool,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    #[serde(default)]
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub range: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TodoQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub current: f64,
    pub target: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskGoal {
    pub task_id: String,
    pub name: String,
    pub mode: TargetMode,
    pub rolling: GoalProgress,
    pub today: GoalProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRangeStats {
    pub task: Task,
    pub planned_total: u32,
    pub actual_total: f64,
    pub exec_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayColumn {
    pub date: String,
    pub tasks: Vec<TaskRangeStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RangeStatsResponse {
    pub start_date: String,
    pub end_date: String,
    pub tasks: Vec<TaskRangeStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapCell {
    pub date: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveCount {
    pub objective_id: String,
    pub title: String,
    pub color: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapResponse {
    pub month: String,
    pub days: Vec<HeatmapCell>,
    pub objectives: Vec<ObjectiveCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingPoint {
    pub date: String,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingTrend {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<RatingPoint>,
    pub total: i64,
    pub days_rated: u32,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub lifetime_score: i64,
    pub spent: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: String,
    pub plan: DayData,
    pub specific: DayData,
    pub record: DayData,
    pub actual: BTreeMap<String, f64>,
    pub goals: Vec<TaskGoal>,
    pub rating: DayRating,
}
