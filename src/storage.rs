use crate::errors::{AppError, ImportError};
use crate::models::{AppData, RolloverSettings, SCHEMA_VERSION, default_rating_items, default_shop_items};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match import_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to load data file: {err}");
                AppData::with_defaults()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::with_defaults(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::with_defaults()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Best-effort save; a failed write is logged and the caller carries on.
pub async fn save_data(path: &Path, data: &AppData) {
    if let Err(err) = persist_data(path, data).await {
        error!("failed to save data file: {}", err.message);
    }
}

pub fn export_json(data: &AppData) -> Result<String, AppError> {
    serde_json::to_string_pretty(data).map_err(AppError::internal)
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("day_planner_data_{}.json", date.format("%Y-%m-%d"))
}

pub fn import_json(text: &str) -> Result<AppData, ImportError> {
    import_slice(text.as_bytes())
}

fn import_slice(bytes: &[u8]) -> Result<AppData, ImportError> {
    let raw: Value = serde_json::from_slice(bytes).map_err(ImportError::Parse)?;
    migrate(raw)
}

type Migration = fn(&mut Map<String, Value>);

/// Each step upgrades documents older than its version.
const MIGRATIONS: &[(u32, Migration)] = &[
    (1, ensure_collections),
    (2, derive_category_order),
    (3, upgrade_legacy_ratings),
    (4, ensure_rollover_settings),
];

/// Brings any saved document up to the current layout.
pub fn migrate(raw: Value) -> Result<AppData, ImportError> {
    let Value::Object(mut doc) = raw else {
        return Err(ImportError::Shape("expected a JSON object".to_string()));
    };
    if !doc.get("tasks").is_some_and(Value::is_array) {
        return Err(ImportError::Shape("missing task list".to_string()));
    }

    let stored = doc
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0);
    for (version, step) in MIGRATIONS {
        if *version > stored {
            debug!(version, "applying data migration");
            step(&mut doc);
        }
    }
    doc.insert("version".to_string(), json!(SCHEMA_VERSION.max(stored)));

    serde_json::from_value(Value::Object(doc)).map_err(ImportError::Decode)
}

fn is_missing(doc: &Map<String, Value>, key: &str) -> bool {
    doc.get(key).is_none_or(Value::is_null)
}

fn ensure_collections(doc: &mut Map<String, Value>) {
    for key in ["schedule", "recurringSchedule", "records", "ratings"] {
        if is_missing(doc, key) {
            doc.insert(key.to_string(), json!({}));
        }
    }
    for key in ["redemptions", "todos", "objectives"] {
        if is_missing(doc, key) {
            doc.insert(key.to_string(), json!([]));
        }
    }
    if is_missing(doc, "ratingItems") {
        let items = serde_json::to_value(default_rating_items()).unwrap_or_default();
        doc.insert("ratingItems".to_string(), items);
    }
    if is_missing(doc, "shopItems") {
        let items = serde_json::to_value(default_shop_items()).unwrap_or_default();
        doc.insert("shopItems".to_string(), items);
    }
}

fn derive_category_order(doc: &mut Map<String, Value>) {
    if !is_missing(doc, "categoryOrder") {
        return;
    }
    let mut order: Vec<String> = Vec::new();
    let tasks = doc.get("tasks").and_then(Value::as_array).cloned().unwrap_or_default();
    for task in &tasks {
        let category = task
            .get("category")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or("uncategorized");
        if !order.iter().any(|known| known == category) {
            order.push(category.to_string());
        }
    }
    doc.insert("categoryOrder".to_string(), json!(order));
}

/// Single 1-5 `score` ratings become a `scores` map on the -2..2 scale.
fn upgrade_legacy_ratings(doc: &mut Map<String, Value>) {
    let Some(Value::Object(ratings)) = doc.get_mut("ratings") else {
        return;
    };
    for (date, rating) in ratings.iter_mut() {
        let upgraded = match rating {
            Value::Object(fields) => match fields.get("score").and_then(Value::as_f64) {
                Some(score) => {
                    let comment = fields
                        .get("comment")
                        .filter(|c| c.is_string())
                        .cloned()
                        .unwrap_or_else(|| json!(""));
                    Some(json!({
                        "scores": { "r1": score.round() as i64 - 3 },
                        "comment": comment,
                    }))
                }
                None => {
                    if is_missing(fields, "scores") {
                        fields.insert("scores".to_string(), json!({}));
                    }
                    None
                }
            },
            _ => {
                warn!(date = date.as_str(), "dropping malformed rating");
                Some(json!({ "scores": {}, "comment": "" }))
            }
        };
        if let Some(value) = upgraded {
            *rating = value;
        }
    }
}

fn ensure_rollover_settings(doc: &mut Map<String, Value>) {
    if is_missing(doc, "rolloverSettings") {
        let settings = serde_json::to_value(RolloverSettings::default()).unwrap_or_default();
        doc.insert("rolloverSettings".to_string(), settings);
    }
}
