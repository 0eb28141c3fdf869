use crate::dates::{date_key, month_bounds, parse_date_key, today, week_bounds};
use crate::errors::AppError;
use crate::models::{
    AppData, Balance, DateQuery, DayColumn, DayRating, DayView, HeatmapResponse, HourTasksRequest,
    Objective, ObjectiveRequest, RangeQuery, RangeStatsResponse, RatingItem, RatingItemRequest,
    RatingTrend, RedeemRequest, RolloverSettings, ShopItem, ShopItemRequest, Task, TaskGoal,
    TaskRequest, TaskTarget, Todo, TodoQuery, TodoRequest, ToggleRequest, TrendQuery,
};
use crate::points::{can_afford, compute_balance, redemption_for};
use crate::schedule::{is_valid_hour, resolve_day_schedule, toggle_capped, MAX_TASKS_PER_HOUR};
use crate::state::AppState;
use crate::stats::{
    aggregate_actual, aggregate_range, completion_heatmap, daily_matrix, goal_overview,
    month_summary, objective_completion_counts, rating_trend, week_summary,
    MAX_GOAL_FREQUENCY_DAYS,
};
use crate::storage::{export_file_name, export_json, import_json};
use crate::todos::{filter_todos, todo_from_task, toggle_completed, TodoFilter};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::info;
use uuid::Uuid;

/// Widest span, in days, that the range endpoints accept.
pub const MAX_RANGE_DAYS: i64 = 366;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.read().await;
    let view = build_day_view(&data, today());
    let balance = compute_balance(&data.ratings, &data.redemptions);
    Html(render_index(&data, &view, &balance))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    let data = state.read().await;
    Ok(Json(build_day_view(&data, date)))
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Schedule,
    Recurring,
    Record,
}

enum SlotChange {
    Set(Vec<String>),
    Toggle(String),
}

pub async fn put_schedule_hour(
    State(state): State<AppState>,
    Path((date, hour)): Path<(String, u8)>,
    Json(payload): Json<HourTasksRequest>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    change_slot(&state, Slot::Schedule, date, hour, SlotChange::Set(payload.task_ids)).await
}

pub async fn toggle_schedule_hour(
    State(state): State<AppState>,
    Path((date, hour)): Path<(String, u8)>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    change_slot(&state, Slot::Schedule, date, hour, SlotChange::Toggle(payload.task_id)).await
}

pub async fn put_recurring_hour(
    State(state): State<AppState>,
    Path(hour): Path<u8>,
    Json(payload): Json<HourTasksRequest>,
) -> Result<Json<DayView>, AppError> {
    change_slot(&state, Slot::Recurring, today(), hour, SlotChange::Set(payload.task_ids)).await
}

pub async fn toggle_recurring_hour(
    State(state): State<AppState>,
    Path(hour): Path<u8>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayView>, AppError> {
    change_slot(&state, Slot::Recurring, today(), hour, SlotChange::Toggle(payload.task_id)).await
}

pub async fn put_record_hour(
    State(state): State<AppState>,
    Path((date, hour)): Path<(String, u8)>,
    Json(payload): Json<HourTasksRequest>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    change_slot(&state, Slot::Record, date, hour, SlotChange::Set(payload.task_ids)).await
}

pub async fn toggle_record_hour(
    State(state): State<AppState>,
    Path((date, hour)): Path<(String, u8)>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<DayView>, AppError> {
    let date = parse_date(&date)?;
    change_slot(&state, Slot::Record, date, hour, SlotChange::Toggle(payload.task_id)).await
}

async fn change_slot(
    state: &AppState,
    slot: Slot,
    date: NaiveDate,
    hour: u8,
    change: SlotChange,
) -> Result<Json<DayView>, AppError> {
    if !is_valid_hour(hour) {
        return Err(AppError::bad_request("hour must be between 0 and 23"));
    }
    let key = date_key(date);

    let view = state
        .commit(|data| {
            let current = match slot {
                Slot::Schedule => data.schedule.get(&key).map(|d| d.tasks_at(hour)),
                Slot::Recurring => data.recurring_schedule.get(&hour).map(Vec::as_slice),
                Slot::Record => data.records.get(&key).map(|d| d.tasks_at(hour)),
            }
            .unwrap_or(&[]);

            let task_ids = match &change {
                SlotChange::Set(ids) => ids.clone(),
                SlotChange::Toggle(id) => toggle_capped(current, id, MAX_TASKS_PER_HOUR),
            };

            let next = match slot {
                Slot::Schedule => data.with_schedule_hour(&key, hour, task_ids),
                Slot::Recurring => data.with_recurring_hour(hour, task_ids),
                Slot::Record => data.with_record_hour(&key, hour, task_ids),
            };
            let view = build_day_view(&next, date);
            Ok((next, view))
        })
        .await?;

    Ok(Json(view))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RangeStatsResponse>, AppError> {
    let (start, end) = parse_range(&query)?;
    let data = state.read().await;
    let tasks = aggregate_range(
        &data.tasks,
        &data.records,
        &data.schedule,
        &data.recurring_schedule,
        start,
        end,
    );
    Ok(Json(range_response(start, end, tasks)))
}

pub async fn get_week_stats(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<RangeStatsResponse>, AppError> {
    let date = date_or_today(query.date.as_deref())?;
    let data = state.read().await;
    let (start, end, tasks) = week_summary(
        &data.tasks,
        &data.records,
        &data.schedule,
        &data.recurring_schedule,
        date,
    );
    Ok(Json(range_response(start, end, tasks)))
}

pub async fn get_month_stats(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<RangeStatsResponse>, AppError> {
    let date = date_or_today(query.date.as_deref())?;
    let data = state.read().await;
    let (start, end, tasks) = month_summary(
        &data.tasks,
        &data.records,
        &data.schedule,
        &data.recurring_schedule,
        date,
    );
    Ok(Json(range_response(start, end, tasks)))
}

pub async fn get_matrix(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<DayColumn>>, AppError> {
    let (start, end) = parse_range(&query)?;
    let data = state.read().await;
    Ok(Json(daily_matrix(
        &data.tasks,
        &data.records,
        &data.schedule,
        &data.recurring_schedule,
        start,
        end,
    )))
}

pub async fn get_goals(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<TaskGoal>>, AppError> {
    let date = date_or_today(query.date.as_deref())?;
    let data = state.read().await;
    Ok(Json(goal_overview(&data.tasks, &data.records, date)))
}

pub async fn get_points(State(state): State<AppState>) -> Json<Balance> {
    let data = state.read().await;
    Json(compute_balance(&data.ratings, &data.redemptions))
}

pub async fn redeem(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<Balance>, AppError> {
    let balance = state
        .commit(|data| {
            let item = data
                .shop_items
                .iter()
                .find(|item| item.id == payload.shop_item_id)
                .ok_or_else(|| AppError::not_found("unknown shop item"))?;

            let balance = compute_balance(&data.ratings, &data.redemptions);
            if !can_afford(&balance, item.cost) {
                return Err(AppError::bad_request("not enough points"));
            }

            let mut next = data.clone();
            next.redemptions.insert(0, redemption_for(item, Local::now()));
            info!(item = item.name.as_str(), cost = item.cost, "points redeemed");
            let balance = compute_balance(&next.ratings, &next.redemptions);
            Ok((next, balance))
        })
        .await?;

    Ok(Json(balance))
}

pub async fn put_rating(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(rating): Json<DayRating>,
) -> Result<Json<DayRating>, AppError> {
    let key = date_key(parse_date(&date)?);
    if rating.scores.values().any(|score| !(-2..=2).contains(score)) {
        return Err(AppError::bad_request("scores must be between -2 and 2"));
    }

    let saved = state
        .commit(|data| {
            let mut next = data.clone();
            next.ratings.insert(key.clone(), rating.clone());
            Ok((next, rating.clone()))
        })
        .await?;

    Ok(Json(saved))
}

pub async fn create_rating_item(
    State(state): State<AppState>,
    Json(payload): Json<RatingItemRequest>,
) -> Result<Json<RatingItem>, AppError> {
    let item = rating_item(Uuid::new_v4().to_string(), payload)?;
    let created = state
        .commit(|data| {
            let mut next = data.clone();
            next.rating_items.push(item.clone());
            Ok((next, item.clone()))
        })
        .await?;

    Ok(Json(created))
}

pub async fn update_rating_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RatingItemRequest>,
) -> Result<Json<RatingItem>, AppError> {
    let item = rating_item(id, payload)?;
    let updated = state
        .commit(|data| {
            let mut next = data.clone();
            let slot = next
                .rating_items
                .iter_mut()
                .find(|existing| existing.id == item.id)
                .ok_or_else(|| AppError::not_found("unknown rating item"))?;
            *slot = item.clone();
            Ok((next, item.clone()))
        })
        .await?;

    Ok(Json(updated))
}

/// Past scores recorded under the item stay in their ratings and keep
/// counting toward the balance.
pub async fn delete_rating_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .commit(|data| {
            if !data.rating_items.iter().any(|item| item.id == id) {
                return Err(AppError::not_found("unknown rating item"));
            }
            let mut next = data.clone();
            next.rating_items.retain(|item| item.id != id);
            Ok((next, ()))
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_shop_item(
    State(state): State<AppState>,
    Json(payload): Json<ShopItemRequest>,
) -> Result<Json<ShopItem>, AppError> {
    let item = shop_item(Uuid::new_v4().to_string(), payload)?;
    let created = state
        .commit(|data| {
            let mut next = data.clone();
            next.shop_items.push(item.clone());
            Ok((next, item.clone()))
        })
        .await?;

    Ok(Json(created))
}

pub async fn update_shop_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ShopItemRequest>,
) -> Result<Json<ShopItem>, AppError> {
    let item = shop_item(id, payload)?;
    let updated = state
        .commit(|data| {
            let mut next = data.clone();
            let slot = next
                .shop_items
                .iter_mut()
                .find(|existing| existing.id == item.id)
                .ok_or_else(|| AppError::not_found("unknown shop item"))?;
            *slot = item.clone();
            Ok((next, item.clone()))
        })
        .await?;

    Ok(Json(updated))
}

/// Redemptions already made keep their own copy of the name and cost.
pub async fn delete_shop_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .commit(|data| {
            if !data.shop_items.iter().any(|item| item.id == id) {
                return Err(AppError::not_found("unknown shop item"));
            }
            let mut next = data.clone();
            next.shop_items.retain(|item| item.id != id);
            Ok((next, ()))
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_rollover_settings(
    State(state): State<AppState>,
    Json(settings): Json<RolloverSettings>,
) -> Result<Json<RolloverSettings>, AppError> {
    let saved = state
        .commit(|data| {
            let mut next = data.clone();
            next.rollover_settings = settings.clone();
            Ok((next, settings.clone()))
        })
        .await?;

    info!(enabled = saved.enabled, max_days = saved.max_days, "rollover settings changed");
    Ok(Json(saved))
}

pub async fn get_rating_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<RatingTrend>, AppError> {
    let date = date_or_today(query.date.as_deref())?;
    let (start, end) = match query.range.as_deref().unwrap_or("week") {
        "week" => week_bounds(date),
        "month" => month_bounds(date),
        _ => return Err(AppError::bad_request("range must be 'week' or 'month'")),
    };
    let data = state.read().await;
    Ok(Json(rating_trend(&data.ratings, start, end)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = Task {
        id: Uuid::new_v4().to_string(),
        name: required(&payload.name, "name")?,
        color: payload.color,
        category: payload.category,
        targets: checked_target(payload.targets)?,
    };

    let created = state
        .commit(|data| {
            let mut next = data.clone();
            if !task.category.is_empty() && !next.category_order.contains(&task.category) {
                next.category_order.push(task.category.clone());
            }
            next.tasks.push(task.clone());
            Ok((next, task.clone()))
        })
        .await?;

    Ok(Json(created))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = Task {
        id,
        name: required(&payload.name, "name")?,
        color: payload.color,
        category: payload.category,
        targets: checked_target(payload.targets)?,
    };

    let updated = state
        .commit(|data| {
            let mut next = data.clone();
            let slot = next
                .tasks
                .iter_mut()
                .find(|existing| existing.id == task.id)
                .ok_or_else(|| AppError::not_found("unknown task"))?;
            *slot = task.clone();
            Ok((next, task.clone()))
        })
        .await?;

    Ok(Json(updated))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .commit(|data| {
            if data.task(&id).is_none() {
                return Err(AppError::not_found("unknown task"));
            }
            Ok((data.without_task(&id), ()))
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_objective(
    State(state): State<AppState>,
    Json(payload): Json<ObjectiveRequest>,
) -> Result<Json<Objective>, AppError> {
    let objective = Objective {
        id: Uuid::new_v4().to_string(),
        title: required(&payload.title, "title")?,
        description: payload.description,
        color: payload.color,
    };

    let created = state
        .commit(|data| {
            let mut next = data.clone();
            next.category_order.push(objective.id.clone());
            next.objectives.push(objective.clone());
            Ok((next, objective.clone()))
        })
        .await?;

    Ok(Json(created))
}

pub async fn update_objective(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ObjectiveRequest>,
) -> Result<Json<Objective>, AppError> {
    let objective = Objective {
        id,
        title: required(&payload.title, "title")?,
        description: payload.description,
        color: payload.color,
    };

    let updated = state
        .commit(|data| {
            let mut next = data.clone();
            let slot = next
                .objectives
                .iter_mut()
                .find(|existing| existing.id == objective.id)
                .ok_or_else(|| AppError::not_found("unknown objective"))?;
            *slot = objective.clone();
            Ok((next, objective.clone()))
        })
        .await?;

    Ok(Json(updated))
}

pub async fn delete_objective(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .commit(|data| {
            if !data.objectives.iter().any(|objective| objective.id == id) {
                return Err(AppError::not_found("unknown objective"));
            }
            let mut next = data.clone();
            next.objectives.retain(|objective| objective.id != id);
            next.category_order.retain(|entry| *entry != id);
            Ok((next, ()))
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<TodoQuery>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let filter = match query.filter.as_deref() {
        None => TodoFilter::All,
        Some(value) => TodoFilter::parse(value)
            .ok_or_else(|| AppError::bad_request("unknown todo filter"))?,
    };
    let data = state.read().await;
    Ok(Json(filter_todos(&data.todos, filter, today())))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let start_date = payload
        .start_date
        .as_deref()
        .map(parse_date)
        .transpose()?
        .map(date_key);
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        title: required(&payload.title, "title")?,
        objective_id: payload.objective_id,
        template_id: None,
        is_frog: payload.is_frog,
        is_completed: false,
        sub_tasks: payload.sub_tasks,
        created_at: Local::now().to_rfc3339(),
        completed_at: None,
        start_date,
    };

    let created = state
        .commit(|data| {
            let mut next = data.clone();
            next.todos.push(todo.clone());
            Ok((next, todo.clone()))
        })
        .await?;

    Ok(Json(created))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Todo>,
) -> Result<Json<Todo>, AppError> {
    let todo = Todo {
        id: id.clone(),
        ..payload
    };
    replace_todo(&state, &id, move |_| todo).await
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let date = today();
    replace_todo(&state, &id, |todo| toggle_completed(todo, date)).await
}

async fn replace_todo<F>(state: &AppState, id: &str, change: F) -> Result<Json<Todo>, AppError>
where
    F: FnOnce(&Todo) -> Todo,
{
    let updated = state
        .commit(|data| {
            let mut next = data.clone();
            let slot = next
                .todos
                .iter_mut()
                .find(|todo| todo.id == id)
                .ok_or_else(|| AppError::not_found("unknown todo"))?;
            let replaced = change(slot);
            *slot = replaced.clone();
            Ok((next, replaced))
        })
        .await?;

    Ok(Json(updated))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .commit(|data| {
            if !data.todos.iter().any(|todo| todo.id == id) {
                return Err(AppError::not_found("unknown todo"));
            }
            let mut next = data.clone();
            next.todos.retain(|todo| todo.id != id);
            Ok((next, ()))
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn todo_from_template(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let date = today();
    let created = state
        .commit(|data| {
            let task = data
                .task(&task_id)
                .ok_or_else(|| AppError::not_found("unknown task"))?;
            let todo = todo_from_task(task, date, Local::now().to_rfc3339());
            let mut next = data.clone();
            next.todos.push(todo.clone());
            Ok((next, todo))
        })
        .await?;

    Ok(Json(created))
}

pub async fn get_heatmap(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<HeatmapResponse>, AppError> {
    let date = date_or_today(query.date.as_deref())?;
    let data = state.read().await;
    Ok(Json(HeatmapResponse {
        month: crate::dates::month_label(date),
        days: completion_heatmap(&data.todos, date),
        objectives: objective_completion_counts(&data.todos, &data.objectives, date),
    }))
}

pub async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.read().await;
    let body = export_json(&data)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(today()));
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// Replaces the whole state with an uploaded export. A rejected document
/// leaves the current state as it was.
pub async fn import_data(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<AppData>, AppError> {
    let imported = import_json(&body)?;
    info!(tasks = imported.tasks.len(), todos = imported.todos.len(), "importing data");
    let data = state.commit(move |_| Ok((imported.clone(), imported))).await?;
    Ok(Json(data))
}

pub async fn reset_data(State(state): State<AppState>) -> Result<Json<AppData>, AppError> {
    let data = state
        .commit(|_| {
            let fresh = AppData::with_defaults();
            Ok((fresh.clone(), fresh))
        })
        .await?;
    Ok(Json(data))
}

pub fn build_day_view(data: &AppData, date: NaiveDate) -> DayView {
    let key = date_key(date);
    let specific = data.schedule.get(&key).cloned().unwrap_or_default();
    let record = data.records.get(&key).cloned().unwrap_or_default();
    DayView {
        plan: resolve_day_schedule(Some(&specific), &data.recurring_schedule),
        actual: aggregate_actual(&record, &data.tasks),
        goals: goal_overview(&data.tasks, &data.records, date),
        rating: data.ratings.get(&key).cloned().unwrap_or_default(),
        date: key,
        specific,
        record,
    }
}

fn range_response(
    start: NaiveDate,
    end: NaiveDate,
    tasks: Vec<crate::models::TaskRangeStats>,
) -> RangeStatsResponse {
    RangeStatsResponse {
        start_date: date_key(start),
        end_date: date_key(end),
        tasks,
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(value).ok_or_else(|| AppError::bad_request("dates must use YYYY-MM-DD"))
}

/// Start and end of a query range, at most [`MAX_RANGE_DAYS`] apart.
fn parse_range(query: &RangeQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    let (start, end) = (parse_date(&query.start)?, parse_date(&query.end)?);
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(AppError::bad_request(format!(
            "range must not exceed {MAX_RANGE_DAYS} days"
        )));
    }
    Ok((start, end))
}

fn date_or_today(value: Option<&str>) -> Result<NaiveDate, AppError> {
    value.map(parse_date).unwrap_or_else(|| Ok(today()))
}

fn checked_target(target: Option<TaskTarget>) -> Result<Option<TaskTarget>, AppError> {
    if let Some(target) = &target {
        if !(1..=MAX_GOAL_FREQUENCY_DAYS).contains(&target.frequency) {
            return Err(AppError::bad_request(format!(
                "frequency must be between 1 and {MAX_GOAL_FREQUENCY_DAYS} days"
            )));
        }
        if !target.value.is_finite() || target.value < 0.0 {
            return Err(AppError::bad_request("target value must not be negative"));
        }
    }
    Ok(target)
}

fn rating_item(id: String, payload: RatingItemRequest) -> Result<RatingItem, AppError> {
    if payload.reasons.keys().any(|score| !(-2..=2).contains(score)) {
        return Err(AppError::bad_request("reasons must be keyed by scores between -2 and 2"));
    }
    Ok(RatingItem {
        id,
        name: required(&payload.name, "name")?,
        reasons: payload.reasons,
    })
}

fn shop_item(id: String, payload: ShopItemRequest) -> Result<ShopItem, AppError> {
    if payload.cost < 0 {
        return Err(AppError::bad_request("cost must not be negative"));
    }
    Ok(ShopItem {
        id,
        name: required(&payload.name, "name")?,
        cost: payload.cost,
        icon: payload.icon,
    })
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
