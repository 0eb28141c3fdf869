use crate::dates::{date_key, days_in, month_bounds, parse_date_key, week_bounds};
use crate::models::{
    DayColumn, DayData, DayMap, DayRating, GoalProgress, HeatmapCell, Hours, Objective,
    ObjectiveCount, RatingPoint, RatingTrend, TargetMode, Task, TaskGoal, TaskRangeStats,
    TaskTarget, Todo,
};
use crate::schedule::resolve_day_schedule;
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Longest goal period, in days, a task may be given.
pub const MAX_GOAL_FREQUENCY_DAYS: u32 = 3660;

/// Per-task totals for one recorded day.
///
/// Count-mode tasks gain 1 for every hour they appear in. Everything else is
/// measured in hours: an hour shared by `n` tasks gives each of them `1/n`.
pub fn aggregate_actual(record: &DayData, tasks: &[Task]) -> BTreeMap<String, f64> {
    let modes: HashMap<&str, TargetMode> =
        tasks.iter().map(|task| (task.id.as_str(), task.mode())).collect();

    let mut totals = BTreeMap::new();
    for ids in record.hours.values() {
        if ids.is_empty() {
            continue;
        }
        let share = 1.0 / ids.len() as f64;
        for id in ids {
            let amount = match modes.get(id.as_str()) {
                Some(TargetMode::Count) => 1.0,
                _ => share,
            };
            *totals.entry(id.clone()).or_insert(0.0) += amount;
        }
    }
    totals
}

fn contribution(task: &Task, record: Option<&DayData>) -> f64 {
    record
        .map(|day| {
            aggregate_actual(day, std::slice::from_ref(task))
                .get(&task.id)
                .copied()
                .unwrap_or(0.0)
        })
        .unwrap_or(0.0)
}

fn active_target(task: &Task) -> Option<&TaskTarget> {
    task.targets.as_ref().filter(|target| target.value > 0.0)
}

fn progress(current: f64, target: f64) -> GoalProgress {
    let percentage = if target > 0.0 {
        (current / target * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    GoalProgress {
        current,
        target,
        percentage,
    }
}

/// The even per-day share of a period goal.
pub fn daily_target(target: &TaskTarget) -> f64 {
    target.value / f64::from(target.frequency.max(1))
}

/// Progress toward the full period goal over the `frequency` days ending at
/// `reference`. `None` when the task has no usable goal.
pub fn compute_goal_progress(task: &Task, records: &DayMap, reference: NaiveDate) -> Option<GoalProgress> {
    let target = active_target(task)?;
    let window = u64::from(target.frequency.max(1));
    // Open-ended when the window reaches past the earliest date.
    let first = reference.checked_sub_days(Days::new(window - 1));
    let in_window = |day: NaiveDate| day <= reference && first.is_none_or(|first| day >= first);

    // Walks stored days only; keys that are not canonical dates are skipped.
    let current = records
        .iter()
        .filter(|(key, _)| {
            parse_date_key(key).is_some_and(|day| date_key(day) == **key && in_window(day))
        })
        .map(|(_, day)| contribution(task, Some(day)))
        .sum();

    Some(progress(current, target.value))
}

/// Progress of a single day against the amortized daily share.
pub fn compute_daily_progress(task: &Task, records: &DayMap, date: NaiveDate) -> Option<GoalProgress> {
    let target = active_target(task)?;
    let current = contribution(task, records.get(&date_key(date)));
    Some(progress(current, daily_target(target)))
}

pub fn goal_overview(tasks: &[Task], records: &DayMap, date: NaiveDate) -> Vec<TaskGoal> {
    tasks
        .iter()
        .filter_map(|task| {
            let rolling = compute_goal_progress(task, records, date)?;
            let today = compute_daily_progress(task, records, date)?;
            Some(TaskGoal {
                task_id: task.id.clone(),
                name: task.name.clone(),
                mode: task.mode(),
                rolling,
                today,
            })
        })
        .collect()
}

/// Planned hours against actual totals for every task over `[start, end]`.
///
/// Tasks with neither plan nor record are dropped; the rest are ordered by
/// actual total, highest first, keeping task order on ties.
pub fn aggregate_range(
    tasks: &[Task],
    records: &DayMap,
    schedule: &DayMap,
    recurring: &Hours,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<TaskRangeStats> {
    let mut planned: HashMap<&str, u32> = HashMap::new();
    let mut actual: HashMap<String, f64> = HashMap::new();

    for day in days_in(start, end) {
        let key = date_key(day);
        let plan = resolve_day_schedule(schedule.get(&key), recurring);
        for ids in plan.hours.values() {
            for id in ids {
                if let Some(task) = tasks.iter().find(|task| task.id == *id) {
                    *planned.entry(task.id.as_str()).or_insert(0) += 1;
                }
            }
        }
        if let Some(record) = records.get(&key) {
            for (id, amount) in aggregate_actual(record, tasks) {
                *actual.entry(id).or_insert(0.0) += amount;
            }
        }
    }

    let mut result: Vec<TaskRangeStats> = tasks
        .iter()
        .filter_map(|task| {
            let planned_total = planned.get(task.id.as_str()).copied().unwrap_or(0);
            let actual_total = actual.get(&task.id).copied().unwrap_or(0.0);
            if planned_total == 0 && actual_total <= 0.0 {
                return None;
            }
            let exec_ratio = if planned_total > 0 {
                actual_total / f64::from(planned_total) * 100.0
            } else {
                100.0
            };
            Some(TaskRangeStats {
                task: task.clone(),
                planned_total,
                actual_total,
                exec_ratio,
            })
        })
        .collect();

    result.sort_by(|a, b| b.actual_total.total_cmp(&a.actual_total));
    result
}

pub fn week_summary(
    tasks: &[Task],
    records: &DayMap,
    schedule: &DayMap,
    recurring: &Hours,
    date: NaiveDate,
) -> (NaiveDate, NaiveDate, Vec<TaskRangeStats>) {
    let (start, end) = week_bounds(date);
    (start, end, aggregate_range(tasks, records, schedule, recurring, start, end))
}

pub fn month_summary(
    tasks: &[Task],
    records: &DayMap,
    schedule: &DayMap,
    recurring: &Hours,
    date: NaiveDate,
) -> (NaiveDate, NaiveDate, Vec<TaskRangeStats>) {
    let (start, end) = month_bounds(date);
    (start, end, aggregate_range(tasks, records, schedule, recurring, start, end))
}

/// One column per day, each holding that day's range stats.
pub fn daily_matrix(
    tasks: &[Task],
    records: &DayMap,
    schedule: &DayMap,
    recurring: &Hours,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DayColumn> {
    days_in(start, end)
        .map(|day| DayColumn {
            date: date_key(day),
            tasks: aggregate_range(tasks, records, schedule, recurring, day, day),
        })
        .collect()
}

fn completion_day(todo: &Todo) -> Option<&str> {
    if !todo.is_completed {
        return None;
    }
    todo.completed_at.as_deref().and_then(|stamp| stamp.get(..10))
}

/// Completed-todo counts for every day of the month containing `date`.
pub fn completion_heatmap(todos: &[Todo], date: NaiveDate) -> Vec<HeatmapCell> {
    let (start, end) = month_bounds(date);
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for day in todos.iter().filter_map(completion_day) {
        *counts.entry(day).or_insert(0) += 1;
    }

    days_in(start, end)
        .map(|day| {
            let key = date_key(day);
            let count = counts.get(key.as_str()).copied().unwrap_or(0);
            HeatmapCell { date: key, count }
        })
        .collect()
}

const UNCATEGORIZED_COLOR: &str = "#cbd5e1";

/// Completions in `date`'s month grouped by objective.
pub fn objective_completion_counts(
    todos: &[Todo],
    objectives: &[Objective],
    date: NaiveDate,
) -> Vec<ObjectiveCount> {
    let (start, end) = month_bounds(date);
    let (start, end) = (date_key(start), date_key(end));

    let mut counts: Vec<ObjectiveCount> = objectives
        .iter()
        .map(|objective| ObjectiveCount {
            objective_id: objective.id.clone(),
            title: objective.title.clone(),
            color: objective.color.clone(),
            count: 0,
        })
        .collect();
    let mut uncategorized = ObjectiveCount {
        objective_id: "none".to_string(),
        title: "Uncategorized".to_string(),
        color: UNCATEGORIZED_COLOR.to_string(),
        count: 0,
    };

    for todo in todos {
        let Some(day) = completion_day(todo) else {
            continue;
        };
        if day < start.as_str() || day > end.as_str() {
            continue;
        }
        match counts.iter_mut().find(|c| c.objective_id == todo.objective_id) {
            Some(bucket) => bucket.count += 1,
            None => uncategorized.count += 1,
        }
    }

    if uncategorized.count > 0 {
        counts.push(uncategorized);
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Daily score sums for `[start, end]` plus the period summary.
pub fn rating_trend(
    ratings: &BTreeMap<String, DayRating>,
    start: NaiveDate,
    end: NaiveDate,
) -> RatingTrend {
    let days: Vec<RatingPoint> = days_in(start, end)
        .map(|day| {
            let key = date_key(day);
            let total = ratings.get(&key).map(DayRating::total);
            RatingPoint { date: key, total }
        })
        .collect();

    let total: i64 = days.iter().filter_map(|point| point.total).sum();
    let days_rated = days.iter().filter(|point| point.total.is_some()).count() as u32;
    let average = if days_rated > 0 {
        total as f64 / f64::from(days_rated)
    } else {
        0.0
    };

    RatingTrend {
        start_date: date_key(start),
        end_date: date_key(end),
        days,
        total,
        days_rated,
        average,
    }
}
