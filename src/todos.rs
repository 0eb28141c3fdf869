use crate::dates::{date_key, month_bounds, parse_date_key, week_bounds};
use crate::models::{Task, Todo};
use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoFilter {
    Unfinished,
    Today,
    Week,
    Month,
    All,
}

impl TodoFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "unfinished" => Some(Self::Unfinished),
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Moves recently missed todos onto `today`.
///
/// Incomplete todos dated before `today` by at most `max_days` follow the
/// current day. Older ones stay where they are.
pub fn rollover_todos(todos: &[Todo], today: NaiveDate, max_days: u32) -> Vec<Todo> {
    todos
        .iter()
        .map(|todo| {
            if todo.is_completed {
                return todo.clone();
            }
            let Some(start) = todo.start_date.as_deref().and_then(parse_date_key) else {
                return todo.clone();
            };
            let diff_days = (today - start).num_days();
            if start < today && diff_days <= i64::from(max_days) {
                Todo {
                    start_date: Some(date_key(today)),
                    ..todo.clone()
                }
            } else {
                todo.clone()
            }
        })
        .collect()
}

pub fn filter_todos(todos: &[Todo], filter: TodoFilter, today: NaiveDate) -> Vec<Todo> {
    let within = |todo: &Todo, (start, end): (NaiveDate, NaiveDate)| {
        todo.start_date
            .as_deref()
            .and_then(parse_date_key)
            .is_some_and(|date| date >= start && date <= end)
    };

    todos
        .iter()
        .filter(|todo| match filter {
            TodoFilter::All => true,
            TodoFilter::Unfinished => {
                !todo.is_completed
                    && todo
                        .start_date
                        .as_deref()
                        .map(|key| parse_date_key(key).is_some_and(|date| date < today))
                        .unwrap_or(true)
            }
            TodoFilter::Today => within(todo, (today, today)),
            TodoFilter::Week => within(todo, week_bounds(today)),
            TodoFilter::Month => within(todo, month_bounds(today)),
        })
        .cloned()
        .collect()
}

pub fn toggle_completed(todo: &Todo, today: NaiveDate) -> Todo {
    let is_completed = !todo.is_completed;
    Todo {
        is_completed,
        completed_at: is_completed.then(|| date_key(today)),
        ..todo.clone()
    }
}

/// Instantiates a todo for `today` from a reusable task.
pub fn todo_from_task(task: &Task, today: NaiveDate, created_at: String) -> Todo {
    let objective_id = if task.category.is_empty() {
        crate::models::no_objective()
    } else {
        task.category.clone()
    };
    Todo {
        id: Uuid::new_v4().to_string(),
        title: task.name.clone(),
        objective_id,
        template_id: Some(task.id.clone()),
        is_frog: false,
        is_completed: false,
        sub_tasks: Vec::new(),
        created_at,
        completed_at: None,
        start_date: Some(date_key(today)),
    }
}
