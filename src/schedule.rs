use crate::models::{AppData, DayData, DayMap, Hours};

pub const HOURS_PER_DAY: u8 = 24;
pub const MAX_TASKS_PER_HOUR: usize = 4;

/// Merges a day's own plan with the recurring template.
///
/// Every hour 0-23 is present in the result. Specific ids come first, then
/// recurring ids not already listed. Recurring entries cannot be suppressed
/// for a single day; the merge is additive only.
pub fn resolve_day_schedule(specific: Option<&DayData>, recurring: &Hours) -> DayData {
    let mut hours = Hours::new();
    for hour in 0..HOURS_PER_DAY {
        let own = specific.map(|day| day.tasks_at(hour)).unwrap_or(&[]);
        let repeated = recurring.get(&hour).map(Vec::as_slice).unwrap_or(&[]);

        let mut merged: Vec<String> = Vec::with_capacity(own.len() + repeated.len());
        for id in own.iter().chain(repeated) {
            if !merged.contains(id) {
                merged.push(id.clone());
            }
        }
        hours.insert(hour, merged);
    }
    DayData { hours }
}

pub fn is_valid_hour(hour: u8) -> bool {
    hour < HOURS_PER_DAY
}

/// Returns `hours` with one slot replaced. An empty list drops the slot.
pub fn with_hour(hours: &Hours, hour: u8, task_ids: Vec<String>) -> Hours {
    let mut updated = hours.clone();
    if task_ids.is_empty() {
        updated.remove(&hour);
    } else {
        updated.insert(hour, task_ids);
    }
    updated
}

fn with_day_hour(days: &DayMap, date: &str, hour: u8, task_ids: Vec<String>) -> DayMap {
    let mut updated = days.clone();
    let hours = updated.get(date).map(|day| day.hours.clone()).unwrap_or_default();
    updated.insert(
        date.to_string(),
        DayData {
            hours: with_hour(&hours, hour, task_ids),
        },
    );
    updated
}

/// Appends `id`, evicting the oldest entries so at most `cap` remain.
pub fn push_capped(current: &[String], id: &str, cap: usize) -> Vec<String> {
    let mut next: Vec<String> = current.to_vec();
    next.push(id.to_string());
    let overflow = next.len().saturating_sub(cap);
    next.drain(..overflow);
    next
}

/// Removes `id` if present, otherwise appends it under the cap.
pub fn toggle_capped(current: &[String], id: &str, cap: usize) -> Vec<String> {
    if current.iter().any(|existing| existing == id) {
        current.iter().filter(|existing| *existing != id).cloned().collect()
    } else {
        push_capped(current, id, cap)
    }
}

fn strip_task(hours: &mut Hours, task_id: &str) {
    for ids in hours.values_mut() {
        ids.retain(|id| id != task_id);
    }
    hours.retain(|_, ids| !ids.is_empty());
}

impl AppData {
    pub fn with_schedule_hour(&self, date: &str, hour: u8, task_ids: Vec<String>) -> AppData {
        AppData {
            schedule: with_day_hour(&self.schedule, date, hour, task_ids),
            ..self.clone()
        }
    }

    pub fn with_recurring_hour(&self, hour: u8, task_ids: Vec<String>) -> AppData {
        AppData {
            recurring_schedule: with_hour(&self.recurring_schedule, hour, task_ids),
            ..self.clone()
        }
    }

    pub fn with_record_hour(&self, date: &str, hour: u8, task_ids: Vec<String>) -> AppData {
        AppData {
            records: with_day_hour(&self.records, date, hour, task_ids),
            ..self.clone()
        }
    }

    /// Deletes a task and every reference to it from plans, records and the
    /// recurring template.
    pub fn without_task(&self, task_id: &str) -> AppData {
        let mut next = self.clone();
        next.tasks.retain(|task| task.id != task_id);
        for day in next.schedule.values_mut().chain(next.records.values_mut()) {
            strip_task(&mut day.hours, task_id);
        }
        strip_task(&mut next.recurring_schedule, task_id);
        next
    }
}
