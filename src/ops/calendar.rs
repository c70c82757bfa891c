use chrono::{Datelike, Duration, NaiveDate};
use indexmap::IndexMap;

use crate::model::task::Task;

/// Days of a month view, Sunday through Saturday, padded with the
/// neighbouring months' days so the length is a multiple of 7.
/// Returns an empty grid for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let last = last_day_of_month(first);
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));
    start.iter_days().take_while(|d| *d <= end).collect()
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (y, m) = shift_month(first.year(), first.month(), 1);
    NaiveDate::from_ymd_opt(y, m, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first)
}

/// Bucket tasks by calendar day, one entry per grid day in grid order.
/// Each bucket keeps the list order of `tasks`.
pub fn tasks_by_day<'a>(tasks: &'a [Task], grid: &[NaiveDate]) -> IndexMap<NaiveDate, Vec<&'a Task>> {
    let mut days: IndexMap<NaiveDate, Vec<&Task>> =
        grid.iter().map(|d| (*d, Vec::new())).collect();
    for task in tasks {
        if let Some(bucket) = days.get_mut(&task.date.date()) {
            bucket.push(task);
        }
    }
    days
}

/// Move `delta` months from (`year`, `month`)
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// "February 2026"
pub fn month_title(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d.format("%B %Y").to_string(),
        None => format!("{:04}-{:02}", year, month),
    }
}

/// Parse a `YYYY-MM` month argument
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.trim().split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
