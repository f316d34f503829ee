use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use anyhow::{anyhow, Result};

const DISPLAY_FORMAT: &str = "%Y/%m/%d";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Monday at or before `anchor` through the following Sunday, inclusive.
pub fn week_window(anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Sunday counts as the last day of the preceding Monday's week.
pub fn monday_of_current_week(today: NaiveDate) -> NaiveDate {
    week_window(today).0
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DISPLAY_FORMAT).to_string()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Number of 7-day spans needed to cover the month: 28 days → 4, 29..=31 → 5.
pub fn weeks_in_month(year: i32, month: u32) -> u32 {
    days_in_month(year, month).div_ceil(7)
}

/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, or an RFC 3339 timestamp (taken as the local date).
pub fn parse_record_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Local).date_naive());
    }
    Err(anyhow!("Could not parse date: {}", input))
}

/// Resolves what a user typed for "which week" into that week's Monday.
pub fn parse_week_input(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let this_monday = monday_of_current_week(today);

    // 1. Reserved keywords
    match input.trim().to_lowercase().as_str() {
        "" | "this" | "today" | "tod" => return Ok(this_monday),
        "last" | "prev" => return Ok(this_monday - Duration::weeks(1)),
        "next" => return Ok(this_monday + Duration::weeks(1)),
        _ => {}
    }

    // 2. Relative format (+Nw, -Nw, +Nd)
    if let Some(target) = parse_relative(input.trim(), today)? {
        return Ok(monday_of_current_week(target));
    }

    // 3. Plain dates
    let date = parse_record_date(input)?;
    if !has_full_week(date) {
        return Err(anyhow!("Date out of range: {}", input.trim()));
    }
    Ok(monday_of_current_week(date))
}

// The whole Monday..Sunday span around `d` must be representable.
fn has_full_week(d: NaiveDate) -> bool {
    let margin = Duration::days(7);
    d.checked_sub_signed(margin).is_some() && d.checked_add_signed(margin).is_some()
}

fn parse_relative(input: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    let sign = match input.chars().next() {
        Some('+') => 1i64,
        Some('-') => -1,
        _ => return Ok(None),
    };
    if input.len() < 3 || !input.is_ascii() {
        return Err(anyhow!("Invalid relative format: {}", input));
    }
    let (num_str, unit) = input[1..].split_at(input.len() - 2);
    let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;
    let out_of_range = || anyhow!("Relative offset out of range: {}", input);
    let count = count.checked_mul(sign).ok_or_else(out_of_range)?;

    let offset = match unit.to_lowercase().as_str() {
        "d" => Duration::try_days(count),
        "w" => Duration::try_weeks(count),
        _ => return Err(anyhow!("Unknown unit in relative time: {}", unit)),
    };
    let target = offset
        .and_then(|o| today.checked_add_signed(o))
        .filter(|d| has_full_week(*d))
        .ok_or_else(out_of_range)?;
    Ok(Some(target))
}
