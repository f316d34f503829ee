use chrono::{Datelike, NaiveDate};

use crate::model::kpi::KpiValues;
use crate::model::record::MonthlyTarget;
use crate::service::rate::round_div;
use crate::time::weeks_in_month;

/// First target matching (year, month). Snapshots reject duplicates, so on
/// validated data this is the only match.
pub fn monthly_target(targets: &[MonthlyTarget], year: i32, month: u32) -> Option<&MonthlyTarget> {
    targets.iter().find(|t| t.year == year && t.month == month)
}

pub fn yearly_target(targets: &[MonthlyTarget], year: i32) -> KpiValues {
    targets
        .iter()
        .filter(|t| t.year == year)
        .map(|t| &t.kpis)
        .sum()
}

/// Splits a monthly target evenly over the 7-day spans covering the month of
/// `week_start`. Each KPI is rounded on its own, so the weekly figures need not
/// add back up to the monthly one.
pub fn weekly_target_from_monthly(
    monthly: Option<&MonthlyTarget>,
    week_start: NaiveDate,
) -> Option<KpiValues> {
    let monthly = monthly?;
    let weeks = weeks_in_month(week_start.year(), week_start.month()) as i64;
    Some(monthly.kpis.map(|v| round_div(v, weeks)))
}
