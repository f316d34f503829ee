use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::kpi::KpiValues;
use crate::model::record::DailyRecord;
use crate::time::week_window;

/// Which area names appear in a weekly breakdown.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AreaKeyPolicy {
    /// Only the areas of the first record in the whole collection. Areas that
    /// show up later are dropped from the totals.
    FirstRecord,
    /// Every area seen in any record inside the week.
    #[default]
    WindowUnion,
}

impl fmt::Display for AreaKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaKeyPolicy::FirstRecord => f.write_str("first-record"),
            AreaKeyPolicy::WindowUnion => f.write_str("window-union"),
        }
    }
}

impl FromStr for AreaKeyPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "first-record" | "first" => Ok(AreaKeyPolicy::FirstRecord),
            "window-union" | "union" => Ok(AreaKeyPolicy::WindowUnion),
            _ => Err(anyhow!("Unknown area key policy: '{}'", s)),
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct WeeklyActual {
    pub per_kpi: KpiValues,
    pub per_area: BTreeMap<String, i64>,
}

pub fn weekly_actual(daily: &[DailyRecord], week_start: NaiveDate) -> WeeklyActual {
    weekly_actual_with(daily, week_start, AreaKeyPolicy::default())
}

pub fn weekly_actual_with(
    daily: &[DailyRecord],
    week_start: NaiveDate,
    policy: AreaKeyPolicy,
) -> WeeklyActual {
    let (start, end) = week_window(week_start);
    let in_week: Vec<&DailyRecord> = daily
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .collect();

    let per_kpi = in_week.iter().map(|r| &r.kpis).sum();

    let mut per_area: BTreeMap<String, i64> = match policy {
        AreaKeyPolicy::FirstRecord => daily
            .first()
            .map(|r| r.areas.keys().map(|a| (a.clone(), 0)).collect())
            .unwrap_or_default(),
        AreaKeyPolicy::WindowUnion => in_week
            .iter()
            .flat_map(|r| r.areas.keys())
            .map(|a| (a.clone(), 0))
            .collect(),
    };

    for record in &in_week {
        for (area, value) in &record.areas {
            if let Some(total) = per_area.get_mut(area) {
                *total = total.saturating_add(*value);
            }
        }
    }

    WeeklyActual { per_kpi, per_area }
}

pub fn monthly_actual(daily: &[DailyRecord], year: i32, month: u32) -> KpiValues {
    daily
        .iter()
        .filter(|r| r.is_in_month(year, month))
        .map(|r| &r.kpis)
        .sum()
}

pub fn yearly_actual(daily: &[DailyRecord], year: i32) -> KpiValues {
    daily
        .iter()
        .filter(|r| r.is_in_year(year))
        .map(|r| &r.kpis)
        .sum()
}
