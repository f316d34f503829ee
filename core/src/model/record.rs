use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::de;
use crate::model::kpi::{Kpi, KpiValues};

/// One calendar day's actuals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyRecord {
    #[serde(deserialize_with = "de::record_date")]
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kpis: KpiValues,
    #[serde(default, deserialize_with = "de::area_counts")]
    pub areas: BTreeMap<String, i64>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            kpis: KpiValues::zero(),
            areas: BTreeMap::new(),
        }
    }

    pub fn with_kpi(mut self, kpi: Kpi, value: i64) -> Self {
        self.kpis[kpi] = value;
        self
    }

    pub fn with_area(mut self, area: &str, value: i64) -> Self {
        self.areas.insert(area.to_string(), value);
        self
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    pub fn is_in_year(&self, year: i32) -> bool {
        self.date.year() == year
    }
}

/// Planning target for one calendar month.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyTarget {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub kpis: KpiValues,
}

impl MonthlyTarget {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            kpis: KpiValues::zero(),
        }
    }

    pub fn with_kpi(mut self, kpi: Kpi, value: i64) -> Self {
        self.kpis[kpi] = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_record_from_source_row() {
        let json = r#"{
            "date": "2024-01-05",
            "新規物件数": 2,
            "契約数": "1",
            "内覧数": null,
            "areas": {"渋谷": 3, "新宿": ""}
        }"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(record.kpis[Kpi::NewListings], 2);
        assert_eq!(record.kpis[Kpi::Contracts], 1);
        assert_eq!(record.kpis[Kpi::Viewings], 0);
        assert_eq!(record.kpis[Kpi::Applications], 0);
        assert_eq!(record.areas.get("渋谷"), Some(&3));
        assert_eq!(record.areas.get("新宿"), Some(&0));
    }

    #[test]
    fn test_daily_record_without_areas() {
        let record: DailyRecord = serde_json::from_str(r#"{"date": "2024/02/01"}"#).unwrap();
        assert!(record.areas.is_empty());
        assert_eq!(record.kpis, KpiValues::zero());
    }

    #[test]
    fn test_daily_record_rejects_bad_date() {
        let result = serde_json::from_str::<DailyRecord>(r#"{"date": "yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_monthly_target_from_source_row() {
        let json = r#"{"year": 2024, "month": 1, "契約数": 30, "内覧数": 120}"#;
        let target: MonthlyTarget = serde_json::from_str(json).unwrap();
        assert_eq!(target.year, 2024);
        assert_eq!(target.month, 1);
        assert_eq!(target.kpis[Kpi::Contracts], 30);
        assert_eq!(target.kpis[Kpi::Viewings], 120);
        assert_eq!(target.kpis[Kpi::NewListings], 0);
    }
}
