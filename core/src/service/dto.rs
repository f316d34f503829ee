use serde::Serialize;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::kpi::{Kpi, KpiValues};
use crate::service::rate::{bar_percent, rate, ProgressTier};

/// One KPI as a dashboard card shows it. A missing target is rendered as 0.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub kpi: Kpi,
    pub actual: i64,
    pub target: i64,
    pub rate: i64,
    pub tier: ProgressTier,
    pub bar_percent: u16,
}

impl KpiCard {
    pub fn new(kpi: Kpi, actual: i64, target: i64) -> Self {
        let rate = rate(actual, target);
        Self {
            kpi,
            actual,
            target,
            rate,
            tier: ProgressTier::from_rate(rate),
            bar_percent: bar_percent(rate),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub actual: KpiValues,
    pub target: Option<KpiValues>,
    pub cards: Vec<KpiCard>,
}

impl PeriodSummary {
    pub fn new(actual: KpiValues, target: Option<KpiValues>) -> Self {
        let cards = Kpi::ALL
            .into_iter()
            .map(|k| KpiCard::new(k, actual[k], target.map(|t| t[k]).unwrap_or(0)))
            .collect();
        Self { actual, target, cards }
    }

    pub fn card(&self, kpi: Kpi) -> Option<&KpiCard> {
        self.cards.iter().find(|c| c.kpi == kpi)
    }
}

/// Area total with its bar length relative to the largest area.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AreaBar {
    pub area: String,
    pub value: i64,
    pub ratio: f64,
}

impl AreaBar {
    pub fn from_totals<'a>(totals: impl IntoIterator<Item = (&'a String, &'a i64)>) -> Vec<AreaBar> {
        let totals: Vec<_> = totals.into_iter().collect();
        let max = totals.iter().map(|(_, v)| **v).max().unwrap_or(0).max(1);
        totals
            .into_iter()
            .map(|(area, value)| AreaBar {
                area: area.clone(),
                value: *value,
                ratio: *value as f64 / max as f64 * 100.0,
            })
            .collect()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub snapshot_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub period_label: String,
    pub year: i32,
    pub month: u32,
    pub weekly: PeriodSummary,
    pub monthly: PeriodSummary,
    pub yearly: PeriodSummary,
    pub areas: Vec<AreaBar>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_card_without_target() {
        let card = KpiCard::new(Kpi::Contracts, 4, 0);
        assert_eq!(card.rate, 0);
        assert_eq!(card.tier, ProgressTier::Behind);
        assert_eq!(card.bar_percent, 0);
    }

    #[test]
    fn test_card_over_target_keeps_rate() {
        let card = KpiCard::new(Kpi::Viewings, 15, 10);
        assert_eq!(card.rate, 150);
        assert_eq!(card.bar_percent, 100);
        assert_eq!(card.tier, ProgressTier::Achieved);
    }

    #[test]
    fn test_period_summary_has_every_kpi() {
        let summary = PeriodSummary::new(KpiValues::zero(), None);
        assert_eq!(summary.cards.len(), Kpi::ALL.len());
        assert!(summary.cards.iter().all(|c| c.target == 0));
    }

    #[test]
    fn test_area_bars_relative_to_max() {
        let mut totals = BTreeMap::new();
        totals.insert("A".to_string(), 5);
        totals.insert("B".to_string(), 10);
        let bars = AreaBar::from_totals(&totals);
        assert_eq!(bars[0].ratio, 50.0);
        assert_eq!(bars[1].ratio, 100.0);
    }

    #[test]
    fn test_area_bars_all_zero() {
        let mut totals = BTreeMap::new();
        totals.insert("A".to_string(), 0);
        let bars = AreaBar::from_totals(&totals);
        assert_eq!(bars[0].ratio, 0.0);
    }
}
