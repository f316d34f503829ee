use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::model::snapshot::Snapshot;
use crate::repository::DataSource;
use crate::service::aggregator::{monthly_actual, weekly_actual_with, yearly_actual, AreaKeyPolicy};
use crate::service::dto::{AreaBar, DashboardView, PeriodSummary};
use crate::service::session::SessionStore;
use crate::service::target::{monthly_target, weekly_target_from_monthly, yearly_target};
use crate::time::{format_date, week_window};

pub struct DashboardUseCase<'a, S: DataSource> {
    session: &'a SessionStore<S>,
    area_keys: AreaKeyPolicy,
}

impl<'a, S: DataSource> DashboardUseCase<'a, S> {
    pub fn new(session: &'a SessionStore<S>, area_keys: AreaKeyPolicy) -> Self {
        Self { session, area_keys }
    }

    /// Everything one render cycle needs for the week containing `week_start`.
    pub fn build(&self, week_start: NaiveDate) -> Result<DashboardView> {
        let snapshot = self.session.snapshot()?;
        Ok(build_view(&snapshot, week_start, self.area_keys))
    }
}

/// Month and year come from the Monday of the week, so a week straddling two
/// months is measured against the month it starts in.
pub fn build_view(snapshot: &Snapshot, week_start: NaiveDate, area_keys: AreaKeyPolicy) -> DashboardView {
    let (start, end) = week_window(week_start);
    let year = start.year();
    let month = start.month();
    let actuals = snapshot.actuals();
    let targets = snapshot.targets();

    let weekly = weekly_actual_with(actuals, start, area_keys);
    let month_target = monthly_target(targets, year, month);
    let week_target = weekly_target_from_monthly(month_target, start);

    if month_target.is_none() {
        debug!(year, month, "no monthly target");
    }

    DashboardView {
        snapshot_id: snapshot.id,
        week_start: start,
        week_end: end,
        period_label: format!("（{} - {}）", format_date(start), format_date(end)),
        year,
        month,
        weekly: PeriodSummary::new(weekly.per_kpi, week_target),
        monthly: PeriodSummary::new(
            monthly_actual(actuals, year, month),
            month_target.map(|t| t.kpis),
        ),
        yearly: PeriodSummary::new(yearly_actual(actuals, year), Some(yearly_target(targets, year))),
        areas: AreaBar::from_totals(&weekly.per_area),
    }
}
