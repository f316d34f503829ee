use chrono::{Duration, NaiveDate};
use kpi_dashboard_core::{AreaKeyPolicy, DashboardUseCase, DashboardView, DataSource, SessionStore};
use tracing::warn;

pub struct App<'a, S: DataSource> {
    pub store: &'a SessionStore<S>,
    pub area_keys: AreaKeyPolicy,
    pub home_week: NaiveDate,
    pub week_start: NaiveDate,
    pub view: Option<DashboardView>,
    pub status: Option<String>,
}

impl<'a, S: DataSource> App<'a, S> {
    pub fn new(store: &'a SessionStore<S>, area_keys: AreaKeyPolicy, week_start: NaiveDate) -> Self {
        let mut app = App {
            store,
            area_keys,
            home_week: week_start,
            week_start,
            view: None,
            status: None,
        };
        app.reload();
        app
    }

    pub fn next_week(&mut self) {
        self.week_start += Duration::weeks(1);
        self.reload();
    }

    pub fn previous_week(&mut self) {
        self.week_start -= Duration::weeks(1);
        self.reload();
    }

    pub fn home(&mut self) {
        self.week_start = self.home_week;
        self.reload();
    }

    /// Fetches a fresh snapshot, keeping the old one if the fetch fails.
    pub fn refresh(&mut self) {
        match self.store.refresh() {
            Ok(_) => {
                self.reload();
                if self.status.is_none() {
                    self.status = Some("Refreshed".to_string());
                }
            }
            Err(e) => {
                warn!("refresh failed: {:#}", e);
                self.status = Some(format!("Refresh failed: {}", e));
            }
        }
    }

    fn reload(&mut self) {
        match DashboardUseCase::new(self.store, self.area_keys).build(self.week_start) {
            Ok(view) => {
                self.week_start = view.week_start;
                self.view = Some(view);
                self.status = None;
            }
            Err(e) => {
                self.view = None;
                self.status = Some(format!("{:#}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use kpi_dashboard_core::{DailyRecord, DataSet, Kpi, MonthlyTarget};

    struct FixedSource;

    impl DataSource for FixedSource {
        fn fetch(&self) -> Result<DataSet> {
            let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
            Ok(DataSet {
                actuals: vec![DailyRecord::new(day).with_kpi(Kpi::Contracts, 2)],
                targets: vec![MonthlyTarget::new(2024, 1).with_kpi(Kpi::Contracts, 10)],
            })
        }
    }

    #[test]
    fn test_week_navigation() {
        let store = SessionStore::new(FixedSource);
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut app = App::new(&store, AreaKeyPolicy::default(), monday);

        let contracts = |app: &App<FixedSource>| {
            app.view.as_ref().unwrap().weekly.card(Kpi::Contracts).unwrap().actual
        };
        assert_eq!(contracts(&app), 2);

        app.next_week();
        assert_eq!(app.week_start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(contracts(&app), 0);

        app.previous_week();
        app.previous_week();
        assert_eq!(app.week_start, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());

        app.home();
        assert_eq!(app.week_start, monday);
        assert_eq!(contracts(&app), 2);
    }

    #[test]
    fn test_refresh_sets_status() {
        let store = SessionStore::new(FixedSource);
        let mut app = App::new(&store, AreaKeyPolicy::default(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        app.refresh();
        assert_eq!(app.status.as_deref(), Some("Refreshed"));
    }
}
