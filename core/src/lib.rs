pub mod config;
pub mod model;
pub mod repository;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::DashboardConfig;
pub use model::kpi::{Kpi, KpiValues};
pub use model::record::{DailyRecord, MonthlyTarget};
pub use model::snapshot::{DataSet, Snapshot, SnapshotError};
pub use repository::{DataSource, FileDataSource};
pub use time::{format_date, monday_of_current_week, parse_week_input, week_window};
pub use service::aggregator::{monthly_actual, weekly_actual, weekly_actual_with, yearly_actual, AreaKeyPolicy, WeeklyActual};
pub use service::target::{monthly_target, weekly_target_from_monthly, yearly_target};
pub use service::rate::{rate, ProgressTier};
pub use service::session::SessionStore;
pub use service::dto::{AreaBar, DashboardView, KpiCard, PeriodSummary};
pub use usecase::dashboard::{build_view, DashboardUseCase};
