pub mod de;
pub mod kpi;
pub mod record;
pub mod snapshot;
