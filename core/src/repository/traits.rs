use crate::model::snapshot::DataSet;
use anyhow::Result;

pub trait DataSource {
    /// Everything the dashboard needs for one session, in one call.
    fn fetch(&self) -> Result<DataSet>;
}
