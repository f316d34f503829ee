use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::record::{DailyRecord, MonthlyTarget};

/// What a data source hands over in one fetch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    #[serde(default)]
    pub actuals: Vec<DailyRecord>,
    #[serde(default)]
    pub targets: Vec<MonthlyTarget>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("target month out of range: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("duplicate target for {year}-{month:02}")]
    DuplicateTarget { year: i32, month: u32 },
}

/// A validated, immutable copy of one fetch. Replaced wholesale, never edited.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: Uuid,
    pub loaded_at: DateTime<Utc>,
    actuals: Vec<DailyRecord>,
    targets: Vec<MonthlyTarget>,
}

impl Snapshot {
    pub fn new(data: DataSet) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        for t in &data.targets {
            if !(1..=12).contains(&t.month) {
                return Err(SnapshotError::InvalidMonth { year: t.year, month: t.month });
            }
            if !seen.insert((t.year, t.month)) {
                return Err(SnapshotError::DuplicateTarget { year: t.year, month: t.month });
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            loaded_at: Utc::now(),
            actuals: data.actuals,
            targets: data.targets,
        })
    }

    pub fn actuals(&self) -> &[DailyRecord] {
        &self.actuals
    }

    pub fn targets(&self) -> &[MonthlyTarget] {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_target() {
        let data = DataSet {
            actuals: vec![],
            targets: vec![MonthlyTarget::new(2024, 1), MonthlyTarget::new(2024, 1)],
        };
        assert_eq!(
            Snapshot::new(data).unwrap_err(),
            SnapshotError::DuplicateTarget { year: 2024, month: 1 }
        );
    }

    #[test]
    fn test_rejects_invalid_month() {
        let data = DataSet {
            actuals: vec![],
            targets: vec![MonthlyTarget::new(2024, 13)],
        };
        assert_eq!(
            Snapshot::new(data).unwrap_err(),
            SnapshotError::InvalidMonth { year: 2024, month: 13 }
        );
    }

    #[test]
    fn test_accepts_same_month_in_different_years() {
        let data = DataSet {
            actuals: vec![],
            targets: vec![MonthlyTarget::new(2024, 1), MonthlyTarget::new(2025, 1)],
        };
        let snapshot = Snapshot::new(data).unwrap();
        assert_eq!(snapshot.targets().len(), 2);
    }

    #[test]
    fn test_empty_data_set_parses() {
        let data: DataSet = serde_json::from_str("{}").unwrap();
        assert!(Snapshot::new(data).is_ok());
    }
}
