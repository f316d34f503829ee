use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use crate::model::kpi::Kpi;
use crate::model::record::{DailyRecord, MonthlyTarget};
use crate::model::snapshot::DataSet;
use crate::repository::traits::DataSource;

const DEFAULT_FILE_NAME: &str = "data.json";
const SAMPLE_AREAS: [&str; 3] = ["渋谷", "新宿", "池袋"];

/// Reads a `{ "actuals": [...], "targets": [...] }` JSON document.
#[derive(Clone, Debug)]
pub struct FileDataSource {
    file_path: PathBuf,
}

impl FileDataSource {
    pub fn new(file_path: PathBuf) -> Self {
        FileDataSource { file_path }
    }

    /// `~/.kpi-dashboard/data.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::config::default_dir()?.join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes a small demo data set covering the year of `today`.
    pub fn write_sample(path: &Path, today: NaiveDate) -> Result<DataSet> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = sample_data_set(today);
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        Ok(data)
    }
}

impl DataSource for FileDataSource {
    fn fetch(&self) -> Result<DataSet> {
        if !self.file_path.exists() {
            return Err(anyhow!(
                "Data file not found: {} (run `kpi init` to create a sample)",
                self.file_path.display()
            ));
        }
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let data: DataSet = serde_json::from_reader(reader)
            .with_context(|| format!("Invalid data file: {}", self.file_path.display()))?;
        debug!(path = %self.file_path.display(), "read data file");
        Ok(data)
    }
}

// Deterministic pseudo-random counts so the sample looks lived in.
fn sample_data_set(today: NaiveDate) -> DataSet {
    let year = today.year();
    let mut actuals = Vec::new();
    let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
    let mut seed: u64 = 0x2545_f491;

    while day <= today {
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        let mut record = DailyRecord::new(day);
        for kpi in Kpi::ALL {
            let spread = match kpi {
                Kpi::NewListings => 6,
                Kpi::ActiveListings => 20,
                Kpi::Viewings => 8,
                Kpi::Applications => 4,
                Kpi::Contracts => 3,
            };
            record.kpis[kpi] = (next() % spread) as i64;
        }
        for area in SAMPLE_AREAS {
            record.areas.insert(area.to_string(), (next() % 5) as i64);
        }
        actuals.push(record);
        day += Duration::days(1);
    }

    let targets = (1..=12)
        .map(|month| {
            MonthlyTarget::new(year, month)
                .with_kpi(Kpi::NewListings, 80)
                .with_kpi(Kpi::ActiveListings, 300)
                .with_kpi(Kpi::Viewings, 120)
                .with_kpi(Kpi::Applications, 50)
                .with_kpi(Kpi::Contracts, 30)
        })
        .collect();

    DataSet { actuals, targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::Snapshot;
    use uuid::Uuid;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kpi-dashboard-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_fetch_reads_source_shape() {
        let dir = scratch_dir();
        let path = dir.join("data.json");
        fs::write(
            &path,
            r#"{
                "actuals": [
                    {"date": "2024-01-01", "契約数": 1, "areas": {"A": 1}},
                    {"date": "2024-01-02", "契約数": 2, "areas": {"A": 1}}
                ],
                "targets": [{"year": 2024, "month": 1, "契約数": 30}]
            }"#,
        )
        .unwrap();

        let data = FileDataSource::new(path).fetch().unwrap();
        assert_eq!(data.actuals.len(), 2);
        assert_eq!(data.targets[0].kpis[Kpi::Contracts], 30);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_fetch_missing_file() {
        let dir = scratch_dir();
        let result = FileDataSource::new(dir.join("nope.json")).fetch();
        assert!(result.is_err());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_fetch_malformed_date() {
        let dir = scratch_dir();
        let path = dir.join("data.json");
        fs::write(&path, r#"{"actuals": [{"date": "not a date"}], "targets": []}"#).unwrap();
        assert!(FileDataSource::new(path).fetch().is_err());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_sample_round_trips_through_fetch() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("data.json");
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let written = FileDataSource::write_sample(&path, today).unwrap();
        let read = FileDataSource::new(path).fetch().unwrap();

        assert_eq!(read, written);
        assert_eq!(read.actuals.len(), 75);
        assert_eq!(read.targets.len(), 12);
        assert!(Snapshot::new(read).is_ok());
        fs::remove_dir_all(dir).ok();
    }
}
