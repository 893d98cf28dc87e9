//! Partitioned parquet flow store
//!
//! Reads the FIGARO-NAM dataset from its hive-style layout:
//!
//! ```text
//! <root>/base=<year>/ctr=<country>/part-0.parquet
//! ```
//!
//! One partition holds every flow declared by one country for one year.
//! Partitions are read eagerly, one file at a time; a missing partition is
//! not an error and yields an empty frame with the full schema, so
//! aggregation code never branches on presence.

use crate::domain::flow::columns;
use crate::domain::{empty_frame, CountryCode, StoreError};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Read-only handle to the partitioned parquet tree.
#[derive(Debug, Clone)]
pub struct FlowStore {
    root: PathBuf,
}

impl FlowStore {
    /// Opens the store, verifying that the root directory exists.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(StoreError::RootNotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Path of the partition file for a country and year.
    pub fn partition_path(&self, country: &CountryCode, year: i32) -> PathBuf {
        self.root
            .join(format!("base={year}"))
            .join(format!("ctr={}", country.as_str()))
            .join("part-0.parquet")
    }

    /// Loads one partition, or `None` when the partition file is absent.
    ///
    /// The returned frame always carries the declarant (`ctr`) and year
    /// (`base`) columns, reconstructed from the partition path when the
    /// file itself omits them, and the value column cast to `f64`.
    pub fn try_load(
        &self,
        country: &CountryCode,
        year: i32,
    ) -> Result<Option<DataFrame>, StoreError> {
        let path = self.partition_path(country, year);
        if !path.is_file() {
            debug!(country = %country, year, "Partition absent");
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| StoreError::PartitionRead {
            partition: path.display().to_string(),
            message: e.to_string(),
        })?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| StoreError::PartitionRead {
                partition: path.display().to_string(),
                message: e.to_string(),
            })?;

        let df = normalize(df, country, year)?;
        debug!(country = %country, year, rows = df.height(), "Partition loaded");
        Ok(Some(df))
    }

    /// Loads one partition, substituting an empty frame when absent.
    pub fn load(&self, country: &CountryCode, year: i32) -> Result<DataFrame, StoreError> {
        Ok(self.try_load(country, year)?.unwrap_or_else(empty_frame))
    }

    /// Loads and stacks every partition in the store. Used by the
    /// whole-dataset quality scan; prefer the targeted loaders elsewhere.
    pub fn load_all(&self) -> Result<DataFrame, StoreError> {
        let mut combined = empty_frame();
        for year in self.years()? {
            for country in self.countries(year)? {
                if let Some(df) = self.try_load(&country, year)? {
                    combined = combined.vstack(&df)?;
                }
            }
        }
        Ok(combined)
    }

    /// Years present in the store, ascending.
    pub fn years(&self) -> Result<Vec<i32>, StoreError> {
        let mut years = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(|e| StoreError::PartitionRead {
            partition: self.root.display().to_string(),
            message: e.to_string(),
        })? {
            let entry = entry.map_err(|e| StoreError::PartitionRead {
                partition: self.root.display().to_string(),
                message: e.to_string(),
            })?;
            let name = entry.file_name().to_string_lossy().to_string();
            match name.strip_prefix("base=").map(str::parse::<i32>) {
                Some(Ok(year)) => years.push(year),
                Some(Err(_)) => {
                    warn!(dir = %name, "Ignoring partition directory with non-numeric year")
                }
                None => debug!(dir = %name, "Ignoring non-partition entry"),
            }
        }
        years.sort_unstable();
        Ok(years)
    }

    /// Countries with a partition for the given year, ascending.
    pub fn countries(&self, year: i32) -> Result<Vec<CountryCode>, StoreError> {
        let year_dir = self.root.join(format!("base={year}"));
        if !year_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut countries = Vec::new();
        for entry in std::fs::read_dir(&year_dir).map_err(|e| StoreError::PartitionRead {
            partition: year_dir.display().to_string(),
            message: e.to_string(),
        })? {
            let entry = entry.map_err(|e| StoreError::PartitionRead {
                partition: year_dir.display().to_string(),
                message: e.to_string(),
            })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(code) = name.strip_prefix("ctr=") {
                match CountryCode::new(code) {
                    Ok(code) => countries.push(code),
                    Err(_) => warn!(dir = %name, "Ignoring partition with invalid country code"),
                }
            }
        }
        countries.sort();
        Ok(countries)
    }
}

/// Reattaches partition columns and fixes dtypes on a freshly read frame.
///
/// Hive layouts keep `ctr` and `base` in the directory names, so the
/// parquet files themselves may omit them. The result is always in
/// schema column order; `vstack` is order-sensitive, so frames from
/// different partitions must line up with [`empty_frame`].
fn normalize(mut df: DataFrame, country: &CountryCode, year: i32) -> Result<DataFrame, StoreError> {
    let height = df.height();

    if df.column(columns::DECLARANT).is_err() {
        df.with_column(Series::new(
            columns::DECLARANT,
            vec![country.as_str(); height],
        ))?;
    }
    if df.column(columns::YEAR).is_err() {
        df.with_column(Series::new(columns::YEAR, vec![year; height]))?;
    } else if df.column(columns::YEAR)?.dtype() != &DataType::Int32 {
        let cast = df.column(columns::YEAR)?.cast(&DataType::Int32)?;
        df.with_column(cast)?;
    }
    if df.column(columns::VALUE)?.dtype() != &DataType::Float64 {
        let cast = df.column(columns::VALUE)?.cast(&DataType::Float64)?;
        df.with_column(cast)?;
    }

    let schema_order = [
        columns::DECLARANT,
        columns::YEAR,
        columns::ORIGIN,
        columns::ROW_CODE,
        columns::COL_CODE,
        columns::VALUE,
    ];
    let mut order: Vec<String> = schema_order.iter().map(|c| c.to_string()).collect();
    for name in df.get_column_names() {
        if !schema_order.contains(&name) {
            order.push(name.to_string());
        }
    }
    let df = df.select(order)?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{frame_from_records, FlowRecord};
    use tempfile::TempDir;

    fn seed_partition(root: &Path, country: &str, year: i32, records: &[FlowRecord]) {
        let dir = root
            .join(format!("base={year}"))
            .join(format!("ctr={country}"));
        std::fs::create_dir_all(&dir).unwrap();
        let mut df = frame_from_records(records).unwrap();
        let file = File::create(dir.join("part-0.parquet")).unwrap();
        ParquetWriter::new(file).finish(&mut df).unwrap();
    }

    fn record(declarant: &str, year: i32, origin: &str, value: f64) -> FlowRecord {
        FlowRecord {
            declarant: declarant.to_string(),
            year,
            origin: origin.to_string(),
            row_code: "D11".to_string(),
            column_code: "C29".to_string(),
            value,
        }
    }

    #[test]
    fn test_open_missing_root() {
        let result = FlowStore::open("/nonexistent/figaro");
        assert!(matches!(result, Err(StoreError::RootNotFound(_))));
    }

    #[test]
    fn test_load_present_partition() {
        let tmp = TempDir::new().unwrap();
        seed_partition(
            tmp.path(),
            "DE",
            2019,
            &[record("DE", 2019, "DE", 100.0), record("DE", 2019, "FR", 50.0)],
        );

        let store = FlowStore::open(tmp.path()).unwrap();
        let de = CountryCode::new("DE").unwrap();
        let df = store.load(&de, 2019).unwrap();
        assert_eq!(df.height(), 2);
        let total: f64 = df.column("value").unwrap().f64().unwrap().sum().unwrap();
        assert!((total - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_missing_partition_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FlowStore::open(tmp.path()).unwrap();
        let fr = CountryCode::new("FR").unwrap();

        assert!(store.try_load(&fr, 2021).unwrap().is_none());
        let df = store.load(&fr, 2021).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_years_and_countries_listing() {
        let tmp = TempDir::new().unwrap();
        seed_partition(tmp.path(), "DE", 2019, &[record("DE", 2019, "DE", 1.0)]);
        seed_partition(tmp.path(), "FR", 2019, &[record("FR", 2019, "FR", 2.0)]);
        seed_partition(tmp.path(), "DE", 2020, &[record("DE", 2020, "DE", 3.0)]);

        let store = FlowStore::open(tmp.path()).unwrap();
        assert_eq!(store.years().unwrap(), vec![2019, 2020]);

        let countries = store.countries(2019).unwrap();
        let codes: Vec<&str> = countries.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["DE", "FR"]);
        assert!(store.countries(1999).unwrap().is_empty());
    }

}
