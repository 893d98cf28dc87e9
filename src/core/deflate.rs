//! Nominal-to-real conversion via consumer price indices
//!
//! The flow values are nominal (current prices). For real comparisons
//! the deflator rebases a country's HICP to a reference year and divides
//! it out. A country or year absent from the index table yields `None`,
//! never a silently assumed deflator of 1.

use crate::config::DeflatorConfig;
use std::collections::BTreeMap;

/// Eurostat HICP annual averages, 2015 = 100.
///
/// Covers the focus countries of the recovery comparison, 2019-2023.
static HICP_YEARS: &[i32] = &[2019, 2020, 2021, 2022, 2023];

static HICP_DATA: &[(&str, [f64; 5])] = &[
    ("DE", [107.4, 107.9, 111.3, 120.3, 127.5]),
    ("AT", [108.4, 109.9, 113.0, 122.5, 131.8]),
    ("NL", [108.9, 110.3, 113.2, 126.4, 131.1]),
    ("ES", [106.2, 105.9, 109.2, 118.5, 122.7]),
    ("IT", [105.3, 105.2, 107.2, 116.1, 122.9]),
    ("GR", [103.9, 102.7, 103.9, 114.4, 119.1]),
    ("PT", [106.3, 106.2, 107.5, 116.6, 121.7]),
    ("FR", [106.3, 106.9, 108.8, 114.9, 121.4]),
    ("PL", [109.5, 113.3, 118.9, 135.6, 151.2]),
];

/// Price index table, `(country, year) -> index value`.
#[derive(Debug, Clone)]
pub struct PriceIndexTable {
    indices: BTreeMap<(String, i32), f64>,
}

impl PriceIndexTable {
    /// The built-in Eurostat HICP table.
    pub fn eurostat_hicp() -> Self {
        let mut indices = BTreeMap::new();
        for (country, series) in HICP_DATA {
            for (&year, &value) in HICP_YEARS.iter().zip(series.iter()) {
                indices.insert((country.to_string(), year), value);
            }
        }
        Self { indices }
    }

    /// Builds a table from a validated configuration override.
    pub fn from_config(config: &DeflatorConfig) -> Self {
        let mut indices = BTreeMap::new();
        for (country, series) in &config.indices {
            for (&year, &value) in config.years.iter().zip(series.iter()) {
                indices.insert((country.clone(), year), value);
            }
        }
        Self { indices }
    }

    /// Raw index value for a country and year.
    pub fn index(&self, country: &str, year: i32) -> Option<f64> {
        self.indices.get(&(country.to_string(), year)).copied()
    }

    /// Deflator rebased so `reference_year` equals exactly 100.
    ///
    /// `None` when the country or either year is absent from the table.
    pub fn deflator(&self, country: &str, year: i32, reference_year: i32) -> Option<f64> {
        if year == reference_year {
            // Exact by definition, independent of index precision
            return self.index(country, year).map(|_| 100.0);
        }
        let index = self.index(country, year)?;
        let reference = self.index(country, reference_year)?;
        Some(index / reference * 100.0)
    }

    /// Converts a nominal index series to a real one.
    ///
    /// Entries whose deflator is unavailable are `None`; the caller
    /// decides whether to drop or report them.
    pub fn real_index(
        &self,
        country: &str,
        years: &[i32],
        nominal: &[f64],
        reference_year: i32,
    ) -> Vec<Option<f64>> {
        years
            .iter()
            .zip(nominal)
            .map(|(&year, &value)| {
                let deflator = self.deflator(country, year, reference_year)?;
                Some(value / deflator * 100.0)
            })
            .collect()
    }
}
