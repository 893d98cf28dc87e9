//! CSV table writer

use crate::domain::errors::FigaroError;
use crate::domain::result::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Writes a dataframe as a CSV table, creating parent directories.
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            FigaroError::Output(format!(
                "Failed to create output directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let file = File::create(path).map_err(|e| {
        FigaroError::Output(format!("Failed to create '{}': {}", path.display(), e))
    })?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| FigaroError::Output(format!("Failed to write '{}': {}", path.display(), e)))?;

    info!(path = %path.display(), rows = df.height(), "Table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_table_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tables").join("nested").join("out.csv");

        let mut df = df!(
            "country" => ["DE", "FR"],
            "value" => [1.5, 2.5],
        )
        .unwrap();
        write_table(&mut df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("country,value"));
        assert!(content.contains("DE,1.5"));
    }
}
