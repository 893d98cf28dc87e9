//! Dashboard JSON writer

use crate::domain::errors::FigaroError;
use crate::domain::result::Result;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Serializes a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
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

    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|e| {
        FigaroError::Output(format!("Failed to write '{}': {}", path.display(), e))
    })?;

    info!(path = %path.display(), "JSON written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("meta.json");

        write_json(&json!({"country": "DE", "year": 2019}), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["country"], "DE");
        assert_eq!(parsed["year"], 2019);
    }
}
