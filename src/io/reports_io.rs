use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::board_io::{atomic_write, StoreError, SCHEMA_VERSION};
use crate::model::report::SavedReport;

/// On-disk envelope for reports.json
#[derive(Debug, Serialize, Deserialize)]
struct ReportsFile {
    schema: u32,
    reports: Vec<SavedReport>,
}

pub fn reports_path(stride_dir: &Path) -> PathBuf {
    stride_dir.join("reports.json")
}

/// Load saved reports. A missing file is an empty list, not an error.
pub fn load_reports(stride_dir: &Path) -> Result<Vec<SavedReport>, StoreError> {
    let path = reports_path(stride_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let file: ReportsFile =
        serde_json::from_str(&content).map_err(|e| StoreError::ParseError { path, source: e })?;
    if file.schema != SCHEMA_VERSION {
        return Err(StoreError::SchemaVersion { found: file.schema });
    }
    Ok(file.reports)
}

/// Save the report list atomically.
pub fn save_reports(stride_dir: &Path, reports: &[SavedReport]) -> Result<(), StoreError> {
    let file = ReportsFile {
        schema: SCHEMA_VERSION,
        reports: reports.to_vec(),
    };
    let content = serde_json::to_string_pretty(&file).map_err(|e| StoreError::ParseError {
        path: reports_path(stride_dir),
        source: e,
    })?;
    atomic_write(&reports_path(stride_dir), content.as_bytes())?;
    Ok(())
}
