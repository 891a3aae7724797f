//! CSV file series adapter.
//!
//! Each series lives in `<dir>/<NAME>.csv` with a `date,value` header. The file stem is
//! matched case-insensitively against the requested name.

use crate::domain::error::EconcalcError;
use crate::domain::series::{Observation, Series, normalize_name};
use crate::ports::series_port::SeriesResolver;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MISSING_MARKERS: [&str; 3] = ["null", "na", "."];

pub struct CsvSeriesAdapter {
    base_path: PathBuf,
}

impl CsvSeriesAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn read_dir(&self) -> Result<Vec<PathBuf>, EconcalcError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| EconcalcError::Data {
            name: self.base_path.display().to_string(),
            reason: format!("failed to read directory: {}", e),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EconcalcError::Data {
                name: self.base_path.display().to_string(),
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn stem_name(path: &Path) -> Option<String> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(normalize_name)
    }

    fn find_file(&self, name: &str) -> Result<Option<PathBuf>, EconcalcError> {
        let wanted = normalize_name(name);
        Ok(self
            .read_dir()?
            .into_iter()
            .find(|path| Self::stem_name(path).as_deref() == Some(wanted.as_str())))
    }
}

fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() || MISSING_MARKERS.iter().any(|m| raw.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .map_err(|e| format!("invalid value '{}': {}", raw, e))?;
    if !value.is_finite() {
        return Err(format!("non-finite value '{}'", raw));
    }
    Ok(Some(value))
}

/// Parse `date,value` CSV content into a sorted series.
pub fn parse_series_csv(name: &str, content: &str) -> Result<Series, EconcalcError> {
    let data_error = |reason: String| EconcalcError::Data {
        name: name.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut observations = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

        let date_str = record
            .get(0)
            .ok_or_else(|| data_error(format!("line {}: missing date column", line)))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| data_error(format!("line {}: invalid date '{}': {}", line, date_str, e)))?;

        let value = match record.get(1) {
            Some(raw) => parse_value(raw).map_err(|e| data_error(format!("line {}: {}", line, e)))?,
            None => None,
        };
        observations.push(Observation::new(date, value));
    }

    observations.sort_by_key(|o| o.date);
    Series::new(observations).map_err(|e| data_error(e.to_string()))
}

impl SeriesResolver for CsvSeriesAdapter {
    fn resolve(&self, name: &str) -> Result<Option<Series>, EconcalcError> {
        let Some(path) = self.find_file(name)? else {
            debug!(name, dir = %self.base_path.display(), "no CSV file for series");
            return Ok(None);
        };

        let content = fs::read_to_string(&path).map_err(|e| EconcalcError::Data {
            name: name.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let series = parse_series_csv(name, &content)?;
        if series.is_empty() {
            warn!(name, path = %path.display(), "series file has no rows");
        }
        debug!(name, points = series.len(), path = %path.display(), "loaded series");
        Ok(Some(series))
    }

    fn list_series(&self) -> Result<Vec<String>, EconcalcError> {
        let mut names: Vec<String> = self
            .read_dir()?
            .iter()
            .filter_map(|path| Self::stem_name(path))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
