#![allow(dead_code)]

use chrono::NaiveDate;
use econcalc::domain::error::EconcalcError;
use econcalc::domain::series::{DataContext, Series, normalize_name};
use econcalc::ports::series_port::SeriesResolver;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockSeriesResolver {
    pub data: HashMap<String, Series>,
    pub errors: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl MockSeriesResolver {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, name: &str, series: Series) -> Self {
        self.data.insert(normalize_name(name), series);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(normalize_name(name), reason.to_string());
        self
    }
}

impl SeriesResolver for MockSeriesResolver {
    fn resolve(&self, name: &str) -> Result<Option<Series>, EconcalcError> {
        let key = normalize_name(name);
        self.requested.borrow_mut().push(key.clone());
        if let Some(reason) = self.errors.get(&key) {
            return Err(EconcalcError::Data {
                name: key,
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(&key).cloned())
    }

    fn list_series(&self) -> Result<Vec<String>, EconcalcError> {
        let mut names: Vec<String> = self.data.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily series starting 2024-01-01.
pub fn daily(values: &[Option<f64>]) -> Series {
    let start = date(2024, 1, 1);
    Series::from_points(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (start + chrono::Days::new(i as u64), *v)),
    )
    .unwrap()
}

/// Daily series with no missing values.
pub fn daily_values(values: &[f64]) -> Series {
    let values: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    daily(&values)
}

/// Monthly series on the first of each month, starting January of `year`.
pub fn monthly(year: i32, values: &[f64]) -> Series {
    Series::from_points(values.iter().enumerate().map(|(i, v)| {
        let months = i as u32;
        (date(year + (months / 12) as i32, months % 12 + 1, 1), Some(*v))
    }))
    .unwrap()
}

/// GDP_US: ten monthly points 100..=109 through 2023.
pub fn gdp_context() -> DataContext {
    let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    DataContext::new().with_series("GDP_US", monthly(2023, &values))
}

pub fn context_of(entries: &[(&str, Series)]) -> DataContext {
    entries
        .iter()
        .map(|(name, series)| (*name, series.clone()))
        .collect()
}
