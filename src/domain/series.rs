//! Observation, Series and DataContext.
//!
//! A `Series` is an immutable, strictly date-ascending sequence of observations whose
//! values may be missing. A `DataContext` maps case-insensitive names to series and is
//! only ever read by the engine.

use crate::domain::error::SeriesError;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    observations: Vec<Observation>,
}

impl Series {
    /// Build a series, rejecting unsorted or duplicate dates.
    pub fn new(observations: Vec<Observation>) -> Result<Self, SeriesError> {
        for pair in observations.windows(2) {
            let (previous, next) = (pair[0].date, pair[1].date);
            if next == previous {
                return Err(SeriesError::DuplicateDate { date: next });
            }
            if next < previous {
                return Err(SeriesError::Unsorted { previous, next });
            }
        }
        Ok(Self { observations })
    }

    /// Build a series from `(date, value)` pairs.
    pub fn from_points<I>(points: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        Self::new(
            points
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        )
    }

    /// Replace every value while keeping the dates. `values` must match the series length.
    pub(crate) fn with_values(&self, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.observations.len());
        let observations = self
            .observations
            .iter()
            .zip(values)
            .map(|(obs, value)| Observation {
                date: obs.date,
                value,
            })
            .collect();
        Self { observations }
    }

    /// Caller guarantees ascending, unique dates (e.g. a subset of another series).
    pub(crate) fn from_sorted(observations: Vec<Observation>) -> Self {
        debug_assert!(observations.windows(2).all(|w| w[0].date < w[1].date));
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Values with missing points skipped, in date order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().filter_map(|o| o.value)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Observation> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|i| &self.observations[i])
    }
}

/// Name → Series mapping supplied for one evaluation. Names are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    series: HashMap<String, Series>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, series: Series) -> Option<Series> {
        self.series.insert(normalize_name(name), series)
    }

    pub fn with_series(mut self, name: &str, series: Series) -> Self {
        self.insert(name, series);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Series)> for DataContext {
    fn from_iter<I: IntoIterator<Item = (&'a str, Series)>>(iter: I) -> Self {
        let mut ctx = DataContext::new();
        for (name, series) in iter {
            ctx.insert(name, series);
        }
        ctx
    }
}

/// Canonical (upper-case) form of a series or function name.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_uppercase()
}
