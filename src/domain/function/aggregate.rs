//! Null-skipping aggregates: SUM, AVG, MIN, MAX, COUNT.
//!
//! All of them ignore missing values. SUM of nothing is 0 and COUNT of nothing is 0;
//! AVG, MIN and MAX need at least one present value.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

const ONE_SERIES: &[ArgKind] = &[ArgKind::Series];

pub fn sum(series: &Series) -> f64 {
    series.present_values().sum()
}

pub fn count(series: &Series) -> usize {
    series.present_values().count()
}

pub fn average(series: &Series) -> Option<f64> {
    let n = count(series);
    if n == 0 {
        return None;
    }
    Some(sum(series) / n as f64)
}

pub fn minimum(series: &Series) -> Option<f64> {
    series.present_values().reduce(f64::min)
}

pub fn maximum(series: &Series) -> Option<f64> {
    series.present_values().reduce(f64::max)
}

fn require(function: &str, value: Option<f64>) -> Result<EvaluationResult, EngineError> {
    value
        .map(EvaluationResult::Scalar)
        .ok_or_else(|| EngineError::insufficient(function, "series has no non-null values"))
}

pub struct Sum;

impl SeriesFunction for Sum {
    fn name(&self) -> &'static str {
        "SUM"
    }

    fn params(&self) -> &'static [ArgKind] {
        ONE_SERIES
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "sum of non-null values (0 when there are none)"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        Ok(EvaluationResult::Scalar(sum(args.series(0)?)))
    }
}

pub struct Avg;

impl SeriesFunction for Avg {
    fn name(&self) -> &'static str {
        "AVG"
    }

    fn params(&self) -> &'static [ArgKind] {
        ONE_SERIES
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "mean of non-null values"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        require(self.name(), average(args.series(0)?))
    }
}

pub struct Min;

impl SeriesFunction for Min {
    fn name(&self) -> &'static str {
        "MIN"
    }

    fn params(&self) -> &'static [ArgKind] {
        ONE_SERIES
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "smallest non-null value"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        require(self.name(), minimum(args.series(0)?))
    }
}

pub struct Max;

impl SeriesFunction for Max {
    fn name(&self) -> &'static str {
        "MAX"
    }

    fn params(&self) -> &'static [ArgKind] {
        ONE_SERIES
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "largest non-null value"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        require(self.name(), maximum(args.series(0)?))
    }
}

pub struct Count;

impl SeriesFunction for Count {
    fn name(&self) -> &'static str {
        "COUNT"
    }

    fn params(&self) -> &'static [ArgKind] {
        ONE_SERIES
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Scalar
    }

    fn summary(&self) -> &'static str {
        "number of non-null observations"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        Ok(EvaluationResult::Scalar(count(args.series(0)?) as f64))
    }
}
