//! REGRESSION: ordinary least-squares trend line.
//!
//! Fits value = intercept + slope * i, where i is the observation's position in the
//! series, using only non-null points. Each non-null value is replaced by its fitted
//! value; null points stay null.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction, has_no_spread};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

const NAME: &str = "REGRESSION";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Least-squares fit of `(x, y)` points. Needs two points with distinct `x`.
pub fn fit_line(points: &[(f64, f64)]) -> Result<LinearFit, EngineError> {
    let n = points.len();
    if n < 2 {
        return Err(EngineError::insufficient(
            NAME,
            format!("need at least 2 non-null points, have {}", n),
        ));
    }

    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for &(x, y) in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }

    if has_no_spread(points.iter().map(|p| p.0), sxx) {
        return Err(EngineError::insufficient(NAME, "points share a single index"));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        intercept: mean_y - slope * mean_x,
        slope,
    })
}

pub fn calculate_regression(series: &Series) -> Result<Series, EngineError> {
    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, o)| o.value.map(|v| (i as f64, v)))
        .collect();
    let fit = fit_line(&points)?;

    let values = series
        .iter()
        .enumerate()
        .map(|(i, o)| o.value.map(|_| fit.at(i as f64)))
        .collect();
    Ok(series.with_values(values))
}

pub struct Regression;

impl SeriesFunction for Regression {
    fn name(&self) -> &'static str {
        NAME
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Series
    }

    fn summary(&self) -> &'static str {
        "least-squares linear trend fitted against observation index"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        Ok(EvaluationResult::SeriesValue(calculate_regression(
            args.series(0)?,
        )?))
    }
}
