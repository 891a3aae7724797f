//! Intermediate evaluation values.

use crate::domain::series::Series;

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    Scalar(f64),
    SeriesValue(Series),
}

impl EvaluationResult {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EvaluationResult::Scalar(_) => "scalar",
            EvaluationResult::SeriesValue(_) => "series",
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            EvaluationResult::Scalar(v) => Some(*v),
            EvaluationResult::SeriesValue(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            EvaluationResult::Scalar(_) => None,
            EvaluationResult::SeriesValue(s) => Some(s),
        }
    }
}

impl From<f64> for EvaluationResult {
    fn from(value: f64) -> Self {
        EvaluationResult::Scalar(value)
    }
}

impl From<Series> for EvaluationResult {
    fn from(series: Series) -> Self {
        EvaluationResult::SeriesValue(series)
    }
}
