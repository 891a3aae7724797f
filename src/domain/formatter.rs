//! Result formatting.
//!
//! Converts an [`EvaluationResult`] into the declared output shape and rounds every
//! value to [`PRECISION`] decimal places so output is stable across runs.

use crate::domain::error::EngineError;
use crate::domain::value::EvaluationResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Decimal places kept in formatted output.
pub const PRECISION: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Series,
    Scalar,
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "series" => Ok(OutputType::Series),
            "scalar" => Ok(OutputType::Scalar),
            other => Err(format!(
                "unknown output type '{}', expected 'series' or 'scalar'",
                other
            )),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Series => write!(f, "series"),
            OutputType::Scalar => write!(f, "scalar"),
        }
    }
}

/// Final engine output.
///
/// Serializes as `{"kind":"scalar","value":n}` or
/// `{"kind":"series","points":[["YYYY-MM-DD", n|null], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Output {
    Scalar { value: f64 },
    Series { points: Vec<(NaiveDate, Option<f64>)> },
}

impl Output {
    pub fn output_type(&self) -> OutputType {
        match self {
            Output::Scalar { .. } => OutputType::Scalar,
            Output::Series { .. } => OutputType::Series,
        }
    }
}

/// Magnitude from which an `f64` has no fractional digits left to round.
const NO_FRACTION_ABOVE: f64 = 1e15;

/// Round half away from zero to [`PRECISION`] decimals; `-0` becomes `0`.
pub fn round_value(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= NO_FRACTION_ABOVE {
        return value;
    }
    let factor = 10f64.powi(PRECISION);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn round_point(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite()).map(round_value)
}

/// Shape `result` as `output_type`. A scalar declared as a series becomes one point
/// dated `as_of`; a series declared as a scalar is rejected.
pub fn format_result(
    result: EvaluationResult,
    output_type: OutputType,
    as_of: NaiveDate,
) -> Result<Output, EngineError> {
    match (result, output_type) {
        (EvaluationResult::Scalar(value), _) if !value.is_finite() => {
            Err(EngineError::type_error("non-finite result"))
        }
        (EvaluationResult::Scalar(value), OutputType::Scalar) => Ok(Output::Scalar {
            value: round_value(value),
        }),
        (EvaluationResult::Scalar(value), OutputType::Series) => Ok(Output::Series {
            points: vec![(as_of, Some(round_value(value)))],
        }),
        (EvaluationResult::SeriesValue(series), OutputType::Series) => Ok(Output::Series {
            points: series
                .iter()
                .map(|o| (o.date, round_point(o.value)))
                .collect(),
        }),
        (EvaluationResult::SeriesValue(_), OutputType::Scalar) => Err(EngineError::type_error(
            "formula produces a series but a scalar output was declared",
        )),
    }
}
