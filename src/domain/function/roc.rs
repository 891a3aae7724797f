//! ROC (Rate of Change).
//!
//! ROC(n)[i] = ((V[i] - V[i-n]) / V[i-n]) * 100
//! Null when i < n, when either endpoint is null, or when V[i-n] == 0.

use crate::domain::error::EngineError;
use crate::domain::function::{ArgKind, Arguments, ResultKind, SeriesFunction};
use crate::domain::series::Series;
use crate::domain::value::EvaluationResult;

pub fn calculate_roc(series: &Series, period: usize) -> Series {
    let values = series.values();
    let out = (0..values.len())
        .map(|i| {
            if i < period {
                return None;
            }
            let prev = values[i - period]?;
            let curr = values[i]?;
            if prev == 0.0 {
                None
            } else {
                Some((curr - prev) / prev * 100.0)
            }
        })
        .collect();
    series.with_values(out)
}

pub struct Roc;

impl SeriesFunction for Roc {
    fn name(&self) -> &'static str {
        "ROC"
    }

    fn params(&self) -> &'static [ArgKind] {
        &[ArgKind::Series, ArgKind::Periods]
    }

    fn returns(&self) -> ResultKind {
        ResultKind::Series
    }

    fn summary(&self) -> &'static str {
        "percent change against the value `periods` observations earlier"
    }

    fn evaluate(&self, args: &Arguments<'_>) -> Result<EvaluationResult, EngineError> {
        let series = args.series(0)?;
        let period = args.periods(1)?;
        Ok(EvaluationResult::SeriesValue(calculate_roc(series, period)))
    }
}
